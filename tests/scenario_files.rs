//! Bundled scenario files: parsing, loading and exporting a full run.

use std::path::Path;

use serde_json::Value;

use grid_recovery::config::ScenarioConfig;
use grid_recovery::io::demand::load_demand;
use grid_recovery::io::export::write_csv;
use grid_recovery::io::records::{plant_records, snapshot_records, write_json};
use grid_recovery::io::roster::load_roster;
use grid_recovery::scenario::Scenario;
use grid_recovery::sim::report::RecoveryReport;
use grid_recovery::sim::types::RUN_DURATION_MINUTES;

fn load(path: &str) -> Scenario {
    let cfg = ScenarioConfig::from_toml_file(Path::new(path)).unwrap();
    assert!(cfg.validate().is_empty(), "{path} should validate");
    Scenario::build(&cfg, None).unwrap()
}

#[test]
fn bundled_roster_and_forecast_load() {
    let specs = load_roster(Path::new("scenarios/data/plants.csv")).unwrap();
    assert_eq!(specs.len(), 31);
    assert!(specs.iter().all(|s| !s.name.is_empty() && !s.city.is_empty()));

    let forecast = load_demand(Path::new("scenarios/data/demand.csv")).unwrap();
    assert_eq!(forecast.samples().len(), 1440);
    assert_eq!(forecast.samples()[0], 22818.0);
    assert!(forecast.peak_mw() >= forecast.mean_mw());
}

#[test]
fn iberia_scenario_resolves_its_data_files() {
    let cfg = ScenarioConfig::from_toml_file(Path::new("scenarios/iberia.toml")).unwrap();
    assert_eq!(
        cfg.roster.path.as_deref(),
        Some(Path::new("scenarios/data/plants.csv"))
    );
    assert_eq!(
        cfg.forecast.path.as_deref(),
        Some(Path::new("scenarios/data/demand.csv"))
    );

    let scenario = load("scenarios/iberia.toml");
    assert_eq!(scenario.engine.plants().len(), 31);
    assert_eq!(
        scenario.blackout.format("%Y-%m-%dT%H:%M").to_string(),
        "2025-04-28T12:33"
    );
}

#[test]
fn iberia_recovers_by_the_end_of_the_run() {
    let Scenario {
        mut engine,
        blackout,
    } = load("scenarios/iberia.toml");
    let snapshots = engine.run(blackout).unwrap();
    assert_eq!(snapshots.len(), RUN_DURATION_MINUTES);

    let report = RecoveryReport::from_snapshots(snapshots);
    assert!(report.served_mwh > 0.0);
    assert!(report.unmet_mwh > 0.0, "nothing is online right after the blackout");
    assert!(report.energy_by_family_mwh.contains_key("Nuclear"));
    assert!(report.min_stability >= 0.0 && report.mean_stability <= 1.0);
}

#[test]
fn windy_night_uses_inline_plants_and_synthetic_demand() {
    let Scenario {
        mut engine,
        blackout,
    } = load("scenarios/windy_night.toml");
    assert_eq!(engine.plants().len(), 4);
    assert_eq!(engine.plants()[2].name(), "Sierra de Alaiz");

    let snapshots = engine.run(blackout).unwrap();
    // 21:00 on a winter night: solar-free roster, wind alone is curtailed
    assert!(snapshots[30].generated_by_family().get("Wind").is_none());
}

#[test]
fn csv_export_has_one_row_per_minute() {
    let Scenario {
        mut engine,
        blackout,
    } = load("scenarios/windy_night.toml");
    let snapshots = engine.run(blackout).unwrap();

    let mut buf = Vec::new();
    write_csv(snapshots, &mut buf).unwrap();
    let mut rdr = csv::Reader::from_reader(buf.as_slice());
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), 13);
    assert_eq!(&headers[12], "solar_mw");

    let rows: Vec<_> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), RUN_DURATION_MINUTES);
    assert_eq!(&rows[0][0], "2025-01-15T21:00:00");
}

#[test]
fn json_exports_use_presentation_field_names() {
    let Scenario {
        mut engine,
        blackout,
    } = load("scenarios/windy_night.toml");
    engine.run(blackout).unwrap();

    let mut buf = Vec::new();
    write_json(&snapshot_records(engine.snapshots()), &mut buf).unwrap();
    let results: Value = serde_json::from_slice(&buf).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), RUN_DURATION_MINUTES);
    for key in [
        "time",
        "expectedDemandMW",
        "generatedMW",
        "averageStability",
        "generatedByTypeMW",
    ] {
        assert!(results[0].get(key).is_some(), "missing {key}");
    }

    let mut buf = Vec::new();
    write_json(&plant_records(engine.plants()), &mut buf).unwrap();
    let plants: Value = serde_json::from_slice(&buf).unwrap();
    let nuclear = &plants[0];
    assert_eq!(nuclear["type"], "Nuclear");
    assert_eq!(nuclear["maxCapacityMW"], 1092.0);
    assert!(nuclear.get("efficiency").is_none());
    assert!(nuclear.get("fuelType").is_none());
    assert!(plants[1].get("fuelType").is_some());
    assert_eq!(plants[2]["efficiency"], 0.5);
}
