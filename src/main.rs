//! Grid recovery simulator entry point: CLI wiring and scenario-driven engine
//! construction.

use std::process;

use clap::Parser;
use tracing::error;

use grid_recovery::cli::Args;
use grid_recovery::config::{ConfigError, ScenarioConfig};
use grid_recovery::io::export::export_csv;
use grid_recovery::io::records::{export_results_json, export_roster_json};
use grid_recovery::logging::init_tracing;
use grid_recovery::scenario::Scenario;
use grid_recovery::sim::report::RecoveryReport;

/// Loads the scenario named on the command line and applies file overrides.
///
/// `--plants` replaces both the roster file and any inline plants.
fn load_config(args: &Args) -> Result<ScenarioConfig, ConfigError> {
    let mut cfg = match &args.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(args.preset_name())?,
    };
    if let Some(path) = &args.plants {
        cfg.roster.path = Some(path.clone());
        cfg.plants.clear();
    }
    if let Some(path) = &args.forecast {
        cfg.forecast.path = Some(path.clone());
    }
    Ok(cfg)
}

/// Reports `err` and exits with status 1.
fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    error!("{context}: {err}");
    eprintln!("error: {context}: {err}");
    process::exit(1);
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = load_config(&args).unwrap_or_else(|e| fail("cannot load scenario", e));
    let Scenario {
        mut engine,
        blackout,
    } = Scenario::build(&cfg, args.blackout).unwrap_or_else(|e| fail("cannot build scenario", e));

    let print_every = args.print_every;
    let result = engine.run_observed(blackout, |snapshot, _| {
        let minute = (snapshot.timestamp() - blackout).num_minutes();
        if print_every > 0 && minute >= 0 && minute as usize % print_every == 0 {
            println!("{snapshot}");
        }
    });
    if let Err(e) = result {
        fail("simulation failed", e);
    }

    let report = RecoveryReport::from_snapshots(engine.snapshots());
    println!("\n{report}");
    println!("\n--- Final Roster ---");
    for plant in engine.plants() {
        println!("{plant}");
    }

    if let Some(path) = &args.csv_out {
        if let Err(e) = export_csv(engine.snapshots(), path) {
            fail("failed to write CSV", e);
        }
        eprintln!("Snapshots written to {}", path.display());
    }
    if let Some(path) = &args.json_out {
        if let Err(e) = export_results_json(engine.snapshots(), path) {
            fail("failed to write JSON", e);
        }
        eprintln!("Results written to {}", path.display());
    }
    if let Some(path) = &args.roster_out {
        if let Err(e) = export_roster_json(engine.plants(), path) {
            fail("failed to write roster JSON", e);
        }
        eprintln!("Roster written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(grid_recovery::api::AppState::from_engine(&engine));
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail("failed to create tokio runtime", e));
        if let Err(e) = rt.block_on(grid_recovery::api::serve(state, addr)) {
            fail("API server stopped", e);
        }
    }
}

