//! CSV export for minute snapshots.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::plants::PlantFamily;
use crate::sim::types::MinuteSnapshot;

/// Fixed leading columns; one `<family>_mw` column per family follows.
const HEADER: &[&str] = &[
    "timestamp",
    "demand_mw",
    "generated_mw",
    "unmet_mw",
    "stability",
];

/// Column name of a family's generation, e.g. `combined_cycle_mw`.
fn family_column(family: PlantFamily) -> String {
    format!("{}_mw", family.kind_name().to_ascii_lowercase())
}

/// Exports snapshots to a CSV file at the given path.
///
/// Writes a header row followed by one data row per minute. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `snapshots` - Snapshots of a complete run
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(snapshots: &[MinuteSnapshot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(snapshots, buf)
}

/// Writes snapshots as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(snapshots: &[MinuteSnapshot], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let header = HEADER
        .iter()
        .map(|s| s.to_string())
        .chain(PlantFamily::ALL.into_iter().map(family_column));
    wtr.write_record(header)?;

    for s in snapshots {
        let mut row = vec![
            s.timestamp().format("%Y-%m-%dT%H:%M:%S").to_string(),
            format!("{:.4}", s.demand_mw()),
            format!("{:.4}", s.generated_mw()),
            format!("{:.4}", s.unmet_mw()),
            format!("{:.6}", s.stability()),
        ];
        let by_family = s.generated_by_family();
        for family in PlantFamily::ALL {
            let mw = by_family.get(family.label()).copied().unwrap_or(0.0);
            row.push(format!("{mw:.4}"));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::{Duration, NaiveDate};

    fn make_snapshot(minute: i64) -> MinuteSnapshot {
        let t = NaiveDate::from_ymd_opt(2025, 4, 28)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + Duration::minutes(minute);
        let mut by_family = BTreeMap::new();
        by_family.insert("Combined cycle".to_string(), 250.0);
        by_family.insert("Solar".to_string(), 50.0);
        MinuteSnapshot::new(t, 400.0, 0.6, 300.0, by_family).unwrap()
    }

    #[test]
    fn header_lists_every_family() {
        let mut buf = Vec::new();
        write_csv(&[make_snapshot(0)], &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(
            output.lines().next(),
            Some(
                "timestamp,demand_mw,generated_mw,unmet_mw,stability,\
                 nuclear_mw,coal_mw,combined_cycle_mw,biomass_mw,fuel_gas_mw,\
                 hydro_mw,wind_mw,solar_mw"
            )
        );
    }

    #[test]
    fn row_count_matches_minute_count() {
        let snapshots: Vec<_> = (0..24).map(make_snapshot).collect();
        let mut buf = Vec::new();
        write_csv(&snapshots, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 24 data rows
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn rows_carry_family_generation() {
        let mut buf = Vec::new();
        write_csv(&[make_snapshot(1)], &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rec = rdr.records().next().unwrap().unwrap();
        assert_eq!(&rec[0], "2025-04-28T12:01:00");
        assert_eq!(&rec[3], "100.0000");
        assert_eq!(&rec[7], "250.0000");
        assert_eq!(&rec[5], "0.0000");
        assert_eq!(&rec[12], "50.0000");
    }

    #[test]
    fn deterministic_output() {
        let snapshots: Vec<_> = (0..5).map(make_snapshot).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&snapshots, &mut buf1).unwrap();
        write_csv(&snapshots, &mut buf2).unwrap();
        assert_eq!(buf1, buf2);
    }
}
