//! Demand forecast loader.
//!
//! One entry per line: `HH:MM,demandMW`. Lines starting with `#`, blank lines
//! and lines without exactly two fields are ignored. A later line for the
//! same time replaces an earlier one.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveTime;
use tracing::info;

use super::{LoadError, is_blank, line_of, reader_builder};
use crate::forecast::DemandForecast;

fn parse_time(field: &str, line: u64) -> Result<NaiveTime, LoadError> {
    NaiveTime::parse_from_str(field, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(field, "%H:%M:%S"))
        .map_err(|e| LoadError::Parse {
            line,
            message: format!("time \"{field}\" is not HH:MM: {e}"),
        })
}

/// Reads and validates a forecast from any reader.
///
/// # Errors
///
/// Returns a `LoadError` if a line does not parse, or
/// `LoadError::Forecast` if the table is empty, misses a minute or holds a
/// negative value.
pub fn read_demand(reader: impl Read) -> Result<DemandForecast, LoadError> {
    let mut rdr = reader_builder().from_reader(reader);
    let mut entries = Vec::new();

    for record in rdr.records() {
        let record = record?;
        if is_blank(&record) || record.len() != 2 {
            continue;
        }
        let line = line_of(&record);
        let time = parse_time(&record[0], line)?;
        let mw = record[1].parse::<f64>().map_err(|e| LoadError::Parse {
            line,
            message: format!("demand \"{}\" is not a number: {e}", &record[1]),
        })?;
        entries.push((time, mw));
    }

    Ok(DemandForecast::from_entries(entries)?)
}

/// Reads and validates a forecast file.
///
/// # Errors
///
/// Same as [`read_demand`], plus `LoadError::Io` if the file cannot be opened.
pub fn load_demand(path: &Path) -> Result<DemandForecast, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let forecast = read_demand(file)?;
    info!(
        path = %path.display(),
        peak_mw = forecast.peak_mw(),
        mean_mw = forecast.mean_mw(),
        "loaded demand forecast"
    );
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::forecast::{MINUTES_PER_DAY, time_of_minute};

    fn full_day(mw: f64) -> String {
        let mut s = String::from("# time,demand\n");
        for m in 0..MINUTES_PER_DAY {
            s.push_str(&format!("{},{mw}\n", time_of_minute(m).format("%H:%M")));
        }
        s
    }

    #[test]
    fn reads_a_complete_day() {
        let mut input = full_day(500.0);
        input.push_str("12:00,900\n");
        let forecast = read_demand(input.as_bytes()).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(forecast.demand_at(noon), 900.0);
        assert_eq!(forecast.peak_mw(), 900.0);
    }

    #[test]
    fn incomplete_day_is_a_forecast_error() {
        let input: String = full_day(500.0)
            .lines()
            .filter(|l| !l.starts_with("23:59"))
            .map(|l| format!("{l}\n"))
            .collect();
        let err = read_demand(input.as_bytes()).unwrap_err();
        let last = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
        assert!(matches!(
            err,
            LoadError::Forecast(ForecastError::MissingMinute(t)) if t == last
        ));
    }

    #[test]
    fn negative_demand_is_a_forecast_error() {
        let input = full_day(500.0) + "03:00,-1\n";
        let err = read_demand(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Forecast(ForecastError::InvalidDemand { .. })
        ));
    }

    #[test]
    fn bad_time_is_a_parse_error() {
        let err = read_demand("# header\n25:99,10\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "{err}");
    }

    #[test]
    fn empty_file_is_empty_forecast() {
        let err = read_demand("# nothing\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Forecast(ForecastError::Empty)));
    }
}
