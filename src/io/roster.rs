//! Plant roster loader.
//!
//! One plant per line: `TYPE,name,latitude,longitude,city,maxCapacityMW`
//! with an optional seventh `efficiency` column. Lines starting with `#` and
//! blank lines are ignored; lines with fewer than six fields are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::{LoadError, is_blank, line_of, reader_builder};
use crate::plants::PlantSpec;

const MIN_COLUMNS: usize = 6;

fn parse_number(field: &str, column: &str, line: u64) -> Result<f64, LoadError> {
    field.parse::<f64>().map_err(|e| LoadError::Parse {
        line,
        message: format!("{column} \"{field}\" is not a number: {e}"),
    })
}

/// Reads plant specs from any reader, in file order.
///
/// Specs are not validated here; the engine validates them on registration.
///
/// # Errors
///
/// Returns a `LoadError` if the input cannot be read or a numeric column
/// does not parse.
pub fn read_roster(reader: impl Read) -> Result<Vec<PlantSpec>, LoadError> {
    let mut rdr = reader_builder().from_reader(reader);
    let mut specs = Vec::new();

    for record in rdr.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line = line_of(&record);
        if record.len() < MIN_COLUMNS {
            warn!(line, fields = record.len(), "skipping malformed roster line");
            continue;
        }

        let mut spec = PlantSpec::new(
            &record[0],
            &record[1],
            parse_number(&record[2], "latitude", line)?,
            parse_number(&record[3], "longitude", line)?,
            &record[4],
            parse_number(&record[5], "max capacity", line)?,
        );
        if let Some(efficiency) = record.get(6).filter(|f| !f.is_empty()) {
            spec = spec.with_efficiency(parse_number(efficiency, "efficiency", line)?);
        }
        specs.push(spec);
    }

    Ok(specs)
}

/// Reads plant specs from a roster file.
///
/// # Errors
///
/// Returns a `LoadError` if the file cannot be opened or read.
pub fn load_roster(path: &Path) -> Result<Vec<PlantSpec>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let specs = read_roster(file)?;
    info!(path = %path.display(), plants = specs.len(), "loaded roster");
    Ok(specs)
}
