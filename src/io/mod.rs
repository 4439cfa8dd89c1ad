//! File adapters: roster and forecast loaders, CSV and JSON exports.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ForecastError;

pub mod demand;
pub mod export;
pub mod records;
pub mod roster;

/// A roster or forecast file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Returns true for records carrying nothing but whitespace.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Line number of a record, for error messages.
fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

/// Builds the reader shared by both loaders: headerless, `#` comments,
/// ragged rows allowed, fields trimmed.
fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All);
    builder
}
