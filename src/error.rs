//! Error taxonomy for the recovery core.
//!
//! Every constructor-equivalent boundary returns one of these instead of
//! substituting defaults. None of them are retryable: the call that raised
//! the error had invalid input and must be fixed by the caller.

use chrono::NaiveTime;
use thiserror::Error;

/// A plant attribute violates its declared range, or the family kind is unknown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlantError {
    #[error("plant name cannot be blank")]
    BlankName,
    #[error("city cannot be blank")]
    BlankCity,
    #[error("latitude {0} must be in range [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} must be in range [-180, 180]")]
    Longitude(f64),
    #[error("max capacity {0} MW must be a finite, non-negative number")]
    Capacity(f64),
    #[error("stability {0} must be in range [0, 1]")]
    Stability(f64),
    #[error("efficiency {0} must be in range [0, 1]")]
    Efficiency(f64),
    #[error("restart duration of {0} minutes cannot be negative")]
    Restart(i64),
    #[error("requested output {0} MW cannot be negative")]
    NegativeOutputRequest(f64),
    #[error("unknown plant family \"{0}\"")]
    UnknownFamily(String),
}

/// The demand forecast is empty, incomplete, or carries an invalid value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("demand forecast is empty")]
    Empty,
    #[error("demand forecast has no entry for {0}")]
    MissingMinute(NaiveTime),
    #[error("demand forecast has invalid value {mw} MW at {time}")]
    InvalidDemand { time: NaiveTime, mw: f64 },
    #[error("demand forecast needs {expected} samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },
}

/// A run was requested without the state it needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("power plant roster is empty, cannot run a simulation")]
    EmptyRoster,
    #[error("blackout instant is missing")]
    MissingBlackout,
}

/// A minute snapshot was built with an out-of-range field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("expected demand {0} MW must be finite and non-negative")]
    Demand(f64),
    #[error("stability {0} must be in range [0, 1]")]
    Stability(f64),
    #[error("generated power {0} MW must be finite and non-negative")]
    Generation(f64),
}

/// Any error raised by the recovery core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] PlantError),
    #[error("forecast error: {0}")]
    Forecast(#[from] ForecastError),
    #[error("precondition error: {0}")]
    Precondition(#[from] SimulationError),
    #[error("data error: {0}")]
    Data(#[from] SnapshotError),
}
