//! Daily demand forecast.
//!
//! The forecast is a single daily curve with one value per minute of the day;
//! a run longer than a day reads it again from midnight.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime, Timelike};

use crate::error::ForecastError;

/// Synthetic demand curve generator.
pub mod profile;

pub use profile::DailyProfile;

/// Number of minutes in the daily forecast.
pub const MINUTES_PER_DAY: usize = 1440;

/// Time of day at the start of `minute` (wraps past midnight).
pub fn time_of_minute(minute: usize) -> NaiveTime {
    NaiveTime::default() + Duration::minutes((minute % MINUTES_PER_DAY) as i64)
}

/// Minute of the day containing `time`.
pub fn minute_of_day(time: NaiveTime) -> usize {
    (time.num_seconds_from_midnight() / 60) as usize
}

/// Expected demand in MW for every minute of the day.
///
/// Can only be built through validating constructors, so every instance is
/// total (1440 entries) and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandForecast {
    demand_mw: Vec<f64>,
}

impl DemandForecast {
    /// Builds a forecast from `(time of day, MW)` pairs.
    ///
    /// A later pair for the same time replaces an earlier one. Only whole
    /// minutes (`HH:MM:00`) are looked up.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::Empty` for no entries, `MissingMinute` for the
    /// first minute without an entry, or `InvalidDemand` for a negative or
    /// non-finite value.
    pub fn from_entries<I>(entries: I) -> Result<Self, ForecastError>
    where
        I: IntoIterator<Item = (NaiveTime, f64)>,
    {
        let table: BTreeMap<NaiveTime, f64> = entries.into_iter().collect();
        Self::from_map(&table)
    }

    /// Builds a forecast from a time-of-day table.
    ///
    /// # Errors
    ///
    /// Same as [`DemandForecast::from_entries`].
    pub fn from_map(table: &BTreeMap<NaiveTime, f64>) -> Result<Self, ForecastError> {
        if table.is_empty() {
            return Err(ForecastError::Empty);
        }
        let mut demand_mw = Vec::with_capacity(MINUTES_PER_DAY);
        for minute in 0..MINUTES_PER_DAY {
            let time = time_of_minute(minute);
            let mw = *table.get(&time).ok_or(ForecastError::MissingMinute(time))?;
            demand_mw.push(mw);
        }
        Self::from_samples(demand_mw)
    }

    /// Builds a forecast from exactly 1440 per-minute samples starting at midnight.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::SampleCount` for the wrong length (`Empty` for
    /// none), or `InvalidDemand` for a negative or non-finite value.
    pub fn from_samples(demand_mw: Vec<f64>) -> Result<Self, ForecastError> {
        if demand_mw.is_empty() {
            return Err(ForecastError::Empty);
        }
        if demand_mw.len() != MINUTES_PER_DAY {
            return Err(ForecastError::SampleCount {
                expected: MINUTES_PER_DAY,
                actual: demand_mw.len(),
            });
        }
        if let Some((minute, &mw)) = demand_mw
            .iter()
            .enumerate()
            .find(|(_, mw)| !mw.is_finite() || **mw < 0.0)
        {
            return Err(ForecastError::InvalidDemand {
                time: time_of_minute(minute),
                mw,
            });
        }
        Ok(Self { demand_mw })
    }

    /// The same demand at every minute.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidDemand` if `mw` is negative or not finite.
    pub fn flat(mw: f64) -> Result<Self, ForecastError> {
        Self::from_samples(vec![mw; MINUTES_PER_DAY])
    }

    /// Expected demand for the minute containing `time`.
    pub fn demand_at(&self, time: NaiveTime) -> f64 {
        self.demand_mw[minute_of_day(time)]
    }

    pub fn samples(&self) -> &[f64] {
        &self.demand_mw
    }

    pub fn peak_mw(&self) -> f64 {
        self.demand_mw.iter().copied().fold(0.0, f64::max)
    }

    pub fn mean_mw(&self) -> f64 {
        self.demand_mw.iter().sum::<f64>() / MINUTES_PER_DAY as f64
    }
}
