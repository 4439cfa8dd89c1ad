//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};

use grid_recovery::forecast::DemandForecast;
use grid_recovery::plants::PlantSpec;
use grid_recovery::sim::engine::RecoveryEngine;

/// Midnight of the reference day.
pub fn midnight() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 28)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// `hour:minute` on the reference day.
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    midnight() + Duration::hours(hour.into()) + Duration::minutes(minute.into())
}

/// Engine with an empty roster and flat demand.
pub fn flat_engine(demand_mw: f64) -> RecoveryEngine {
    RecoveryEngine::new(DemandForecast::flat(demand_mw).unwrap())
}

/// Spec at a fixed location, for tests that only care about kind and capacity.
pub fn spec(kind: &str, name: &str, capacity_mw: f64) -> PlantSpec {
    PlantSpec::new(kind, name, 40.0, -3.7, "Madrid", capacity_mw)
}

/// One 1000 MW nuclear plant against a flat 500 MW demand.
pub fn nuclear_engine() -> RecoveryEngine {
    let mut engine = flat_engine(500.0);
    engine.add_plant(&spec("NUCLEAR", "Trillo", 1000.0)).unwrap();
    engine
}

/// [`nuclear_engine`] plus a 100 MW solar farm at 0.8 efficiency.
pub fn nuclear_solar_engine() -> RecoveryEngine {
    let mut engine = nuclear_engine();
    engine
        .add_plant(&spec("SOLAR", "Núñez de Balboa", 100.0).with_efficiency(0.8))
        .unwrap();
    engine
}

/// Asserts two floats agree to within `1e-9`.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
