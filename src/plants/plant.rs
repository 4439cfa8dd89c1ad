//! Plant records: input spec, validated plant and per-minute state.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::family::{AvailabilityWindow, FuelGasProfile, FuelKind, PlantFamily};
use crate::error::PlantError;

/// Roster-unique plant identity, issued in registration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(pub u32);

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operational state of a plant during one simulated minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlantState {
    /// Still restarting, or outside its availability window.
    Unavailable,
    /// Able to generate but not dispatched.
    Idle,
    /// Generating its assigned output.
    Online,
}

impl fmt::Display for PlantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unavailable => "UNAVAILABLE",
            Self::Idle => "IDLE",
            Self::Online => "ONLINE",
        };
        f.write_str(s)
    }
}

fn default_efficiency() -> f64 {
    1.0
}

/// Static attributes of a plant as handed over by a loader.
///
/// `efficiency` is only read for renewable families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantSpec {
    /// Family kind string, e.g. `"NUCLEAR"` or `"SOLAR"`.
    pub kind: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub max_capacity_mw: f64,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
}

impl PlantSpec {
    /// Creates a spec with efficiency 1.0.
    pub fn new(
        kind: &str,
        name: &str,
        latitude: f64,
        longitude: f64,
        city: &str,
        max_capacity_mw: f64,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            city: city.to_string(),
            max_capacity_mw,
            efficiency: default_efficiency(),
        }
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }
}

/// One generation unit.
///
/// Static attributes are validated once in [`Plant::new`] and never change.
/// `state` and `assigned_mw` are run state, recomputed every simulated minute.
#[derive(Debug, Clone)]
pub struct Plant {
    id: PlantId,
    family: PlantFamily,
    name: String,
    latitude: f64,
    longitude: f64,
    city: String,
    max_capacity_mw: f64,
    stability: f64,
    restart_minutes: i64,
    window: AvailabilityWindow,
    efficiency: f64,
    state: PlantState,
    assigned_mw: f64,
}

impl Plant {
    /// Validates `spec` and builds a plant of the given family.
    ///
    /// # Errors
    ///
    /// Returns the first `PlantError` found among the attributes.
    pub fn new(
        id: PlantId,
        family: PlantFamily,
        spec: &PlantSpec,
        fuel_gas: &FuelGasProfile,
    ) -> Result<Self, PlantError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(PlantError::BlankName);
        }
        if !(-90.0..=90.0).contains(&spec.latitude) {
            return Err(PlantError::Latitude(spec.latitude));
        }
        if !(-180.0..=180.0).contains(&spec.longitude) {
            return Err(PlantError::Longitude(spec.longitude));
        }
        let city = spec.city.trim();
        if city.is_empty() {
            return Err(PlantError::BlankCity);
        }
        if !spec.max_capacity_mw.is_finite() || spec.max_capacity_mw < 0.0 {
            return Err(PlantError::Capacity(spec.max_capacity_mw));
        }

        let stability = family.stability(fuel_gas);
        if !(0.0..=1.0).contains(&stability) {
            return Err(PlantError::Stability(stability));
        }
        let restart_minutes = family.restart_minutes(fuel_gas);
        if restart_minutes < 0 {
            return Err(PlantError::Restart(restart_minutes));
        }

        let efficiency = if family.is_renewable() {
            if !(0.0..=1.0).contains(&spec.efficiency) {
                return Err(PlantError::Efficiency(spec.efficiency));
            }
            spec.efficiency
        } else {
            1.0
        };

        Ok(Self {
            id,
            family,
            name: name.to_string(),
            latitude: spec.latitude,
            longitude: spec.longitude,
            city: city.to_string(),
            max_capacity_mw: spec.max_capacity_mw,
            stability,
            restart_minutes,
            window: family.window(),
            efficiency,
            state: PlantState::Unavailable,
            assigned_mw: 0.0,
        })
    }

    pub fn id(&self) -> PlantId {
        self.id
    }

    pub fn family(&self) -> PlantFamily {
        self.family
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn max_capacity_mw(&self) -> f64 {
        self.max_capacity_mw
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    pub fn restart(&self) -> Duration {
        Duration::minutes(self.restart_minutes)
    }

    pub fn window(&self) -> AvailabilityWindow {
        self.window
    }

    /// Efficiency factor; always 1.0 outside the renewable families.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn fuel(&self) -> Option<FuelKind> {
        self.family.fuel()
    }

    pub fn icon(&self) -> &'static str {
        self.family.icon()
    }

    pub fn state(&self) -> PlantState {
        self.state
    }

    /// Output assigned this minute, regardless of state.
    pub fn assigned_mw(&self) -> f64 {
        self.assigned_mw
    }

    /// Largest output the plant can deliver: capacity, scaled by efficiency
    /// for renewables.
    pub fn max_output_mw(&self) -> f64 {
        if self.family.is_renewable() {
            self.max_capacity_mw * self.efficiency
        } else {
            self.max_capacity_mw
        }
    }

    /// Returns true if `now` lies within the availability window and strictly
    /// after `blackout + restart`.
    ///
    /// At exactly `blackout + restart` the plant is still restarting.
    pub fn is_available(&self, blackout: NaiveDateTime, now: NaiveDateTime) -> bool {
        self.window.contains(now.time()) && now > blackout + self.restart()
    }

    /// Assigns up to `requested_mw` of output and returns the increase over the
    /// output already assigned this minute.
    ///
    /// An unavailable plant ignores the request and returns 0. The assignment is
    /// capped at [`Plant::max_output_mw`]; a lower request lowers the assignment
    /// but the returned delta is never negative.
    ///
    /// # Errors
    ///
    /// Returns `PlantError::NegativeOutputRequest` if `requested_mw < 0`.
    pub fn assign_output(&mut self, requested_mw: f64) -> Result<f64, PlantError> {
        if requested_mw < 0.0 || requested_mw.is_nan() {
            return Err(PlantError::NegativeOutputRequest(requested_mw));
        }
        if self.state == PlantState::Unavailable {
            return Ok(0.0);
        }
        let previous = self.assigned_mw;
        self.assigned_mw = requested_mw.min(self.max_output_mw());
        Ok((self.assigned_mw - previous).max(0.0))
    }

    /// Output actually fed to the grid: the assignment while online, else 0.
    pub fn simulated_output_mw(&self) -> f64 {
        if self.state == PlantState::Online {
            self.assigned_mw
        } else {
            0.0
        }
    }

    /// Recomputes availability for a new minute and clears the assignment.
    pub(crate) fn reset_for_minute(&mut self, blackout: NaiveDateTime, now: NaiveDateTime) {
        self.state = if self.is_available(blackout, now) {
            PlantState::Idle
        } else {
            PlantState::Unavailable
        };
        self.assigned_mw = 0.0;
    }

    pub(crate) fn set_online(&mut self) {
        self.state = PlantState::Online;
    }

    /// Takes the plant off the grid and returns the output it was delivering.
    pub(crate) fn disconnect(&mut self) -> f64 {
        let released = self.simulated_output_mw();
        self.assigned_mw = 0.0;
        self.state = PlantState::Idle;
        released
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<24} {:<14} {:>9.1} MW  {:<11} {:>8.1} MW",
            self.id,
            self.name,
            self.family.label(),
            self.max_capacity_mw,
            self.state.to_string(),
            self.assigned_mw
        )
    }
}
