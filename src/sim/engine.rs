//! Recovery engine: owns the roster and forecast and replays a fixed-length
//! recovery from a blackout instant.

use chrono::NaiveDateTime;
use tracing::{debug, info, trace};

use crate::error::{Error, SimulationError};
use crate::forecast::DemandForecast;
use crate::plants::{FuelGasProfile, Plant, PlantId, PlantSpec, PlantState, Roster};

use super::clock::MinuteClock;
use super::dispatch::{self, DispatchTiers};
use super::types::{MIN_GRID_STABILITY, MinuteSnapshot, RUN_DURATION_MINUTES};

/// Minute-by-minute recovery simulation.
///
/// The roster and forecast persist across runs; each run replaces the
/// previous snapshot sequence. Construction requires a validated
/// [`DemandForecast`], so an engine without a usable forecast cannot exist.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use grid_recovery::forecast::DemandForecast;
/// use grid_recovery::plants::PlantSpec;
/// use grid_recovery::sim::engine::RecoveryEngine;
///
/// let mut engine = RecoveryEngine::new(DemandForecast::flat(500.0).unwrap());
/// engine
///     .add_plant(&PlantSpec::new("NUCLEAR", "Trillo", 40.7, -2.6, "Trillo", 1000.0))
///     .unwrap();
///
/// let blackout = NaiveDate::from_ymd_opt(2025, 4, 28)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
/// let snapshots = engine.run(blackout).unwrap();
/// assert_eq!(snapshots.len(), 2160);
/// assert_eq!(snapshots[1440].generated_mw(), 0.0);
/// assert_eq!(snapshots[1441].generated_mw(), 500.0);
/// ```
#[derive(Debug, Clone)]
pub struct RecoveryEngine {
    roster: Roster,
    forecast: DemandForecast,
    snapshots: Vec<MinuteSnapshot>,
    blackout: Option<NaiveDateTime>,
    current: Option<NaiveDateTime>,
}

impl RecoveryEngine {
    /// Creates an engine with an empty roster and the default fuel-gas profile.
    pub fn new(forecast: DemandForecast) -> Self {
        Self::with_fuel_gas(forecast, FuelGasProfile::default())
    }

    /// Creates an engine whose fuel-gas plants use `fuel_gas`.
    pub fn with_fuel_gas(forecast: DemandForecast, fuel_gas: FuelGasProfile) -> Self {
        Self {
            roster: Roster::new(fuel_gas),
            forecast,
            snapshots: Vec::new(),
            blackout: None,
            current: None,
        }
    }

    /// Replaces the demand forecast used by later runs.
    pub fn configure(&mut self, forecast: DemandForecast) {
        self.forecast = forecast;
    }

    /// Validates `spec` and appends the plant to the roster.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an unknown family kind or an
    /// attribute out of range. The roster is left unchanged.
    pub fn add_plant(&mut self, spec: &PlantSpec) -> Result<PlantId, Error> {
        Ok(self.roster.add(spec)?)
    }

    /// Runs the recovery from `blackout` and returns the snapshot sequence.
    ///
    /// # Errors
    ///
    /// Returns `Error::Precondition` if the roster is empty. No snapshots are
    /// kept after a failed run.
    pub fn run(&mut self, blackout: NaiveDateTime) -> Result<&[MinuteSnapshot], Error> {
        self.run_observed(blackout, |_, _| {})
    }

    /// Like [`RecoveryEngine::run`], calling `observer` after every minute
    /// with the new snapshot and the roster as it stands at the end of the
    /// minute.
    ///
    /// # Errors
    ///
    /// Same as [`RecoveryEngine::run`].
    pub fn run_observed<F>(
        &mut self,
        blackout: NaiveDateTime,
        mut observer: F,
    ) -> Result<&[MinuteSnapshot], Error>
    where
        F: FnMut(&MinuteSnapshot, &[Plant]),
    {
        self.snapshots.clear();
        self.current = None;
        if self.roster.is_empty() {
            return Err(SimulationError::EmptyRoster.into());
        }

        let clock = MinuteClock::new(blackout, RUN_DURATION_MINUTES);
        let start = clock.start();
        self.blackout = Some(start);
        info!(
            blackout = %start,
            plants = self.roster.len(),
            minutes = RUN_DURATION_MINUTES,
            "starting recovery run"
        );

        let tiers = DispatchTiers::build(self.roster.plants());
        let mut seen_online = vec![false; self.roster.len()];
        let mut snapshots = Vec::with_capacity(RUN_DURATION_MINUTES);

        for (minute, now) in clock {
            self.current = Some(now);
            let snapshot = self.step(&tiers, start, minute, now, &mut seen_online)?;
            observer(&snapshot, self.roster.plants());
            snapshots.push(snapshot);
        }

        let min_stability = snapshots
            .iter()
            .map(MinuteSnapshot::stability)
            .fold(1.0, f64::min);
        info!(
            snapshots = snapshots.len(),
            min_stability, "recovery run finished"
        );
        self.snapshots = snapshots;
        Ok(&self.snapshots)
    }

    /// Simulates one minute and builds its snapshot.
    fn step(
        &mut self,
        tiers: &DispatchTiers,
        blackout: NaiveDateTime,
        minute: usize,
        now: NaiveDateTime,
        seen_online: &mut [bool],
    ) -> Result<MinuteSnapshot, Error> {
        let plants = self.roster.plants_mut();

        // 1. Availability and reset
        for plant in plants.iter_mut() {
            plant.reset_for_minute(blackout, now);
        }

        // 2. Demand
        let demand_mw = self.forecast.demand_at(now.time());

        // 3-4. Greedy allocation: renewables, nuclear, thermal
        let mut remaining = demand_mw;
        for order in [&tiers.renewables, &tiers.nuclear, &tiers.thermal] {
            remaining = dispatch::assign_generation(plants, order, remaining)?;
        }

        // 5-6. Stability and curtailment
        if dispatch::grid_stability(plants) < MIN_GRID_STABILITY {
            let curtailment = dispatch::curtail_renewables(plants, MIN_GRID_STABILITY);
            remaining = remaining.max(0.0) + curtailment.released_mw;
            debug!(
                minute,
                disconnected = curtailment.disconnected.len(),
                released_mw = curtailment.released_mw,
                stability = curtailment.stability,
                "curtailment pass"
            );
        }

        // 7. Unmet pool back to nuclear
        if remaining > 0.0 {
            let unmet = dispatch::assign_generation(plants, &tiers.nuclear, remaining)?;
            debug!(minute, pool_mw = remaining, unmet_mw = unmet, "nuclear reassignment");
        }

        for (idx, plant) in plants.iter().enumerate() {
            if plant.state() == PlantState::Online && !seen_online[idx] {
                seen_online[idx] = true;
                debug!(
                    minute,
                    plant = %plant.id(),
                    family = plant.family().label(),
                    name = plant.name(),
                    "plant online"
                );
            }
        }

        // 8. Snapshot
        let stability = dispatch::grid_stability(plants);
        let generated_mw = dispatch::total_generation(plants);
        trace!(minute, demand_mw, generated_mw, stability, "minute simulated");
        let snapshot = MinuteSnapshot::new(
            now,
            demand_mw,
            stability,
            generated_mw,
            dispatch::generation_by_family(plants),
        )?;
        Ok(snapshot)
    }

    pub fn plants(&self) -> &[Plant] {
        self.roster.plants()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn forecast(&self) -> &DemandForecast {
        &self.forecast
    }

    /// Snapshots of the last successful run; empty before any run and after
    /// a failed one.
    pub fn snapshots(&self) -> &[MinuteSnapshot] {
        &self.snapshots
    }

    /// Blackout instant of the last run, truncated to the minute.
    pub fn blackout(&self) -> Option<NaiveDateTime> {
        self.blackout
    }

    /// Last minute simulated, if a run has started.
    pub fn current_instant(&self) -> Option<NaiveDateTime> {
        self.current
    }
}
