//! Turns a scenario configuration into a ready-to-run engine.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, ScenarioConfig};
use crate::error::{Error, SimulationError};
use crate::forecast::{DailyProfile, DemandForecast};
use crate::io::LoadError;
use crate::io::demand::load_demand;
use crate::io::roster::load_roster;
use crate::sim::engine::RecoveryEngine;

/// A scenario could not be turned into an engine.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid scenario:\n{}", join_errors(.0))]
    Invalid(Vec<ConfigError>),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("plant \"{name}\": {source}")]
    Plant {
        name: String,
        #[source]
        source: Error,
    },
    #[error(transparent)]
    Core(#[from] Error),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An engine with its roster registered, plus the blackout to replay.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: RecoveryEngine,
    pub blackout: NaiveDateTime,
}

impl Scenario {
    /// Validates `cfg`, loads its forecast and roster and registers every
    /// plant, file roster first.
    ///
    /// # Arguments
    ///
    /// * `cfg` - Scenario configuration
    /// * `blackout_override` - Blackout instant taking precedence over the configured one
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Invalid` with every validation failure, a load
    /// error for unreadable files, `ScenarioError::Plant` for the first plant
    /// rejected by the engine, or a precondition error if no blackout is known.
    pub fn build(
        cfg: &ScenarioConfig,
        blackout_override: Option<NaiveDateTime>,
    ) -> Result<Self, ScenarioError> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(ScenarioError::Invalid(errors));
        }

        let blackout = match blackout_override {
            Some(instant) => instant,
            None => cfg
                .blackout()?
                .ok_or(Error::from(SimulationError::MissingBlackout))?,
        };

        let forecast = build_forecast(cfg)?;
        let mut engine = RecoveryEngine::with_fuel_gas(forecast, cfg.fuel_gas);

        let mut specs = match &cfg.roster.path {
            Some(path) => load_roster(path)?,
            None => Vec::new(),
        };
        specs.extend(cfg.plants.iter().cloned());
        for spec in &specs {
            engine
                .add_plant(spec)
                .map_err(|source| ScenarioError::Plant {
                    name: spec.name.clone(),
                    source,
                })?;
        }

        let roster = engine.roster();
        for (family, deliverable_mw) in roster.deliverable_by_family() {
            debug!(family = family.label(), deliverable_mw, "roster capacity");
        }
        debug!(
            stability = roster.fuel_gas().stability,
            restart_minutes = roster.fuel_gas().restart_minutes,
            "fuel-gas profile"
        );
        info!(
            plants = engine.plants().len(),
            blackout = %blackout,
            peak_demand_mw = engine.forecast().peak_mw(),
            "scenario ready"
        );
        Ok(Self { engine, blackout })
    }
}

/// Loads the forecast file, or samples the synthetic profile when none is set.
///
/// # Errors
///
/// Returns a load error for an unreadable or incomplete file, or a forecast
/// error if the profile produces invalid demand.
pub fn build_forecast(cfg: &ScenarioConfig) -> Result<DemandForecast, ScenarioError> {
    let fc = &cfg.forecast;
    match &fc.path {
        Some(path) => Ok(load_demand(path)?),
        None => DailyProfile::new(fc.base_mw, fc.amp_mw, fc.phase_rad, fc.noise_std_mw, fc.seed)
            .into_forecast()
            .map_err(|e| ScenarioError::Core(e.into())),
    }
}
