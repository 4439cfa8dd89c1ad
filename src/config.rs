//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plants::{FuelGasProfile, PlantSpec};

/// Formats accepted for instants in scenario files and on the command line.
const INSTANT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses an instant such as `2025-04-28T12:33:00` or `2025-04-28 12:33`.
///
/// # Errors
///
/// Returns a `ConfigError` on `field` if no accepted format matches.
pub fn parse_instant(field: &str, value: &str) -> Result<NaiveDateTime, ConfigError> {
    let value = value.trim();
    INSTANT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ConfigError {
            field: field.to_string(),
            message: format!("cannot parse \"{value}\" as YYYY-MM-DD[T ]HH:MM[:SS]"),
        })
}

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::from_preset`]
/// for a built-in scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run trigger.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Demand forecast source.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Stability and restart time of fuel-gas plants.
    #[serde(default)]
    pub fuel_gas: FuelGasProfile,
    /// Roster file.
    #[serde(default)]
    pub roster: RosterConfig,
    /// Inline plants, registered after the roster file.
    #[serde(default)]
    pub plants: Vec<PlantSpec>,
}

/// Run trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Blackout instant, e.g. `"2025-04-28T12:33:00"`.
    pub blackout: Option<String>,
}

/// Demand forecast source: a CSV file, or else a synthetic daily profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// `HH:MM,demand` file; when set the profile parameters are ignored.
    pub path: Option<PathBuf>,
    /// Average demand (MW).
    pub base_mw: f64,
    /// Daily swing amplitude (MW).
    pub amp_mw: f64,
    /// Phase offset (radians).
    pub phase_rad: f64,
    /// Gaussian noise standard deviation (MW).
    pub noise_std_mw: f64,
    /// Noise seed.
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            path: None,
            base_mw: 28_000.0,
            amp_mw: 5_000.0,
            phase_rad: -1.6,
            noise_std_mw: 0.0,
            seed: 42,
        }
    }
}

/// Plant roster file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    /// `type,name,lat,lon,city,cap` file.
    pub path: Option<PathBuf>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"forecast.base_mw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

fn plant(kind: &str, name: &str, lat: f64, lon: f64, city: &str, mw: f64) -> PlantSpec {
    PlantSpec::new(kind, name, lat, lon, city, mw)
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a mixed national roster recovering from
    /// a midday blackout.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig {
                blackout: Some("2025-04-28T12:33:00".to_string()),
            },
            forecast: ForecastConfig::default(),
            fuel_gas: FuelGasProfile::default(),
            roster: RosterConfig::default(),
            plants: vec![
                plant("NUCLEAR", "Almaraz I", 39.807, -5.697, "Almaraz", 1049.0),
                plant("NUCLEAR", "Almaraz II", 39.807, -5.697, "Almaraz", 1044.0),
                plant("NUCLEAR", "Ascó I", 41.200, 0.569, "Ascó", 1033.0),
                plant("NUCLEAR", "Cofrentes", 39.214, -1.050, "Cofrentes", 1092.0),
                plant("NUCLEAR", "Trillo", 40.701, -2.622, "Trillo", 1066.0),
                plant("COAL", "As Pontes", 43.440, -7.862, "As Pontes", 1400.0),
                plant("COAL", "Litoral", 36.979, -1.905, "Carboneras", 1159.0),
                plant("COMBINED_CYCLE", "Besós", 41.418, 2.226, "Sant Adrià", 1600.0),
                plant("COMBINED_CYCLE", "Castejón", 42.170, -1.690, "Castejón", 1200.0),
                plant("COMBINED_CYCLE", "Arcos", 36.751, -5.807, "Arcos", 1600.0),
                plant("BIOMASS", "Huelva", 37.250, -6.950, "Huelva", 50.0),
                plant("FUEL_GAS", "Son Reus", 39.638, 2.632, "Palma", 470.0),
                plant("HYDRO", "Aldeadávila", 41.211, -6.686, "Aldeadávila", 1243.0)
                    .with_efficiency(0.7),
                plant("HYDRO", "José María de Oriol", 39.725, -6.887, "Alcántara", 957.0)
                    .with_efficiency(0.6),
                plant("WIND", "Sierra de Alaiz", 42.700, -1.600, "Monreal", 2500.0)
                    .with_efficiency(0.35),
                plant("WIND", "Maranchón", 41.050, -2.200, "Maranchón", 2000.0)
                    .with_efficiency(0.3),
                plant("SOLAR", "Núñez de Balboa", 38.420, -6.280, "Usagre", 500.0)
                    .with_efficiency(0.8),
                plant("SOLAR", "Mula", 38.040, -1.490, "Mula", 494.0).with_efficiency(0.75),
            ],
        }
    }

    /// Returns the renewable-heavy preset: a wind and solar dominated roster
    /// with little firm capacity, so the stability floor forces curtailment.
    pub fn renewable_heavy() -> Self {
        Self {
            simulation: SimulationConfig {
                blackout: Some("2025-04-28T06:00:00".to_string()),
            },
            forecast: ForecastConfig {
                base_mw: 9_000.0,
                amp_mw: 2_000.0,
                noise_std_mw: 150.0,
                seed: 7,
                ..ForecastConfig::default()
            },
            fuel_gas: FuelGasProfile::default(),
            roster: RosterConfig::default(),
            plants: vec![
                plant("NUCLEAR", "Vandellós II", 40.951, 0.866, "Vandellós", 1087.0),
                plant("COMBINED_CYCLE", "Sagunto", 39.650, -0.230, "Sagunto", 1200.0),
                plant("HYDRO", "Mequinenza", 41.371, 0.269, "Mequinenza", 324.0)
                    .with_efficiency(0.6),
                plant("WIND", "Sierra de Alaiz", 42.700, -1.600, "Monreal", 4000.0)
                    .with_efficiency(0.4),
                plant("WIND", "Maranchón", 41.050, -2.200, "Maranchón", 3500.0)
                    .with_efficiency(0.35),
                plant("WIND", "Tarifa", 36.030, -5.600, "Tarifa", 3000.0).with_efficiency(0.45),
                plant("SOLAR", "Núñez de Balboa", 38.420, -6.280, "Usagre", 3000.0)
                    .with_efficiency(0.8),
                plant("SOLAR", "Francisco Pizarro", 39.490, -5.520, "Torrecillas", 2500.0)
                    .with_efficiency(0.8),
            ],
        }
    }

    /// Returns the single nuclear plant preset: 1000 MW against a flat 500 MW
    /// demand, blackout at midnight.
    pub fn nuclear_only() -> Self {
        Self {
            simulation: SimulationConfig {
                blackout: Some("2025-04-28T00:00:00".to_string()),
            },
            forecast: ForecastConfig {
                base_mw: 500.0,
                amp_mw: 0.0,
                phase_rad: 0.0,
                noise_std_mw: 0.0,
                ..ForecastConfig::default()
            },
            fuel_gas: FuelGasProfile::default(),
            roster: RosterConfig::default(),
            plants: vec![plant("NUCLEAR", "Trillo", 40.701, -2.622, "Trillo", 1000.0)],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "renewable_heavy", "nuclear_only"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "renewable_heavy" => Ok(Self::renewable_heavy()),
            "nuclear_only" => Ok(Self::nuclear_only()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative `forecast.path` and `roster.path` values are resolved against
    /// the directory holding the file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let Some(base_dir) = path.parent() {
            cfg.resolve_paths(base_dir);
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Makes relative file paths relative to `base_dir`.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for path in [&mut self.forecast.path, &mut self.roster.path]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }

    /// Parsed blackout instant, `None` when not configured.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configured value does not parse.
    pub fn blackout(&self) -> Result<Option<NaiveDateTime>, ConfigError> {
        self.simulation
            .blackout
            .as_deref()
            .map(|s| parse_instant("simulation.blackout", s))
            .transpose()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Plant attributes are
    /// checked when the plants are registered, not here.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.blackout() {
            errors.push(e);
        }

        let fc = &self.forecast;
        if fc.path.is_none() {
            for (field, value) in [
                ("forecast.base_mw", fc.base_mw),
                ("forecast.amp_mw", fc.amp_mw),
                ("forecast.phase_rad", fc.phase_rad),
                ("forecast.noise_std_mw", fc.noise_std_mw),
            ] {
                if !value.is_finite() {
                    errors.push(ConfigError {
                        field: field.into(),
                        message: "must be a finite number".into(),
                    });
                }
            }
            if fc.base_mw < 0.0 {
                errors.push(ConfigError {
                    field: "forecast.base_mw".into(),
                    message: "must be >= 0".into(),
                });
            }
            if fc.amp_mw < 0.0 {
                errors.push(ConfigError {
                    field: "forecast.amp_mw".into(),
                    message: "must be >= 0".into(),
                });
            }
            if fc.noise_std_mw < 0.0 {
                errors.push(ConfigError {
                    field: "forecast.noise_std_mw".into(),
                    message: "must be >= 0".into(),
                });
            }
        }

        let fg = &self.fuel_gas;
        if !(0.0..=1.0).contains(&fg.stability) {
            errors.push(ConfigError {
                field: "fuel_gas.stability".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if fg.restart_minutes < 0 {
            errors.push(ConfigError {
                field: "fuel_gas.restart_minutes".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.roster.path.is_none() && self.plants.is_empty() {
            errors.push(ConfigError {
                field: "plants".into(),
                message: "no plants configured (set roster.path or add [[plants]])".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let e = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
blackout = "2025-04-28 12:33"

[forecast]
base_mw = 1000.0
amp_mw = 100.0
seed = 7

[fuel_gas]
stability = 0.55
restart_minutes = 45

[[plants]]
kind = "NUCLEAR"
name = "Almaraz I"
latitude = 39.8
longitude = -5.69
city = "Almaraz"
max_capacity_mw = 1049.0

[[plants]]
kind = "WIND"
name = "Maranchón"
latitude = 41.05
longitude = -2.2
city = "Maranchón"
max_capacity_mw = 200.0
efficiency = 0.3
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.plants.len(), 2);
        assert_eq!(cfg.plants[0].efficiency, 1.0);
        assert_eq!(cfg.plants[1].efficiency, 0.3);
        assert_eq!(cfg.fuel_gas.restart_minutes, 45);
        assert_eq!(cfg.forecast.phase_rad, -1.6);
        let blackout = cfg.blackout().unwrap().unwrap();
        assert_eq!(blackout.format("%H:%M").to_string(), "12:33");
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
blackout = "2025-04-28T12:33:00"
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_fuel_gas_section_uses_defaults() {
        let toml = r#"
[fuel_gas]
stability = 0.4
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.fuel_gas.stability, 0.4);
        assert_eq!(cfg.fuel_gas.restart_minutes, 60);
    }

    #[test]
    fn validation_catches_bad_blackout() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.blackout = Some("yesterday".into());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.blackout"));
    }

    #[test]
    fn validation_catches_empty_roster_and_bad_fuel_gas() {
        let mut cfg = ScenarioConfig::default();
        cfg.fuel_gas.stability = 1.2;
        cfg.fuel_gas.restart_minutes = -1;
        cfg.forecast.noise_std_mw = -3.0;
        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"plants".to_string()));
        assert!(fields.contains(&"fuel_gas.stability".to_string()));
        assert!(fields.contains(&"fuel_gas.restart_minutes".to_string()));
        assert!(fields.contains(&"forecast.noise_std_mw".to_string()));
    }

    #[test]
    fn missing_blackout_is_not_a_validation_error() {
        let mut cfg = ScenarioConfig::nuclear_only();
        cfg.simulation.blackout = None;
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.blackout(), Ok(None));
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let mut cfg = ScenarioConfig::default();
        cfg.forecast.path = Some(PathBuf::from("demand.csv"));
        cfg.roster.path = Some(PathBuf::from("/abs/plants.csv"));
        cfg.resolve_paths(Path::new("scenarios"));
        assert_eq!(cfg.forecast.path, Some(PathBuf::from("scenarios/demand.csv")));
        assert_eq!(cfg.roster.path, Some(PathBuf::from("/abs/plants.csv")));
    }

    #[test]
    fn instants_accept_several_formats() {
        for s in [
            "2025-04-28T12:33:00",
            "2025-04-28T12:33",
            "2025-04-28 12:33:00",
            " 2025-04-28 12:33 ",
        ] {
            assert!(parse_instant("x", s).is_ok(), "{s}");
        }
        assert!(parse_instant("x", "28/04/2025").is_err());
    }
}
