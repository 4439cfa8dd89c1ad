//! Closed taxonomy of plant families and their per-family constants.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::PlantError;

/// Restart time of a nuclear plant after a blackout (24 h).
const NUCLEAR_RESTART_MINUTES: i64 = 24 * 60;
const COAL_RESTART_MINUTES: i64 = 8 * 60;
const COMBINED_CYCLE_RESTART_MINUTES: i64 = 2 * 60;
const BIOMASS_RESTART_MINUTES: i64 = 3 * 60;
const HYDRO_RESTART_MINUTES: i64 = 3;
const WIND_RESTART_MINUTES: i64 = 6;
const SOLAR_RESTART_MINUTES: i64 = 6;

/// Solar generates from 07:00 through 18:59 inclusive.
const SOLAR_WINDOW: AvailabilityWindow = AvailabilityWindow::Daily {
    start_minute: 7 * 60,
    end_minute: 18 * 60 + 59,
};

/// Dispatch priority tier a family belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Renewable,
    Nuclear,
    Thermal,
}

/// Fuel burnt by a thermal plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelKind {
    Coal,
    NaturalGas,
    Biomass,
    FuelGas,
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Coal => "Coal",
            Self::NaturalGas => "Natural gas",
            Self::Biomass => "Biomass",
            Self::FuelGas => "Fuel gas",
        };
        f.write_str(s)
    }
}

/// Daily time-of-day interval during which a plant can physically generate.
///
/// Bounds are whole minutes of the day and inclusive on both ends: an instant
/// is inside the window unless it lies strictly after the end minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityWindow {
    FullDay,
    Daily { start_minute: u32, end_minute: u32 },
}

impl AvailabilityWindow {
    /// Returns true if `time` lies within the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        match *self {
            Self::FullDay => true,
            Self::Daily {
                start_minute,
                end_minute,
            } => {
                let secs = time.num_seconds_from_midnight();
                let start = start_minute * 60;
                let end = end_minute * 60;
                secs >= start && (secs < end || (secs == end && time.nanosecond() == 0))
            }
        }
    }
}

impl fmt::Display for AvailabilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::FullDay => f.write_str("00:00-23:59"),
            Self::Daily {
                start_minute,
                end_minute,
            } => write!(
                f,
                "{:02}:{:02}-{:02}:{:02}",
                start_minute / 60,
                start_minute % 60,
                end_minute / 60,
                end_minute % 60
            ),
        }
    }
}

/// Stability and restart time of the fuel-gas family, which unlike the other
/// families is not fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuelGasProfile {
    /// Plant stability (0.0 to 1.0).
    pub stability: f64,
    /// Minutes after the blackout before the plant may generate.
    pub restart_minutes: i64,
}

impl Default for FuelGasProfile {
    fn default() -> Self {
        Self {
            stability: 0.6,
            restart_minutes: 60,
        }
    }
}

/// The eight plant families a roster may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlantFamily {
    Nuclear,
    Coal,
    CombinedCycle,
    Biomass,
    FuelGas,
    Hydro,
    Wind,
    Solar,
}

impl PlantFamily {
    /// Every family, in the order used for tabular output.
    pub const ALL: [PlantFamily; 8] = [
        Self::Nuclear,
        Self::Coal,
        Self::CombinedCycle,
        Self::Biomass,
        Self::FuelGas,
        Self::Hydro,
        Self::Wind,
        Self::Solar,
    ];

    pub fn tier(self) -> Tier {
        match self {
            Self::Nuclear => Tier::Nuclear,
            Self::Coal | Self::CombinedCycle | Self::Biomass | Self::FuelGas => Tier::Thermal,
            Self::Hydro | Self::Wind | Self::Solar => Tier::Renewable,
        }
    }

    /// True for families whose deliverable output is scaled by efficiency.
    pub fn is_renewable(self) -> bool {
        self.tier() == Tier::Renewable
    }

    /// Human-readable label, used as the key of per-family generation.
    pub fn label(self) -> &'static str {
        match self {
            Self::Nuclear => "Nuclear",
            Self::Coal => "Coal",
            Self::CombinedCycle => "Combined cycle",
            Self::Biomass => "Biomass",
            Self::FuelGas => "Fuel gas",
            Self::Hydro => "Hydroelectric",
            Self::Wind => "Wind",
            Self::Solar => "Solar",
        }
    }

    /// Family kind string as it appears in roster files.
    pub fn kind_name(self) -> &'static str {
        match self {
            Self::Nuclear => "NUCLEAR",
            Self::Coal => "COAL",
            Self::CombinedCycle => "COMBINED_CYCLE",
            Self::Biomass => "BIOMASS",
            Self::FuelGas => "FUEL_GAS",
            Self::Hydro => "HYDRO",
            Self::Wind => "WIND",
            Self::Solar => "SOLAR",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Nuclear => "nuclear.png",
            Self::Coal => "coal.png",
            Self::CombinedCycle => "combined_cycle.png",
            Self::Biomass => "biomass.png",
            Self::FuelGas => "fuel_gas.png",
            Self::Hydro => "hydro.png",
            Self::Wind => "wind.png",
            Self::Solar => "solar.png",
        }
    }

    /// Fuel burnt by the family, `None` for nuclear and renewables.
    pub fn fuel(self) -> Option<FuelKind> {
        match self {
            Self::Coal => Some(FuelKind::Coal),
            Self::CombinedCycle => Some(FuelKind::NaturalGas),
            Self::Biomass => Some(FuelKind::Biomass),
            Self::FuelGas => Some(FuelKind::FuelGas),
            Self::Nuclear | Self::Hydro | Self::Wind | Self::Solar => None,
        }
    }

    /// Stability constant of the family.
    pub fn stability(self, fuel_gas: &FuelGasProfile) -> f64 {
        match self {
            Self::Nuclear => 1.0,
            Self::Coal => 0.9,
            Self::CombinedCycle => 0.7,
            Self::Biomass => 0.5,
            Self::FuelGas => fuel_gas.stability,
            Self::Hydro => 0.8,
            Self::Wind => 0.2,
            Self::Solar => 0.1,
        }
    }

    /// Minutes after the blackout before the family may generate.
    pub fn restart_minutes(self, fuel_gas: &FuelGasProfile) -> i64 {
        match self {
            Self::Nuclear => NUCLEAR_RESTART_MINUTES,
            Self::Coal => COAL_RESTART_MINUTES,
            Self::CombinedCycle => COMBINED_CYCLE_RESTART_MINUTES,
            Self::Biomass => BIOMASS_RESTART_MINUTES,
            Self::FuelGas => fuel_gas.restart_minutes,
            Self::Hydro => HYDRO_RESTART_MINUTES,
            Self::Wind => WIND_RESTART_MINUTES,
            Self::Solar => SOLAR_RESTART_MINUTES,
        }
    }

    pub fn window(self) -> AvailabilityWindow {
        match self {
            Self::Solar => SOLAR_WINDOW,
            _ => AvailabilityWindow::FullDay,
        }
    }
}

impl fmt::Display for PlantFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlantFamily {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.kind_name().eq_ignore_ascii_case(kind))
            .ok_or_else(|| PlantError::UnknownFamily(kind.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_kind_names_case_insensitively() {
        assert_eq!("NUCLEAR".parse::<PlantFamily>(), Ok(PlantFamily::Nuclear));
        assert_eq!(
            " combined_cycle ".parse::<PlantFamily>(),
            Ok(PlantFamily::CombinedCycle)
        );
        assert_eq!("Fuel_Gas".parse::<PlantFamily>(), Ok(PlantFamily::FuelGas));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "GEOTHERMAL".parse::<PlantFamily>().unwrap_err();
        assert_eq!(err, PlantError::UnknownFamily("GEOTHERMAL".to_string()));
    }

    #[test]
    fn tiers_partition_the_families() {
        let renewables: Vec<_> = PlantFamily::ALL
            .into_iter()
            .filter(|f| f.is_renewable())
            .collect();
        assert_eq!(
            renewables,
            vec![PlantFamily::Hydro, PlantFamily::Wind, PlantFamily::Solar]
        );
        assert_eq!(PlantFamily::Nuclear.tier(), Tier::Nuclear);
        assert_eq!(PlantFamily::FuelGas.tier(), Tier::Thermal);
    }

    #[test]
    fn constants_match_the_family_table() {
        let fg = FuelGasProfile::default();
        assert_eq!(PlantFamily::Nuclear.stability(&fg), 1.0);
        assert_eq!(PlantFamily::Nuclear.restart_minutes(&fg), 1440);
        assert_eq!(PlantFamily::Coal.restart_minutes(&fg), 480);
        assert_eq!(PlantFamily::Hydro.restart_minutes(&fg), 3);
        assert_eq!(PlantFamily::Solar.stability(&fg), 0.1);
        assert_eq!(PlantFamily::Biomass.fuel(), Some(FuelKind::Biomass));
        assert_eq!(PlantFamily::Wind.fuel(), None);
    }

    #[test]
    fn fuel_gas_follows_its_profile() {
        let fg = FuelGasProfile {
            stability: 0.45,
            restart_minutes: 90,
        };
        assert_eq!(PlantFamily::FuelGas.stability(&fg), 0.45);
        assert_eq!(PlantFamily::FuelGas.restart_minutes(&fg), 90);
    }

    #[test]
    fn solar_window_is_inclusive_at_both_ends() {
        let w = PlantFamily::Solar.window();
        assert!(!w.contains(hm(6, 59)));
        assert!(w.contains(hm(7, 0)));
        assert!(w.contains(hm(18, 59)));
        assert!(!w.contains(hm(19, 0)));
        assert!(!w.contains(NaiveTime::from_hms_opt(18, 59, 30).unwrap()));
        assert_eq!(w.to_string(), "07:00-18:59");
    }

    #[test]
    fn full_day_window_contains_midnight() {
        assert!(AvailabilityWindow::FullDay.contains(hm(0, 0)));
        assert!(AvailabilityWindow::FullDay.contains(hm(23, 59)));
    }
}
