//! Plant catalog: families, plant records and the roster arena.

/// Family taxonomy and per-family constants.
pub mod family;
pub mod plant;
pub mod roster;

pub use family::{AvailabilityWindow, FuelGasProfile, FuelKind, PlantFamily, Tier};
pub use plant::{Plant, PlantId, PlantSpec, PlantState};
pub use roster::Roster;
