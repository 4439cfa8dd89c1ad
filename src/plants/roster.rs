//! Arena of plants indexed by identity.

use super::family::{FuelGasProfile, PlantFamily};
use super::plant::{Plant, PlantId, PlantSpec};
use crate::error::PlantError;

/// Ordered collection of plants owned by one engine.
///
/// Identities are issued by the roster itself, in registration order, so the
/// position of a plant in [`Roster::plants`] always matches identity order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    plants: Vec<Plant>,
    next_id: u32,
    fuel_gas: FuelGasProfile,
}

impl Roster {
    /// Creates an empty roster whose fuel-gas plants use `fuel_gas`.
    pub fn new(fuel_gas: FuelGasProfile) -> Self {
        Self {
            plants: Vec::new(),
            next_id: 0,
            fuel_gas,
        }
    }

    /// Validates `spec`, builds the matching family and appends it.
    ///
    /// A rejected spec does not consume an identity.
    ///
    /// # Errors
    ///
    /// Returns `PlantError::UnknownFamily` for an unrecognised kind, or the
    /// attribute error raised by [`Plant::new`].
    pub fn add(&mut self, spec: &PlantSpec) -> Result<PlantId, PlantError> {
        let family: PlantFamily = spec.kind.parse()?;
        let id = PlantId(self.next_id);
        let plant = Plant::new(id, family, spec, &self.fuel_gas)?;
        self.plants.push(plant);
        self.next_id += 1;
        Ok(id)
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub(crate) fn plants_mut(&mut self) -> &mut [Plant] {
        &mut self.plants
    }

    /// Looks up a plant by identity.
    pub fn get(&self, id: PlantId) -> Option<&Plant> {
        self.plants
            .binary_search_by_key(&id, Plant::id)
            .ok()
            .map(|idx| &self.plants[idx])
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn fuel_gas(&self) -> &FuelGasProfile {
        &self.fuel_gas
    }

    /// Total deliverable output of the roster, per family present.
    pub fn deliverable_by_family(&self) -> Vec<(PlantFamily, f64)> {
        PlantFamily::ALL
            .into_iter()
            .filter_map(|family| {
                let mut members = self.plants.iter().filter(|p| p.family() == family).peekable();
                members.peek()?;
                Some((family, members.map(Plant::max_output_mw).sum::<f64>()))
            })
            .collect()
    }
}
