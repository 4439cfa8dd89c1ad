//! Per-minute allocation: priority tiers, greedy assignment, grid stability
//! and curtailment.
//!
//! Every function here works on the roster slice in identity order and on
//! indices into it, so tie-breaks by identity reduce to tie-breaks by index.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PlantError;
use crate::plants::{Plant, PlantState, Tier};

/// Roster indices grouped by dispatch tier, each in its allocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTiers {
    /// Renewables by descending stability, ties by ascending identity.
    pub renewables: Vec<usize>,
    /// Nuclear plants by ascending identity.
    pub nuclear: Vec<usize>,
    /// Thermal plants by ascending identity.
    pub thermal: Vec<usize>,
}

impl DispatchTiers {
    /// Groups the roster into tiers. Only static attributes are read, so the
    /// result is the same for every minute of a run.
    pub fn build(plants: &[Plant]) -> Self {
        let mut tiers = Self::default();
        for (idx, plant) in plants.iter().enumerate() {
            match plant.family().tier() {
                Tier::Renewable => tiers.renewables.push(idx),
                Tier::Nuclear => tiers.nuclear.push(idx),
                Tier::Thermal => tiers.thermal.push(idx),
            }
        }
        tiers.renewables.sort_by(|&a, &b| {
            plants[b]
                .stability()
                .total_cmp(&plants[a].stability())
                .then(plants[a].id().cmp(&plants[b].id()))
        });
        tiers
    }
}

/// Greedily assigns `demand_mw` across `order` and returns what is left.
///
/// Stops as soon as nothing remains. A plant whose assignment grew is put
/// online.
///
/// # Errors
///
/// Propagates `PlantError::NegativeOutputRequest`, which only a corrupted
/// demand value can trigger.
pub fn assign_generation(
    plants: &mut [Plant],
    order: &[usize],
    demand_mw: f64,
) -> Result<f64, PlantError> {
    let mut remaining = demand_mw;
    for &idx in order {
        if remaining <= 0.0 {
            break;
        }
        let plant = &mut plants[idx];
        let added = plant.assign_output(remaining)?;
        if added > 0.0 {
            plant.set_online();
        }
        remaining -= added;
    }
    Ok(remaining)
}

/// Capacity-weighted average stability of everything generating.
///
/// Defined as 1.0 when nothing generates.
pub fn grid_stability(plants: &[Plant]) -> f64 {
    let (weighted, total) = plants.iter().fold((0.0, 0.0), |(w, t), plant| {
        let output = plant.simulated_output_mw();
        (w + output * plant.stability(), t + output)
    });
    if total == 0.0 {
        1.0
    } else {
        (weighted / total).clamp(0.0, 1.0)
    }
}

/// Total generation fed to the grid.
pub fn total_generation(plants: &[Plant]) -> f64 {
    plants.iter().map(Plant::simulated_output_mw).sum()
}

/// Generation per family label, omitting families with no output.
pub fn generation_by_family(plants: &[Plant]) -> BTreeMap<String, f64> {
    let mut by_family = BTreeMap::new();
    for plant in plants {
        let output = plant.simulated_output_mw();
        if output > 0.0 {
            *by_family
                .entry(plant.family().label().to_string())
                .or_insert(0.0) += output;
        }
    }
    by_family
}

/// Outcome of one curtailment pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Curtailment {
    /// Grid stability after the pass.
    pub stability: f64,
    /// Output released back to the unmet pool (MW).
    pub released_mw: f64,
    /// Roster indices disconnected, in disconnection order.
    pub disconnected: Vec<usize>,
}

/// Disconnects online renewables until stability reaches `threshold`.
///
/// Candidates are taken lowest stability first; among equal stabilities the
/// most recently registered plant goes first. The pass stops once the
/// threshold is met or no online renewable is left.
pub fn curtail_renewables(plants: &mut [Plant], threshold: f64) -> Curtailment {
    let mut stability = grid_stability(plants);
    let mut outcome = Curtailment {
        stability,
        released_mw: 0.0,
        disconnected: Vec::new(),
    };
    if stability >= threshold {
        return outcome;
    }

    let mut candidates: Vec<usize> = plants
        .iter()
        .enumerate()
        .filter(|(_, p)| p.family().is_renewable() && p.state() == PlantState::Online)
        .map(|(idx, _)| idx)
        .collect();
    candidates.sort_by(|&a, &b| {
        plants[a]
            .stability()
            .total_cmp(&plants[b].stability())
            .then(plants[b].id().cmp(&plants[a].id()))
    });

    for idx in candidates {
        if stability >= threshold {
            break;
        }
        let released = plants[idx].disconnect();
        outcome.released_mw += released;
        outcome.disconnected.push(idx);
        stability = grid_stability(plants);
        debug!(
            plant = %plants[idx].id(),
            family = plants[idx].family().label(),
            released_mw = released,
            stability,
            "curtailed renewable"
        );
    }
    outcome.stability = stability;
    outcome
}
