//! Plant growth state.

use garden_core::Species;
use std::sync::Arc;

/// Result of advancing a plant by one growth tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// Advanced to the given stage
    Grew { stage: u32 },
    /// Conditions hold but the plant is already at its final stage
    Mature,
    /// Moisture left the tolerance band; the plant must be removed
    Died,
}

/// A plant growing in a single cell.
///
/// The plant does not point back at its cell: whoever holds it passes the
/// cell's current moisture in when evaluating growth.
#[derive(Debug, Clone)]
pub struct Plant {
    species: Arc<Species>,
    stage: u32,
}

impl Plant {
    pub fn new(species: Arc<Species>) -> Self {
        Self { species, stage: 0 }
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn is_mature(&self) -> bool {
        self.stage + 1 >= self.species.growth_stages
    }

    pub fn can_grow(&self, moisture: f32) -> bool {
        self.species.tolerates(moisture)
    }

    /// Advance one stage if `moisture` suits the species
    pub fn tick_growth(&mut self, moisture: f32) -> GrowthOutcome {
        if !self.can_grow(moisture) {
            return GrowthOutcome::Died;
        }

        if self.is_mature() {
            return GrowthOutcome::Mature;
        }

        self.stage += 1;
        GrowthOutcome::Grew { stage: self.stage }
    }

    pub fn icon(&self) -> &str {
        self.species.icon_for_stage(self.stage)
    }
}
