//! Per-position garden state.

use crate::plant::{GrowthOutcome, Plant};
use garden_core::{Species, Terrain};
use std::sync::Arc;

/// A single grid cell.
///
/// Water cells always hold moisture 1 and never hold a plant.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    terrain: Terrain,
    moisture: f32,
    plant: Option<Plant>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn moisture(&self) -> f32 {
        self.moisture
    }

    pub fn plant(&self) -> Option<&Plant> {
        self.plant.as_ref()
    }

    pub fn has_plant(&self) -> bool {
        self.plant.is_some()
    }

    /// Change the terrain. Turning a cell into water saturates it and
    /// returns the plant that was washed away, if any.
    pub fn change_terrain(&mut self, terrain: Terrain) -> Option<Plant> {
        self.terrain = terrain;
        if terrain.is_water() {
            self.moisture = 1.0;
            return self.plant.take();
        }
        None
    }

    /// Set moisture from the summed water contribution of the neighbourhood.
    /// Water cells ignore it and stay saturated.
    pub fn recalculate_moisture(&mut self, water_contribution: f32) -> f32 {
        self.moisture = if self.terrain.is_water() {
            1.0
        } else {
            water_contribution.min(1.0)
        };
        self.moisture
    }

    /// Plant a seed of `species`. Rejected on water and on cells that
    /// already hold a plant.
    pub fn plant_seed(&mut self, species: Arc<Species>) -> bool {
        if self.terrain != Terrain::Land || self.plant.is_some() {
            return false;
        }
        self.plant = Some(Plant::new(species));
        true
    }

    pub fn remove_plant(&mut self) -> Option<Plant> {
        self.plant.take()
    }

    /// Whether the current plant tolerates this cell's moisture
    pub fn can_plant_grow(&self) -> bool {
        self.plant
            .as_ref()
            .map_or(false, |plant| plant.can_grow(self.moisture))
    }

    /// Run one growth tick for the plant in this cell, removing it on death
    pub fn tick_plant(&mut self) -> Option<GrowthOutcome> {
        let moisture = self.moisture;
        let outcome = self.plant.as_mut()?.tick_growth(moisture);
        if outcome == GrowthOutcome::Died {
            self.plant = None;
        }
        Some(outcome)
    }
}
