//! Contract between the simulation and whatever draws it.

use crate::cell::Cell;
use garden_core::{Position, SpeciesId, Terrain};
use serde::Serialize;

/// Snapshot of a plant as a renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantView {
    pub species: SpeciesId,
    pub name: String,
    /// Zero-based growth stage
    pub stage: u32,
    pub growth_stages: u32,
    pub icon: String,
    /// Whether the plant would survive a tick at the current moisture
    pub can_grow: bool,
}

/// Snapshot of a cell after a change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub position: Position,
    pub terrain: Terrain,
    pub moisture: f32,
    pub plant: Option<PlantView>,
}

impl CellView {
    pub fn of(position: Position, cell: &Cell) -> Self {
        let plant = cell.plant().map(|plant| PlantView {
            species: plant.species().id.clone(),
            name: plant.species().name.clone(),
            stage: plant.stage(),
            growth_stages: plant.species().growth_stages,
            icon: plant.icon().to_string(),
            can_grow: plant.can_grow(cell.moisture()),
        });

        Self {
            position,
            terrain: cell.terrain(),
            moisture: cell.moisture(),
            plant,
        }
    }
}

/// Receives cell change notifications from the simulation
pub trait Renderer {
    fn on_cell_changed(&mut self, view: &CellView);
}

impl<F> Renderer for F
where
    F: FnMut(&CellView),
{
    fn on_cell_changed(&mut self, view: &CellView) {
        self(view)
    }
}
