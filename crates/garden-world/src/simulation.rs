//! Simulation engine driving moisture and plant growth.

use crate::grid::Grid;
use crate::plant::GrowthOutcome;
use crate::renderer::{CellView, Renderer};
use garden_core::{Error, GardenConfig, Position, Result, SpeciesCatalog, SpeciesId, Terrain};
use serde::Serialize;
use tracing::{debug, info, instrument};

pub struct Simulation {
    grid: Grid,
    catalog: SpeciesCatalog,
    local_recalc_threshold: i32,
    tick: u64,
    // Views queued for the renderer
    changes: Vec<CellView>,
}

impl Simulation {
    pub fn new(config: &GardenConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::from_config(config)?;

        let sim = Self::with_grid(grid, config.catalog(), config.local_recalc_threshold);

        info!(
            size = sim.grid.size(),
            species = sim.catalog.len(),
            "Garden initialized"
        );

        Ok(sim)
    }

    /// Wrap an existing grid; moisture is recalculated immediately
    pub fn with_grid(grid: Grid, catalog: SpeciesCatalog, local_recalc_threshold: i32) -> Self {
        let mut sim = Self {
            grid,
            catalog,
            local_recalc_threshold,
            tick: 0,
            changes: Vec::new(),
        };
        sim.recalculate_all_moisture();
        sim
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Number of growth ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Recompute moisture for every cell in row-major order
    pub fn recalculate_all_moisture(&mut self) {
        let positions: Vec<Position> = self.grid.positions().collect();
        for pos in positions {
            self.recalculate_cell(pos);
        }
    }

    /// Recompute moisture only where the terrain at `pos` can reach
    pub fn recalculate_moisture_near(&mut self, pos: Position) -> Result<()> {
        self.grid.cell_at(pos)?;
        let window: Vec<Position> = self.grid.moisture_window(pos).collect();
        for neighbor in window {
            self.recalculate_cell(neighbor);
        }
        Ok(())
    }

    /// Change terrain at `pos` and refresh moisture
    #[instrument(skip(self, pos), fields(x = pos.x, y = pos.y))]
    pub fn apply_terrain_change(&mut self, pos: Position, terrain: Terrain) -> Result<()> {
        if let Some(plant) = self.grid.set_terrain(pos, terrain)? {
            debug!(
                event = "plant_flooded",
                species = %plant.species().id,
                stage = plant.stage(),
                "Plant washed away by water"
            );
        }
        self.notify(pos);

        if self.grid.size() > self.local_recalc_threshold {
            self.recalculate_moisture_near(pos)?;
        } else {
            self.recalculate_all_moisture();
        }

        debug!(terrain = %terrain, "Terrain changed");
        Ok(())
    }

    /// Plant a seed at `pos`. The cell must be empty land; moisture is not
    /// checked until the next tick.
    #[instrument(skip(self, pos, species), fields(x = pos.x, y = pos.y, species = %species))]
    pub fn plant_at(&mut self, pos: Position, species: &SpeciesId) -> Result<()> {
        let species = self.catalog.lookup(species)?;
        let cell = self.grid.cell_at_mut(pos)?;

        let reason = if cell.terrain() != Terrain::Land {
            Some("cell is not land")
        } else if cell.has_plant() {
            Some("cell is already planted")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(Error::InvalidPlacement {
                x: pos.x,
                y: pos.y,
                reason: reason.to_string(),
            });
        }

        cell.plant_seed(species);
        self.notify(pos);

        debug!(event = "plant_seeded", "Seed planted");
        Ok(())
    }

    /// Remove the plant at `pos`, returning whether there was one
    pub fn remove_plant_at(&mut self, pos: Position) -> Result<bool> {
        let removed = self.grid.cell_at_mut(pos)?.remove_plant();
        if let Some(plant) = &removed {
            debug!(
                event = "plant_removed",
                x = pos.x,
                y = pos.y,
                species = %plant.species().id,
                "Plant removed"
            );
        }
        self.notify(pos);
        Ok(removed.is_some())
    }

    /// Advance every plant by one growth tick
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        let planted: Vec<Position> = self
            .grid
            .iter()
            .filter(|(_, cell)| cell.has_plant())
            .map(|(pos, _)| pos)
            .collect();

        for pos in planted {
            let Ok(cell) = self.grid.cell_at_mut(pos) else {
                continue;
            };
            let moisture = cell.moisture();

            match cell.tick_plant() {
                Some(GrowthOutcome::Grew { stage }) => {
                    report.grew += 1;
                    self.notify(pos);
                    debug!(event = "plant_grew", x = pos.x, y = pos.y, stage, "Plant grew");
                }
                Some(GrowthOutcome::Died) => {
                    report.died += 1;
                    self.notify(pos);
                    debug!(
                        event = "plant_death",
                        x = pos.x,
                        y = pos.y,
                        moisture,
                        "Plant died"
                    );
                }
                Some(GrowthOutcome::Mature) => report.mature += 1,
                None => {}
            }
        }

        info!(
            event = "growth_tick",
            tick = report.tick,
            grew = report.grew,
            died = report.died,
            mature = report.mature,
            "Growth tick complete"
        );

        report
    }

    /// Current state of the cell at `pos`
    pub fn inspect(&self, pos: Position) -> Result<CellView> {
        Ok(CellView::of(pos, self.grid.cell_at(pos)?))
    }

    /// Take all queued change notifications
    pub fn drain_changes(&mut self) -> Vec<CellView> {
        std::mem::take(&mut self.changes)
    }

    /// Deliver queued change notifications to `renderer`
    pub fn flush(&mut self, renderer: &mut dyn Renderer) -> usize {
        let changes = self.drain_changes();
        for view in &changes {
            renderer.on_cell_changed(view);
        }
        changes.len()
    }

    fn recalculate_cell(&mut self, pos: Position) {
        if self.grid.recalculate_moisture(pos).is_ok() {
            self.notify(pos);
        }
    }

    fn notify(&mut self, pos: Position) {
        if let Ok(cell) = self.grid.cell_at(pos) {
            self.changes.push(CellView::of(pos, cell));
        }
    }
}

/// Counts from a single growth tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub grew: u32,
    pub died: u32,
    pub mature: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_garden(size: i32) -> Simulation {
        let config = GardenConfig {
            size,
            initial_water: Vec::new(),
            ..Default::default()
        };
        Simulation::new(&config).unwrap()
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(&GardenConfig::default()).unwrap();
        assert_eq!(sim.grid().size(), 10);
        assert_eq!(sim.tick_count(), 0);

        let water = sim.inspect(Position::new(2, 2)).unwrap();
        assert_eq!(water.terrain, Terrain::Water);
        assert_eq!(water.moisture, 1.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GardenConfig {
            size: -1,
            ..Default::default()
        };
        assert!(matches!(Simulation::new(&config), Err(Error::InvalidSize(-1))));
    }

    #[test]
    fn test_plant_on_water_rejected() {
        let mut sim = empty_garden(5);
        sim.apply_terrain_change(Position::new(1, 1), Terrain::Water)
            .unwrap();

        let result = sim.plant_at(Position::new(1, 1), &SpeciesId::swamp());
        assert!(matches!(result, Err(Error::InvalidPlacement { x: 1, y: 1, .. })));
    }

    #[test]
    fn test_plant_on_occupied_cell_rejected() {
        let mut sim = empty_garden(5);
        let pos = Position::new(0, 0);
        sim.plant_at(pos, &SpeciesId::cactus()).unwrap();

        let result = sim.plant_at(pos, &SpeciesId::potato());
        assert!(matches!(result, Err(Error::InvalidPlacement { .. })));

        let view = sim.inspect(pos).unwrap();
        assert_eq!(view.plant.unwrap().species, SpeciesId::cactus());
    }

    #[test]
    fn test_unknown_species_rejected() {
        let mut sim = empty_garden(5);
        let result = sim.plant_at(Position::new(0, 0), &SpeciesId::new("orchid"));
        assert!(matches!(result, Err(Error::UnknownSpecies(_))));
        assert!(sim.inspect(Position::new(0, 0)).unwrap().plant.is_none());
    }

    #[test]
    fn test_out_of_bounds_leaves_state_unchanged() {
        let mut sim = empty_garden(5);
        sim.drain_changes();

        assert!(sim
            .apply_terrain_change(Position::new(5, 0), Terrain::Water)
            .is_err());
        assert!(sim.plant_at(Position::new(-1, 0), &SpeciesId::potato()).is_err());
        assert!(sim.remove_plant_at(Position::new(0, 9)).is_err());

        assert!(sim.drain_changes().is_empty());
        assert!(sim.grid().iter().all(|(_, c)| !c.terrain().is_water()));
    }

    #[test]
    fn test_remove_plant() {
        let mut sim = empty_garden(5);
        let pos = Position::new(2, 2);
        assert!(!sim.remove_plant_at(pos).unwrap());

        sim.plant_at(pos, &SpeciesId::cactus()).unwrap();
        assert!(sim.remove_plant_at(pos).unwrap());
        assert!(sim.inspect(pos).unwrap().plant.is_none());
    }

    #[test]
    fn test_flooding_removes_plant() {
        let mut sim = empty_garden(5);
        let pos = Position::new(3, 3);
        sim.plant_at(pos, &SpeciesId::cactus()).unwrap();
        sim.apply_terrain_change(pos, Terrain::Water).unwrap();

        let view = sim.inspect(pos).unwrap();
        assert_eq!(view.moisture, 1.0);
        assert!(view.plant.is_none());
    }

    #[test]
    fn test_land_restored_from_water_dries_out() {
        let mut sim = empty_garden(5);
        let pos = Position::new(0, 0);
        sim.apply_terrain_change(pos, Terrain::Water).unwrap();
        sim.apply_terrain_change(pos, Terrain::Land).unwrap();
        assert_eq!(sim.inspect(pos).unwrap().moisture, 0.0);
    }

    #[test]
    fn test_change_notifications() {
        let mut sim = empty_garden(3);
        assert_eq!(sim.drain_changes().len(), 9);

        sim.apply_terrain_change(Position::new(0, 0), Terrain::Water)
            .unwrap();
        // The changed cell plus a full recalculation
        let changes = sim.drain_changes();
        assert_eq!(changes.len(), 1 + 9);
        assert_eq!(changes[0].position, Position::new(0, 0));
        assert_eq!(changes[0].terrain, Terrain::Water);

        sim.plant_at(Position::new(2, 2), &SpeciesId::potato()).unwrap();
        let mut seen = Vec::new();
        let mut renderer = |view: &CellView| seen.push(view.clone());
        assert_eq!(sim.flush(&mut renderer), 1);
        assert_eq!(seen[0].plant.as_ref().unwrap().icon, "🌱");
    }

    #[test]
    fn test_tick_report() {
        let mut sim = empty_garden(5);
        sim.plant_at(Position::new(0, 0), &SpeciesId::cactus()).unwrap();
        sim.plant_at(Position::new(1, 0), &SpeciesId::potato()).unwrap();

        let report = sim.tick();
        assert_eq!(
            report,
            TickReport {
                tick: 1,
                grew: 1,
                died: 1,
                mature: 0,
            }
        );
        assert_eq!(sim.tick_count(), 1);
    }

    #[test]
    fn test_large_grid_uses_local_recalculation() {
        let mut sim = empty_garden(40);
        sim.drain_changes();

        sim.apply_terrain_change(Position::new(20, 20), Terrain::Water)
            .unwrap();
        assert_eq!(sim.drain_changes().len(), 1 + 25);
        assert_eq!(sim.inspect(Position::new(21, 20)).unwrap().moisture, 0.5);
    }

    #[test]
    fn test_with_grid_keeps_threshold() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_terrain(Position::new(0, 0), Terrain::Water).unwrap();

        let mut sim = Simulation::with_grid(grid, SpeciesCatalog::builtin(), 0);
        assert_eq!(sim.inspect(Position::new(1, 0)).unwrap().moisture, 0.5);
        sim.drain_changes();

        // A threshold of 0 makes every grid recalculate locally
        sim.apply_terrain_change(Position::new(4, 4), Terrain::Water)
            .unwrap();
        assert_eq!(sim.drain_changes().len(), 1 + 9);
    }
}
