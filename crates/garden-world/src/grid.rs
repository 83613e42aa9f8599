//! Square grid of garden cells.

use crate::cell::Cell;
use crate::plant::Plant;
use garden_core::{Error, GardenConfig, Position, Result, Terrain, MAX_GRID_SIZE};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// How far (on each axis) water reaches when computing moisture
pub const MOISTURE_RADIUS: i32 = 2;

/// Moisture a water cell at offset (dx, dy) contributes
pub fn moisture_weight(dx: i32, dy: i32) -> f32 {
    let distance = ((dx * dx + dy * dy) as f32).sqrt();
    1.0 / (distance + 1.0)
}

/// A bounded square grid, stored row-major
#[derive(Debug, Clone)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate `size * size` dry land cells
    pub fn new(size: i32) -> Result<Self> {
        if size <= 0 || size > MAX_GRID_SIZE {
            return Err(Error::InvalidSize(size));
        }

        let count = (size as usize) * (size as usize);
        Ok(Self {
            size,
            cells: vec![Cell::new(); count],
        })
    }

    /// Create a grid from garden configuration.
    ///
    /// Moisture is left at zero; the simulation recalculates it.
    pub fn from_config(config: &GardenConfig) -> Result<Self> {
        let mut grid = Self::new(config.size)?;

        for pos in &config.initial_water {
            grid.set_terrain(*pos, Terrain::Water)?;
        }

        if config.water_density > 0.0 {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            for index in 0..grid.cells.len() {
                let roll = rng.gen::<f32>();
                if roll < config.water_density {
                    grid.cells[index].change_terrain(Terrain::Water);
                }
            }
        }

        Ok(grid)
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn cell_at(&self, pos: Position) -> Result<&Cell> {
        let index = self.index_of(pos)?;
        Ok(&self.cells[index])
    }

    pub fn cell_at_mut(&mut self, pos: Position) -> Result<&mut Cell> {
        let index = self.index_of(pos)?;
        Ok(&mut self.cells[index])
    }

    /// Change the terrain at `pos` without touching any moisture but its own
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> Result<Option<Plant>> {
        Ok(self.cell_at_mut(pos)?.change_terrain(terrain))
    }

    /// Summed inverse-distance contribution of water cells around `pos`.
    /// Reads terrain only, so the order cells are recalculated in is irrelevant.
    pub fn water_contribution(&self, pos: Position) -> f32 {
        let mut total = 0.0;

        for dy in -MOISTURE_RADIUS..=MOISTURE_RADIUS {
            for dx in -MOISTURE_RADIUS..=MOISTURE_RADIUS {
                let neighbor = pos.add(dx, dy);
                if !neighbor.in_bounds(self.size) {
                    continue;
                }

                if self.cells[self.pos_to_index(neighbor)].terrain().is_water() {
                    total += moisture_weight(dx, dy);
                }
            }
        }

        total
    }

    /// Recompute moisture for the cell at `pos` and return the new value
    pub fn recalculate_moisture(&mut self, pos: Position) -> Result<f32> {
        let index = self.index_of(pos)?;

        // Water needs no neighbour scan
        let contribution = if self.cells[index].terrain().is_water() {
            1.0
        } else {
            self.water_contribution(pos)
        };

        Ok(self.cells[index].recalculate_moisture(contribution))
    }

    /// Positions whose moisture can depend on the terrain at `pos`, clipped to the grid
    pub fn moisture_window(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        (-MOISTURE_RADIUS..=MOISTURE_RADIUS)
            .flat_map(move |dy| (-MOISTURE_RADIUS..=MOISTURE_RADIUS).map(move |dx| pos.add(dx, dy)))
            .filter(move |p| p.in_bounds(self.size))
    }

    fn index_of(&self, pos: Position) -> Result<usize> {
        if !pos.in_bounds(self.size) {
            return Err(Error::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: self.size,
            });
        }
        Ok(self.pos_to_index(pos))
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        (pos.y * self.size + pos.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.size;
        let y = (index as i32) / self.size;
        Position::new(x, y)
    }

    /// Iterator over all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }
}
