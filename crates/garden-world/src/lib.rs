//! Garden simulation engine.
//!
//! A square grid of land and water cells. Land cells take their moisture from
//! nearby water, and plants grow on them while that moisture suits their species.

pub mod cell;
pub mod grid;
pub mod plant;
pub mod renderer;
pub mod simulation;

pub use cell::Cell;
pub use grid::Grid;
pub use plant::{GrowthOutcome, Plant};
pub use renderer::{CellView, PlantView, Renderer};
pub use simulation::{Simulation, TickReport};
