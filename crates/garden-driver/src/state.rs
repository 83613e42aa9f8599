//! Driver state: the selected tool and the garden it acts on.

use crate::command::{Command, HELP};
use crate::render::{cell_info, TextRenderer};
use garden_core::{Position, Result, SpeciesId, Terrain};
use garden_world::Simulation;
use std::fmt;
use tracing::{debug, info};

/// What a click does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    /// Dig a pond or fill one in
    Shovel,
    /// Pour water or drain it
    Bucket,
    /// Plant a seed of the given species
    Seed(SpeciesId),
}

impl Tool {
    pub fn from_name(name: &str) -> Self {
        match name {
            "shovel" => Tool::Shovel,
            "bucket" => Tool::Bucket,
            species => Tool::Seed(SpeciesId::new(species)),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Shovel => write!(f, "shovel"),
            Tool::Bucket => write!(f, "bucket"),
            Tool::Seed(species) => write!(f, "{} seeds", species),
        }
    }
}

/// Effect of a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    TerrainChanged(Terrain),
    Planted(SpeciesId),
    /// Seed tool on water or an occupied cell
    Ignored,
}

/// Reply to a driver command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Print(String),
    Quit,
}

pub struct DriverState {
    simulation: Simulation,
    renderer: TextRenderer,
    tool: Tool,
}

impl DriverState {
    pub fn new(simulation: Simulation, color: bool) -> Self {
        let renderer = TextRenderer::new(simulation.grid().size(), color);
        let mut state = Self {
            simulation,
            renderer,
            tool: Tool::Shovel,
        };
        state.flush();
        state
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Select a tool; seeds must name a known species
    pub fn select_tool(&mut self, tool: Tool) -> Result<()> {
        if let Tool::Seed(species) = &tool {
            self.simulation.catalog().lookup(species)?;
        }
        debug!(tool = %tool, "Tool selected");
        self.tool = tool;
        Ok(())
    }

    /// Apply the selected tool to the cell at `pos`
    pub fn click(&mut self, pos: Position) -> Result<ClickOutcome> {
        let cell = self.simulation.inspect(pos)?;

        let outcome = match &self.tool {
            Tool::Shovel | Tool::Bucket => {
                let terrain = cell.terrain.toggled();
                self.simulation.apply_terrain_change(pos, terrain)?;
                ClickOutcome::TerrainChanged(terrain)
            }
            Tool::Seed(species) => {
                if cell.terrain == Terrain::Land && cell.plant.is_none() {
                    self.simulation.plant_at(pos, species)?;
                    ClickOutcome::Planted(species.clone())
                } else {
                    ClickOutcome::Ignored
                }
            }
        };

        self.flush();
        Ok(outcome)
    }

    /// Run a growth tick and redraw
    pub fn tick(&mut self) -> String {
        let report = self.simulation.tick();
        self.flush();
        format!(
            "{}Tick {}: {} grew, {} died, {} mature",
            self.renderer.render(),
            report.tick,
            report.grew,
            report.died,
            report.mature
        )
    }

    pub fn execute(&mut self, command: Command) -> Result<Response> {
        let text = match command {
            Command::Tool(name) => {
                self.select_tool(Tool::from_name(&name))?;
                format!("Selected {}", self.tool)
            }
            Command::Click(pos) => {
                let outcome = self.click(pos)?;
                info!(x = pos.x, y = pos.y, outcome = ?outcome, "Cell clicked");
                format!(
                    "{}{}",
                    self.renderer.render(),
                    cell_info(&self.simulation.inspect(pos)?)
                )
            }
            Command::Info(pos) => cell_info(&self.simulation.inspect(pos)?),
            Command::Remove(pos) => {
                let removed = self.simulation.remove_plant_at(pos)?;
                self.flush();
                let note = if removed { "Plant removed" } else { "Nothing to remove" };
                format!("{}{}", self.renderer.render(), note)
            }
            Command::Dump(pos) => serde_json::to_string_pretty(&self.simulation.inspect(pos)?)?,
            Command::Tick => self.tick(),
            Command::Show => format!("{}Tool: {}", self.renderer.render(), self.tool),
            Command::Help => {
                let species: Vec<&str> = self.simulation.catalog().ids().map(|id| id.as_str()).collect();
                format!("{}\nSpecies: {}", HELP, species.join(", "))
            }
            Command::Quit => return Ok(Response::Quit),
        };

        Ok(Response::Print(text))
    }

    fn flush(&mut self) {
        self.simulation.flush(&mut self.renderer);
    }
}
