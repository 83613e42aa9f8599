//! Terminal renderer for the garden.

use garden_core::{Position, Terrain};
use garden_world::{CellView, Renderer};
use std::fmt::Write;

pub const WATER_COLOR: (u8, u8, u8) = (0x4a, 0x86, 0xe8);

/// Dry land is sandy yellow, wet land dark brown
pub fn land_color(moisture: f32) -> (u8, u8, u8) {
    let m = moisture.clamp(0.0, 1.0);
    let r = (255.0 - m * 150.0).floor() as u8;
    let g = (200.0 - m * 100.0).floor() as u8;
    let b = (50.0 + m * 50.0).floor() as u8;
    (r, g, b)
}

/// Keeps the latest view of every cell and draws the grid as text
pub struct TextRenderer {
    size: i32,
    cells: Vec<Option<CellView>>,
    color: bool,
}

impl TextRenderer {
    pub fn new(size: i32, color: bool) -> Self {
        let count = (size.max(0) as usize).pow(2);
        Self {
            size,
            cells: vec![None; count],
            color,
        }
    }

    pub fn view(&self, pos: Position) -> Option<&CellView> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.cells[(pos.y * self.size + pos.x) as usize].as_ref()
    }

    /// Draw the grid, one text row per grid row
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = write!(out, "   ");
        for x in 0..self.size {
            let _ = write!(out, "{:>2}", x % 100);
        }
        out.push('\n');

        for y in 0..self.size {
            let _ = write!(out, "{:>2} ", y % 100);
            for x in 0..self.size {
                match self.view(Position::new(x, y)) {
                    Some(view) => self.render_cell(&mut out, view),
                    None => out.push_str("  "),
                }
            }
            if self.color {
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }

        out
    }

    fn render_cell(&self, out: &mut String, view: &CellView) {
        let glyph = match (&view.plant, view.terrain) {
            (Some(plant), _) => plant.icon.clone(),
            (None, Terrain::Water) => "~~".to_string(),
            (None, Terrain::Land) if self.color => "  ".to_string(),
            (None, Terrain::Land) => format!(" {}", (view.moisture * 9.0).round() as u8),
        };

        if self.color {
            let (r, g, b) = match view.terrain {
                Terrain::Water => WATER_COLOR,
                Terrain::Land => land_color(view.moisture),
            };
            let _ = write!(out, "\x1b[48;2;{};{};{}m{}", r, g, b, glyph);
        } else {
            out.push_str(&glyph);
        }
    }
}

impl Renderer for TextRenderer {
    fn on_cell_changed(&mut self, view: &CellView) {
        if view.position.in_bounds(self.size) {
            let index = (view.position.y * self.size + view.position.x) as usize;
            self.cells[index] = Some(view.clone());
        }
    }
}

/// Multi-line description of a cell for the info panel
pub fn cell_info(view: &CellView) -> String {
    let mut info = String::new();
    let _ = writeln!(info, "Position: {}", view.position);
    let terrain = match view.terrain {
        Terrain::Land => "Land",
        Terrain::Water => "Water",
    };
    let _ = writeln!(info, "Terrain: {}", terrain);
    let _ = writeln!(info, "Moisture: {}%", (view.moisture * 100.0).round() as u32);

    match &view.plant {
        Some(plant) => {
            let _ = writeln!(info, "Plant: {} {}", plant.name, plant.icon);
            let _ = writeln!(info, "Growth stage: {}/{}", plant.stage + 1, plant.growth_stages);
            let conditions = if plant.can_grow { "suitable" } else { "unsuitable" };
            let _ = write!(info, "Conditions: {}", conditions);
        }
        None => {
            let _ = write!(info, "Plant: none");
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::{GardenConfig, SpeciesId};
    use garden_world::Simulation;

    fn pond_simulation() -> Simulation {
        let config = GardenConfig {
            size: 3,
            initial_water: vec![Position::new(0, 0)],
            ..Default::default()
        };
        Simulation::new(&config).unwrap()
    }

    #[test]
    fn test_land_color() {
        assert_eq!(land_color(0.0), (255, 200, 50));
        assert_eq!(land_color(1.0), (105, 100, 100));
        assert_eq!(land_color(0.5), (180, 150, 75));
    }

    #[test]
    fn test_plain_render() {
        let mut sim = pond_simulation();
        sim.plant_at(Position::new(2, 2), &SpeciesId::cactus()).unwrap();

        let mut renderer = TextRenderer::new(3, false);
        sim.flush(&mut renderer);

        let text = renderer.render();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "    0 1 2");
        assert_eq!(rows[1], " 0 ~~ 5 3");
        assert!(rows[3].ends_with("🌱"));
    }

    #[test]
    fn test_colored_render_uses_escape_codes() {
        let mut sim = pond_simulation();
        let mut renderer = TextRenderer::new(3, true);
        sim.flush(&mut renderer);

        let text = renderer.render();
        assert!(text.contains("\x1b[48;2;74;134;232m"));
        assert!(text.contains("\x1b[0m"));
    }

    #[test]
    fn test_cell_info() {
        let mut sim = pond_simulation();
        let pos = Position::new(1, 0);
        sim.plant_at(pos, &SpeciesId::potato()).unwrap();

        let info = cell_info(&sim.inspect(pos).unwrap());
        assert!(info.contains("Position: (1, 0)"));
        assert!(info.contains("Terrain: Land"));
        assert!(info.contains("Moisture: 50%"));
        assert!(info.contains("Plant: Potato"));
        assert!(info.contains("Growth stage: 1/3"));
        assert!(info.contains("Conditions: suitable"));

        let water = cell_info(&sim.inspect(Position::new(0, 0)).unwrap());
        assert!(water.contains("Terrain: Water"));
        assert!(water.contains("Plant: none"));
    }
}
