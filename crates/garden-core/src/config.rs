//! Configuration types for the simulation.

use crate::{Error, Position, Result, Species, SpeciesCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Largest supported grid side
pub const MAX_GRID_SIZE: i32 = 256;

/// Garden configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Side length of the square grid
    pub size: i32,
    /// Cells that start out as water
    pub initial_water: Vec<Position>,
    /// Fraction of remaining cells scattered as water (0.0 to 1.0)
    pub water_density: f32,
    /// Random seed for the water scatter
    pub seed: u64,
    /// Growth tick period (milliseconds)
    pub tick_interval_ms: u64,
    /// Grids with a larger side only recalculate moisture around a changed cell
    pub local_recalc_threshold: i32,
    /// Species added to (or overriding) the built-in catalog
    pub species: Vec<Species>,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            size: 10,
            initial_water: vec![
                Position::new(2, 2),
                Position::new(3, 3),
                Position::new(7, 7),
            ],
            water_density: 0.0,
            seed: 0,
            tick_interval_ms: 5000,
            local_recalc_threshold: 32,
            species: Vec::new(),
        }
    }
}

impl GardenConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: GardenConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(
            path = %path.as_ref().display(),
            size = config.size,
            extra_species = config.species.len(),
            "Loaded garden configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size <= 0 || self.size > MAX_GRID_SIZE {
            return Err(Error::InvalidSize(self.size));
        }

        if !(0.0..=1.0).contains(&self.water_density) {
            return Err(Error::Validation(format!(
                "water_density must be within [0, 1], got {}",
                self.water_density
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(Error::Validation(
                "tick_interval_ms must be positive".to_string(),
            ));
        }

        for pos in &self.initial_water {
            if !pos.in_bounds(self.size) {
                return Err(Error::OutOfBounds {
                    x: pos.x,
                    y: pos.y,
                    size: self.size,
                });
            }
        }

        for species in &self.species {
            species.validate()?;
        }

        Ok(())
    }

    /// Built-in catalog extended with the configured species
    pub fn catalog(&self) -> SpeciesCatalog {
        let mut catalog = SpeciesCatalog::builtin();
        for species in &self.species {
            catalog.insert(species.clone());
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SpeciesId, StageIcons};

    #[test]
    fn test_default_config() {
        let config = GardenConfig::default();
        assert_eq!(config.size, 10);
        assert_eq!(config.tick_interval_ms, 5000);
        assert_eq!(config.initial_water.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_size() {
        let config = GardenConfig {
            size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidSize(0))));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config: GardenConfig = serde_json::from_str(r#"{ "size": 60000 }"#).unwrap();
        assert!(matches!(config.validate(), Err(Error::InvalidSize(60000))));

        let config = GardenConfig {
            size: MAX_GRID_SIZE,
            initial_water: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mixed_case_species_id_rejected() {
        let config = GardenConfig {
            species: vec![Species {
                id: SpeciesId::new("Fern"),
                name: "Fern".to_string(),
                moisture_min: 0.5,
                moisture_max: 0.9,
                growth_stages: 4,
                icons: StageIcons::default(),
            }],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_water_outside_grid() {
        let config = GardenConfig {
            size: 5,
            initial_water: vec![Position::new(7, 7)],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::OutOfBounds { x: 7, y: 7, size: 5 })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GardenConfig = serde_json::from_str(r#"{ "size": 16, "seed": 7 }"#).unwrap();
        assert_eq!(config.size, 16);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_interval_ms, 5000);
    }

    #[test]
    fn test_catalog_includes_configured_species() {
        let config = GardenConfig {
            species: vec![Species {
                id: SpeciesId::new("fern"),
                name: "Fern".to_string(),
                moisture_min: 0.5,
                moisture_max: 0.9,
                growth_stages: 4,
                icons: StageIcons::default(),
            }],
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let catalog = config.catalog();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.contains(&SpeciesId::new("fern")));
        assert!(catalog.contains(&SpeciesId::potato()));
    }

    #[test]
    fn test_config_serialization() {
        let config = GardenConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GardenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.size, deserialized.size);
        assert_eq!(config.initial_water, deserialized.initial_water);
    }
}
