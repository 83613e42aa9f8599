//! Species catalog: growth parameters and stage icons per plant kind.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifier a species is planted by (e.g. `potato`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(String);

impl SpeciesId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn swamp() -> Self {
        Self::new("swamp")
    }

    pub fn potato() -> Self {
        Self::new("potato")
    }

    pub fn cactus() -> Self {
        Self::new("cactus")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Icons for the three display buckets of a growth stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageIcons {
    pub seedling: String,
    pub middle: String,
    pub mature: String,
}

impl StageIcons {
    pub fn new(seedling: &str, middle: &str, mature: &str) -> Self {
        Self {
            seedling: seedling.to_string(),
            middle: middle.to_string(),
            mature: mature.to_string(),
        }
    }
}

impl Default for StageIcons {
    fn default() -> Self {
        Self::new("🌱", "🌿", "🌳")
    }
}

/// Growth parameters of a plant species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    /// Display name
    pub name: String,
    /// Lowest moisture the plant tolerates (inclusive)
    pub moisture_min: f32,
    /// Highest moisture the plant tolerates (inclusive)
    pub moisture_max: f32,
    /// Number of growth stages, the last one being mature
    pub growth_stages: u32,
    #[serde(default)]
    pub icons: StageIcons,
}

impl Species {
    /// Whether `moisture` lies inside the tolerance band
    pub fn tolerates(&self, moisture: f32) -> bool {
        moisture >= self.moisture_min && moisture <= self.moisture_max
    }

    /// Icon for a growth stage: stage 0 is a seedling, stage 1 the middle
    /// bucket, anything later is mature.
    pub fn icon_for_stage(&self, stage: u32) -> &str {
        match stage {
            0 => &self.icons.seedling,
            1 => &self.icons.middle,
            _ => &self.icons.mature,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(Error::Validation("Species id must not be empty".to_string()));
        }

        // Tool names are matched in lowercase
        if self.id.as_str().chars().any(|c| c.is_uppercase() || c.is_whitespace()) {
            return Err(Error::Validation(format!(
                "Species id '{}' must be lowercase without spaces",
                self.id
            )));
        }

        if self.growth_stages == 0 {
            return Err(Error::Validation(format!(
                "Species '{}' must have at least one growth stage",
                self.id
            )));
        }

        if self.moisture_min.is_nan()
            || self.moisture_max.is_nan()
            || self.moisture_min > self.moisture_max
        {
            return Err(Error::Validation(format!(
                "Species '{}' has an empty tolerance band [{}, {}]",
                self.id, self.moisture_min, self.moisture_max
            )));
        }

        Ok(())
    }

    fn builtin(id: SpeciesId, name: &str, min: f32, max: f32, icons: StageIcons) -> Self {
        Self {
            id,
            name: name.to_string(),
            moisture_min: min,
            moisture_max: max,
            growth_stages: 3,
            icons,
        }
    }
}

/// Lookup table from species id to its parameters
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    species: BTreeMap<SpeciesId, Arc<Species>>,
}

impl SpeciesCatalog {
    pub fn empty() -> Self {
        Self {
            species: BTreeMap::new(),
        }
    }

    /// Catalog holding the swamp plant, potato and cactus
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(Species::builtin(
            SpeciesId::swamp(),
            "Swamp plant",
            0.7,
            1.0,
            StageIcons::new("🌱", "🌿", "🪴"),
        ));
        catalog.insert(Species::builtin(
            SpeciesId::potato(),
            "Potato",
            0.4,
            0.8,
            StageIcons::new("🌱", "🥔", "🥔"),
        ));
        catalog.insert(Species::builtin(
            SpeciesId::cactus(),
            "Cactus",
            0.0,
            0.3,
            StageIcons::new("🌱", "🌵", "🌵"),
        ));
        catalog
    }

    /// Add a species, replacing any existing entry with the same id
    pub fn insert(&mut self, species: Species) {
        self.species.insert(species.id.clone(), Arc::new(species));
    }

    pub fn get(&self, id: &SpeciesId) -> Option<&Arc<Species>> {
        self.species.get(id)
    }

    /// Resolve a species id, failing with `UnknownSpecies`
    pub fn lookup(&self, id: &SpeciesId) -> Result<Arc<Species>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownSpecies(id.to_string()))
    }

    pub fn contains(&self, id: &SpeciesId) -> bool {
        self.species.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SpeciesId> + '_ {
        self.species.keys()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
