//! The growth-type registry: species id -> growth definition.
//!
//! Built once per world/session and passed into the engine explicitly -
//! there is no ambient global registry to reach for.

use std::collections::HashMap;

use verdant_lsystem::TreeDefinition;
use verdant_shared::Block;

use crate::config::GrowthConfig;
use crate::staged::StagedPlantDefinition;

/// A tree species: structural definition plus world-facing tuning.
#[derive(Debug)]
pub struct TreeSpecies {
    /// Grammar, geometry and shape parameters.
    pub definition: TreeDefinition,
    /// Timed-growth tuning.
    pub config: GrowthConfig,
    /// The block a freshly planted specimen shows (what death replaces).
    pub sapling: Block,
    /// The block left behind when a young tree dies.
    pub dead_wood: Block,
}

/// Everything the registry can grow.
///
/// Tree species are boxed: a full definition (grammar + geometry) dwarfs
/// a staged plant's stage table.
#[derive(Debug)]
pub enum GrowthDefinition {
    /// L-system tree with timed incremental growth.
    Tree(Box<TreeSpecies>),
    /// Simple staged plant (grass, bush).
    Staged(StagedPlantDefinition),
}

/// Species id -> [`GrowthDefinition`].
#[derive(Debug, Default)]
pub struct PlantRegistry {
    plants: HashMap<String, GrowthDefinition>,
}

impl PlantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock lineup: an oak, grass and a bush.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with_tree(
                "verdant:oak",
                TreeSpecies {
                    definition: TreeDefinition::oak(),
                    config: GrowthConfig::default(),
                    sapling: Block::SAPLING,
                    dead_wood: Block::DEAD_WOOD,
                },
            )
            .with_staged("verdant:grass", StagedPlantDefinition::grass())
            .with_staged("verdant:bush", StagedPlantDefinition::bush())
    }

    /// Registers a tree species, replacing any previous entry.
    #[must_use]
    pub fn with_tree(mut self, id: impl Into<String>, species: TreeSpecies) -> Self {
        self.plants.insert(id.into(), GrowthDefinition::Tree(Box::new(species)));
        self
    }

    /// Registers a staged species, replacing any previous entry.
    #[must_use]
    pub fn with_staged(mut self, id: impl Into<String>, staged: StagedPlantDefinition) -> Self {
        self.plants.insert(id.into(), GrowthDefinition::Staged(staged));
        self
    }

    /// Looks up any growth definition.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&GrowthDefinition> {
        self.plants.get(id)
    }

    /// Looks up a species known to be a tree.
    #[must_use]
    pub fn tree(&self, id: &str) -> Option<&TreeSpecies> {
        match self.plants.get(id) {
            Some(GrowthDefinition::Tree(species)) => Some(species.as_ref()),
            _ => None,
        }
    }

    /// Looks up a species known to be staged.
    #[must_use]
    pub fn staged(&self, id: &str) -> Option<&StagedPlantDefinition> {
        match self.plants.get(id) {
            Some(GrowthDefinition::Staged(staged)) => Some(staged),
            _ => None,
        }
    }
}
