//! Staged growth for the simple flora: grasses and bushes.
//!
//! No grammar, no turtle - just an ordered list of block stages walked
//! one `set_block` at a time. The last stage is mature and schedules
//! nothing further.

use serde::{Deserialize, Serialize};
use verdant_shared::Block;

use crate::config::ConfigError;

/// One visual stage of a staged plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStage {
    /// The block shown while in this stage.
    pub block: Block,
    /// Delay before advancing to the next stage; `None` marks the final
    /// (mature) stage.
    pub advance_after_ms: Option<u64>,
}

impl GrowthStage {
    /// An intermediate stage that advances after `delay_ms`.
    #[must_use]
    pub const fn timed(block: Block, delay_ms: u64) -> Self {
        Self { block, advance_after_ms: Some(delay_ms) }
    }

    /// The final, mature stage.
    #[must_use]
    pub const fn mature(block: Block) -> Self {
        Self { block, advance_after_ms: None }
    }
}

/// Ordered stage table for one staged species.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedPlantDefinition {
    stages: Vec<GrowthStage>,
}

impl StagedPlantDefinition {
    /// Builds a definition from its stages.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoStages`] for an empty table.
    pub fn new(stages: Vec<GrowthStage>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::NoStages);
        }
        Ok(Self { stages })
    }

    /// The stage a freshly planted specimen starts in.
    #[must_use]
    pub fn initial_stage(&self) -> &GrowthStage {
        &self.stages[0]
    }

    /// Looks up a stage by index.
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&GrowthStage> {
        self.stages.get(index)
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false: construction rejects empty tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// True once `index` is the final stage (or beyond).
    #[must_use]
    pub fn is_mature(&self, index: usize) -> bool {
        index + 1 >= self.stages.len()
    }

    /// Stock two-stage grass: a tuft that grows tall.
    #[must_use]
    pub fn grass() -> Self {
        Self {
            stages: vec![
                GrowthStage::timed(Block::GRASS_TUFT, 90_000),
                GrowthStage::mature(Block::TALL_GRASS),
            ],
        }
    }

    /// Stock two-stage bush.
    #[must_use]
    pub fn bush() -> Self {
        Self {
            stages: vec![
                GrowthStage::timed(Block::BUSH_SPROUT, 150_000),
                GrowthStage::mature(Block::BUSH),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stage_table_is_rejected() {
        assert!(matches!(
            StagedPlantDefinition::new(Vec::new()),
            Err(ConfigError::NoStages)
        ));
    }

    #[test]
    fn test_stock_grass_shape() {
        let grass = StagedPlantDefinition::grass();
        assert_eq!(grass.len(), 2);
        assert_eq!(grass.initial_stage().block, Block::GRASS_TUFT);
        assert!(!grass.is_mature(0));
        assert!(grass.is_mature(1));
        assert_eq!(grass.stage(1).unwrap().advance_after_ms, None);
    }
}
