//! Persisted per-plant growth state.
//!
//! The entity framework owns the entities; these are the components it
//! stores for us. Everything here is plain serializable data - the
//! engine mutates it only when a growth step actually commits.

use serde::{Deserialize, Serialize};
use verdant_shared::{EntityId, IVec3};

/// Growth state of one living tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeGrowthState {
    /// Current axiom text.
    pub axiom: String,
    /// Generation counter; a freshly planted sapling is generation 1.
    pub generation: u32,
    /// Timestamp of the last committed growth, in milliseconds.
    /// `None` until the first (settle) check stamps it.
    pub last_growth_ms: Option<u64>,
    /// Per-tree branch angle, radians. Sampled once at plant time.
    pub branch_angle: f32,
    /// Per-tree trunk rotation, radians. Sampled once at plant time.
    pub rotation_angle: f32,
}

impl TreeGrowthState {
    /// State for a freshly planted sapling.
    #[must_use]
    pub fn planted(axiom: impl Into<String>, branch_angle: f32, rotation_angle: f32) -> Self {
        Self {
            axiom: axiom.into(),
            generation: 1,
            last_growth_ms: None,
            branch_angle,
            rotation_angle,
        }
    }
}

/// One living tree: identity, placement and growth state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    /// Owning entity.
    pub entity: EntityId,
    /// Registry key of the species.
    pub species: String,
    /// World voxel of the tree base; the structure grows in coordinates
    /// relative to this.
    pub origin: IVec3,
    /// Mutable growth state.
    pub state: TreeGrowthState,
}

/// One staged plant (grass tuft, bush): no grammar, just a stage index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagedPlant {
    /// Owning entity.
    pub entity: EntityId,
    /// Registry key of the species.
    pub species: String,
    /// The single voxel this plant occupies.
    pub origin: IVec3,
    /// Index into the species' stage list.
    pub stage: usize,
}
