//! World-facing block identity.
//!
//! The block registry itself lives outside this workspace; flora only needs
//! stable ids to read and write. The constants below are the ids the
//! simulation's default definitions are wired to.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A single block id in the world.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable,
    Serialize, Deserialize,
)]
pub struct Block {
    /// Block type ID.
    pub id: u16,
}

impl Block {
    /// Air block (empty).
    pub const AIR: Self = Self::new(0);
    /// Dirt block.
    pub const DIRT: Self = Self::new(3);
    /// Grass-covered ground block.
    pub const GRASS: Self = Self::new(1);
    /// Tree sapling.
    pub const SAPLING: Self = Self::new(20);
    /// Trunk wood.
    pub const TRUNK: Self = Self::new(21);
    /// Branch wood (thinner than trunk).
    pub const BRANCH: Self = Self::new(22);
    /// Leaves.
    pub const LEAVES: Self = Self::new(23);
    /// Dead wood left behind by a sapling that died young.
    pub const DEAD_WOOD: Self = Self::new(24);
    /// Short grass tuft (staged plant, stage 0).
    pub const GRASS_TUFT: Self = Self::new(30);
    /// Tall grass (staged plant, stage 1).
    pub const TALL_GRASS: Self = Self::new(31);
    /// Bush sprout (staged plant, stage 0).
    pub const BUSH_SPROUT: Self = Self::new(32);
    /// Grown bush (staged plant, stage 1).
    pub const BUSH: Self = Self::new(33);

    /// Creates a new block with given ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self { id }
    }

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }
}

/// Opaque handle to a plant entity owned by the external entity framework.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an entity id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}
