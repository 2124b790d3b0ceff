//! Sparse in-memory world.
//!
//! Backs two jobs: the write target for world-gen tree expansion, and the
//! world double for every test in this crate. The loaded region and the
//! placement veto are configurable so tests can drive the soft-retry and
//! rejected-batch paths of the growth state machine.

use std::collections::BTreeMap;

use verdant_shared::{Block, IVec3, Region};

use crate::contract::WorldAccess;

/// In-memory [`WorldAccess`] implementation.
#[derive(Debug, Default)]
pub struct VoxelBuffer {
    blocks: BTreeMap<IVec3, Block>,
    /// `None` means the whole world is loaded.
    loaded: Option<Region>,
    /// When true, every placement batch is vetoed.
    veto_placements: bool,
    bulk_depth: i32,
    bulk_edits: u32,
}

impl VoxelBuffer {
    /// An empty buffer with everything loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the loaded region.
    pub fn set_loaded_region(&mut self, region: Option<Region>) {
        self.loaded = region;
    }

    /// Makes every subsequent placement batch fail.
    pub fn set_veto_placements(&mut self, veto: bool) {
        self.veto_placements = veto;
    }

    /// Non-air blocks currently stored.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates stored (voxel, block) pairs in deterministic order.
    pub fn blocks(&self) -> impl Iterator<Item = (IVec3, Block)> + '_ {
        self.blocks.iter().map(|(voxel, block)| (*voxel, *block))
    }

    /// Number of completed bulk-edit brackets.
    #[must_use]
    pub fn bulk_edits(&self) -> u32 {
        self.bulk_edits
    }

    /// True while inside an unbalanced bulk-edit bracket.
    #[must_use]
    pub fn in_bulk_edit(&self) -> bool {
        self.bulk_depth > 0
    }
}

impl WorldAccess for VoxelBuffer {
    fn get_block(&self, voxel: IVec3) -> Block {
        self.blocks.get(&voxel).copied().unwrap_or(Block::AIR)
    }

    fn set_block(&mut self, voxel: IVec3, block: Block) {
        if block.is_air() {
            self.blocks.remove(&voxel);
        } else {
            self.blocks.insert(voxel, block);
        }
    }

    fn is_region_loaded(&self, region: Region) -> bool {
        match self.loaded {
            None => true,
            Some(loaded) => loaded.contains(region.min) && loaded.contains(region.max),
        }
    }

    fn is_voxel_relevant(&self, voxel: IVec3) -> bool {
        match self.loaded {
            None => true,
            Some(loaded) => loaded.contains(voxel),
        }
    }

    fn request_place_blocks(&mut self, blocks: &BTreeMap<IVec3, Block>) -> bool {
        if self.veto_placements {
            return false;
        }
        for (voxel, block) in blocks {
            self.set_block(*voxel, *block);
        }
        true
    }

    fn begin_bulk_edit(&mut self) {
        self.bulk_depth += 1;
    }

    fn end_bulk_edit(&mut self) {
        self.bulk_depth -= 1;
        if self.bulk_depth == 0 {
            self.bulk_edits += 1;
        }
    }
}
