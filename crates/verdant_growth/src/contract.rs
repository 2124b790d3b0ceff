//! Contracts consumed from the world and scheduling collaborators.
//!
//! These traits are the "API" between the flora simulation and its host:
//! chunk storage, the block registry and the delay scheduler all live
//! outside this workspace and are reached only through here.

use std::collections::BTreeMap;

use verdant_shared::{Block, EntityId, IVec3, Region};

/// Action id for a plant's scheduled growth check.
pub const GROWTH_ACTION: &str = "verdant:growth";

/// Voxel-grid access.
///
/// One implementation per host world; [`crate::VoxelBuffer`] is the
/// in-memory one used at world-gen time and in tests.
pub trait WorldAccess {
    /// Reads the block at `voxel` (air when unloaded/out of range).
    fn get_block(&self, voxel: IVec3) -> Block;

    /// Writes a single block. Only used for voxels this plant already
    /// owns (replace/remove halves of a committed diff).
    fn set_block(&mut self, voxel: IVec3, block: Block);

    /// True if every chunk covering `region` is loaded and mutable.
    fn is_region_loaded(&self, region: Region) -> bool;

    /// True if `voxel` is close enough to a player/simulation center to
    /// participate in gameplay reactions.
    fn is_voxel_relevant(&self, voxel: IVec3) -> bool;

    /// Requests a batched, cancelable multi-voxel placement.
    ///
    /// Any observer may veto the whole batch; `false` means nothing was
    /// placed and the caller must not fall back to per-voxel writes.
    fn request_place_blocks(&mut self, blocks: &BTreeMap<IVec3, Block>) -> bool;

    /// Marks the start of a large multi-voxel edit so downstream systems
    /// can defer per-voxel reactions.
    fn begin_bulk_edit(&mut self);

    /// Closes the bracket opened by [`WorldAccess::begin_bulk_edit`].
    /// Signalled on every exit path, including aborts.
    fn end_bulk_edit(&mut self);
}

/// Delayed-action scheduling, keyed by (entity, action id).
pub trait ActionScheduler {
    /// Schedules `action` to fire for `entity` after `delay_ms`.
    fn schedule_action(&mut self, entity: EntityId, action: &'static str, delay_ms: u64);

    /// Cancels a pending action; a no-op if none is pending.
    fn cancel_action(&mut self, entity: EntityId, action: &'static str);

    /// True if `action` is currently pending for `entity`.
    fn has_pending_action(&self, entity: EntityId, action: &'static str) -> bool;
}
