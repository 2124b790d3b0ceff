//! The growth state machine.
//!
//! ## Tick protocol (one growth check)
//!
//! 1. **Guard** - drop the call if this plant is already mid-operation.
//! 2. **Settle** - the first check only stamps a timestamp.
//! 3. **Loaded?** - current structure's region not loaded: soft retry,
//!    nothing mutated.
//! 4. **Rewrite** - one grammar generation; candidate region must be
//!    loaded too, or soft retry without committing.
//! 5. **Apply** - diff old/new maps, one batched cancelable placement;
//!    a veto aborts the whole edit and backs off, state untouched.
//! 6. **Commit** - axiom/generation/timestamp move together, only here.
//! 7. **Death** - power-law longevity roll; terminal plants return no
//!    further delay.
//!
//! "Waiting" is always expressed as a returned reschedule delay - no call
//! here blocks (single-threaded cooperative model).

use std::collections::BTreeMap;

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, warn};

use verdant_lsystem::{diff, translated, BlockDiff, DefinitionError, TreeStructure};
use verdant_shared::{Block, EntityId, IVec3, Region};

use crate::config::ConfigError;
use crate::contract::WorldAccess;
use crate::guard::{Operation, OperationGuardSet};
use crate::plant::{Plant, StagedPlant, TreeGrowthState};
use crate::registry::{PlantRegistry, TreeSpecies};
use crate::staged::StagedPlantDefinition;

/// Errors surfaced by the growth engine.
///
/// These are definition/configuration bugs; ordinary runtime conditions
/// (region not loaded, vetoed batch) are expressed through delays.
#[derive(Debug, Error)]
pub enum GrowthError {
    /// The species id is not in the registry, or is the wrong kind.
    #[error("unknown or mismatched plant species {0:?}")]
    UnknownSpecies(String),

    /// The stored axiom or a replacement body is malformed.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Rejected tuning values.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What a growth check decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Check again after this many milliseconds.
    Reschedule(u64),
    /// Final form reached; schedule nothing further.
    Matured,
    /// The plant died this check; schedule nothing further.
    Died,
}

/// The flora growth engine.
///
/// Owns the species registry, the session RNG and the reentrancy
/// markers; all world access goes through the [`WorldAccess`] argument of
/// each call, never through ambient state.
pub struct GrowthEngine {
    pub(crate) registry: PlantRegistry,
    pub(crate) session_rng: Mutex<SmallRng>,
    pub(crate) in_progress: OperationGuardSet,
}

impl GrowthEngine {
    /// Creates an engine with an entropy-seeded session RNG.
    #[must_use]
    pub fn new(registry: PlantRegistry) -> Self {
        Self {
            registry,
            session_rng: Mutex::new(SmallRng::from_entropy()),
            in_progress: OperationGuardSet::default(),
        }
    }

    /// Creates an engine with a fixed session seed (reproducible tests).
    #[must_use]
    pub fn with_session_seed(registry: PlantRegistry, seed: u64) -> Self {
        Self {
            registry,
            session_rng: Mutex::new(SmallRng::seed_from_u64(seed)),
            in_progress: OperationGuardSet::default(),
        }
    }

    /// The species registry this engine grows from.
    #[must_use]
    pub fn registry(&self) -> &PlantRegistry {
        &self.registry
    }

    pub(crate) fn tree_species(&self, id: &str) -> Result<&TreeSpecies, GrowthError> {
        self.registry.tree(id).ok_or_else(|| GrowthError::UnknownSpecies(id.to_string()))
    }

    fn staged_species(&self, id: &str) -> Result<&StagedPlantDefinition, GrowthError> {
        self.registry.staged(id).ok_or_else(|| GrowthError::UnknownSpecies(id.to_string()))
    }

    // ========================================================================
    // Planting
    // ========================================================================

    /// State for a sapling placed by a player: generation 1, seed axiom,
    /// per-tree angles sampled from the session RNG.
    ///
    /// # Errors
    ///
    /// [`GrowthError::UnknownSpecies`] if `species` is not a registered tree.
    pub fn plant_sapling(
        &self,
        species: &str,
        entity: EntityId,
        origin: IVec3,
    ) -> Result<Plant, GrowthError> {
        let tree = self.tree_species(species)?;
        let (branch_angle, rotation) = {
            let mut rng = self.session_rng.lock();
            (
                tree.definition.sample_branch_angle(&mut *rng),
                tree.definition.sample_trunk_rotation(&mut *rng),
            )
        };
        Ok(Plant {
            entity,
            species: species.to_string(),
            origin,
            state: TreeGrowthState::planted(tree.definition.seed_axiom(), branch_angle, rotation),
        })
    }

    /// First growth check for a player-planted sapling: the normal fixed
    /// interval.
    ///
    /// # Errors
    ///
    /// [`GrowthError::UnknownSpecies`] if the plant's species is unknown.
    pub fn initialize_planted(&self, plant: &Plant) -> Result<Option<u64>, GrowthError> {
        let tree = self.tree_species(&plant.species)?;
        Ok(Some(tree.config.growth_interval_ms))
    }

    /// First growth check for a world-generated tree: a random offset so
    /// trees generated across a world do not all tick in lockstep.
    ///
    /// # Errors
    ///
    /// [`GrowthError::UnknownSpecies`] if the plant's species is unknown.
    pub fn initialize_generated(&self, plant: &Plant) -> Result<Option<u64>, GrowthError> {
        let tree = self.tree_species(&plant.species)?;
        let interval = tree.config.growth_interval_ms;
        let offset = self.session_rng.lock().gen_range(0..interval);
        Ok(Some(interval / 2 + offset))
    }

    // ========================================================================
    // World-gen
    // ========================================================================

    /// Expands a fully grown tree for world-gen: synchronous, no
    /// scheduling, deterministic in (world seed, origin).
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species or a malformed definition.
    pub fn generate(
        &self,
        world_seed: u64,
        species: &str,
        origin: IVec3,
    ) -> Result<BTreeMap<IVec3, Block>, GrowthError> {
        let tree = self.tree_species(species)?;
        let state = generated_state(tree, world_seed, origin)?;
        let structure =
            tree.definition.build_structure(&state.axiom, state.branch_angle, state.rotation_angle)?;
        let map = translated(&structure.block_map(), origin);
        Ok(map.into_iter().map(|(voxel, block)| (voxel, block.block)).collect())
    }

    /// The persisted plant matching [`GrowthEngine::generate`]: same
    /// seeded derivation, so the stored state reproduces the generated
    /// blocks exactly.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species or a malformed definition.
    pub fn generated_plant(
        &self,
        world_seed: u64,
        species: &str,
        entity: EntityId,
        origin: IVec3,
    ) -> Result<Plant, GrowthError> {
        let tree = self.tree_species(species)?;
        let state = generated_state(tree, world_seed, origin)?;
        Ok(Plant { entity, species: species.to_string(), origin, state })
    }

    // ========================================================================
    // Growth checks
    // ========================================================================

    /// One scheduled growth check; the scheduling-contract wrapper around
    /// [`GrowthEngine::update_outcome`]. `None` means no further growth.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for definition bugs; never for unloaded regions or
    /// vetoed placements (those reschedule).
    pub fn update(
        &self,
        world: &mut dyn WorldAccess,
        plant: &mut Plant,
        now_ms: u64,
    ) -> Result<Option<u64>, GrowthError> {
        Ok(match self.update_outcome(world, plant, now_ms)? {
            UpdateOutcome::Reschedule(delay) => Some(delay),
            UpdateOutcome::Matured | UpdateOutcome::Died => None,
        })
    }

    /// One scheduled growth check, with the terminal reason preserved.
    ///
    /// # Errors
    ///
    /// Same as [`GrowthEngine::update`].
    pub fn update_outcome(
        &self,
        world: &mut dyn WorldAccess,
        plant: &mut Plant,
        now_ms: u64,
    ) -> Result<UpdateOutcome, GrowthError> {
        let tree = self.tree_species(&plant.species)?;
        let interval = tree.config.growth_interval_ms;

        let Some(_guard) = self.in_progress.try_begin(plant.entity, Operation::Growth) else {
            debug!(entity = plant.entity.value(), "re-entrant growth update dropped");
            return Ok(UpdateOutcome::Reschedule(interval));
        };

        // First check after planting: settle, stamp, try again later.
        if plant.state.last_growth_ms.is_none() {
            plant.state.last_growth_ms = Some(now_ms);
            return Ok(UpdateOutcome::Reschedule(interval));
        }

        // The tree we currently are must be fully loaded before touching it.
        let current = self.build_plant_structure(tree, plant)?;
        let current_map = translated(&current.block_map(), plant.origin);
        if let Some(region) = Region::enclosing(current_map.keys().copied()) {
            if !world.is_region_loaded(region) {
                debug!(entity = plant.entity.value(), "growth deferred, current region unloaded");
                return Ok(UpdateOutcome::Reschedule(interval));
            }
        }

        if !tree.definition.can_grow(&plant.state.axiom)? {
            debug!(entity = plant.entity.value(), "plant reached its final form");
            return Ok(UpdateOutcome::Matured);
        }

        // Candidate next generation; nothing is committed yet.
        let next_axiom = {
            let mut rng = self.session_rng.lock();
            tree.definition.grow(&plant.state.axiom, &mut *rng)?
        };
        let candidate = tree.definition.build_structure(
            &next_axiom,
            plant.state.branch_angle,
            plant.state.rotation_angle,
        )?;
        let candidate_map = translated(&candidate.block_map(), plant.origin);
        if let Some(region) = Region::enclosing(candidate_map.keys().copied()) {
            if !world.is_region_loaded(region) {
                debug!(entity = plant.entity.value(), "growth deferred, candidate region unloaded");
                return Ok(UpdateOutcome::Reschedule(interval));
            }
        }

        let edits = diff(&current_map, &candidate_map);
        if !apply_diff(world, &edits) {
            warn!(entity = plant.entity.value(), "placement batch vetoed, backing off");
            return Ok(UpdateOutcome::Reschedule(tree.config.backoff_interval_ms));
        }

        // The world accepted the edit: commit axiom, generation and
        // timestamp together.
        plant.state.axiom = next_axiom;
        plant.state.generation += 1;
        plant.state.last_growth_ms = Some(now_ms);

        if self.roll_death(tree, plant.state.generation) {
            self.mark_dead(world, tree, plant);
            return Ok(UpdateOutcome::Died);
        }

        Ok(UpdateOutcome::Reschedule(interval))
    }

    /// Ambient (random-tick) death evaluation. Mutates no growth state;
    /// returns `true` when the plant became terminal, in which case the
    /// caller must cancel any pending scheduled growth.
    ///
    /// # Errors
    ///
    /// [`GrowthError::UnknownSpecies`] if the plant's species is unknown.
    pub fn random_update(
        &self,
        world: &mut dyn WorldAccess,
        plant: &Plant,
    ) -> Result<bool, GrowthError> {
        let tree = self.tree_species(&plant.species)?;
        let Some(_guard) = self.in_progress.try_begin(plant.entity, Operation::Growth) else {
            debug!(entity = plant.entity.value(), "re-entrant random update dropped");
            return Ok(false);
        };
        if self.roll_death(tree, plant.state.generation) {
            self.mark_dead(world, tree, plant);
            return Ok(true);
        }
        Ok(false)
    }

    fn roll_death(&self, tree: &TreeSpecies, generation: u32) -> bool {
        let probability = tree.config.death_probability(generation);
        if probability <= 0.0 {
            return false;
        }
        probability >= 1.0 || self.session_rng.lock().gen::<f32>() < probability
    }

    fn mark_dead(&self, world: &mut dyn WorldAccess, tree: &TreeSpecies, plant: &Plant) {
        debug!(entity = plant.entity.value(), generation = plant.state.generation, "plant died");
        // A sapling that dies young leaves dead wood; a grown tree just
        // stops being scheduled and keeps its blocks.
        if world.get_block(plant.origin) == tree.sapling {
            world.set_block(plant.origin, tree.dead_wood);
        }
    }

    pub(crate) fn build_plant_structure(
        &self,
        tree: &TreeSpecies,
        plant: &Plant,
    ) -> Result<TreeStructure, GrowthError> {
        Ok(tree.definition.build_structure(
            &plant.state.axiom,
            plant.state.branch_angle,
            plant.state.rotation_angle,
        )?)
    }

    // ========================================================================
    // Staged plants
    // ========================================================================

    /// Plants a staged species: writes its first-stage block and returns
    /// the plant plus the delay to its first advance (`None` when the
    /// species has a single, already-mature stage).
    ///
    /// # Errors
    ///
    /// [`GrowthError::UnknownSpecies`] if `species` is not staged.
    pub fn plant_staged(
        &self,
        world: &mut dyn WorldAccess,
        species: &str,
        entity: EntityId,
        origin: IVec3,
    ) -> Result<(StagedPlant, Option<u64>), GrowthError> {
        let staged = self.staged_species(species)?;
        let initial = staged.initial_stage();
        world.set_block(origin, initial.block);
        let plant = StagedPlant { entity, species: species.to_string(), origin, stage: 0 };
        Ok((plant, initial.advance_after_ms))
    }

    /// Advances a staged plant one stage. `None` means mature.
    ///
    /// # Errors
    ///
    /// [`GrowthError::UnknownSpecies`] if the plant's species is not staged.
    pub fn update_staged(
        &self,
        world: &mut dyn WorldAccess,
        plant: &mut StagedPlant,
    ) -> Result<Option<u64>, GrowthError> {
        let staged = self.staged_species(&plant.species)?;
        if staged.is_mature(plant.stage) {
            return Ok(None);
        }
        if !world.is_voxel_relevant(plant.origin) {
            // Soft retry at the current stage's own cadence.
            let delay = staged.stage(plant.stage).and_then(|s| s.advance_after_ms);
            return Ok(delay);
        }
        let next = plant.stage + 1;
        let Some(stage) = staged.stage(next) else {
            return Ok(None);
        };
        world.set_block(plant.origin, stage.block);
        plant.stage = next;
        Ok(stage.advance_after_ms)
    }
}

impl std::fmt::Debug for GrowthEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowthEngine").field("registry", &self.registry).finish_non_exhaustive()
    }
}

/// Applies a diff as one bracketed transaction: the batched, cancelable
/// placements first; a veto aborts everything; replaces and removals are
/// direct writes because the tree already owns those voxels.
fn apply_diff(world: &mut dyn WorldAccess, edits: &BlockDiff) -> bool {
    world.begin_bulk_edit();
    let accepted = if edits.to_place.is_empty() {
        true
    } else {
        let batch: BTreeMap<IVec3, Block> =
            edits.to_place.iter().map(|(voxel, block)| (*voxel, block.block)).collect();
        world.request_place_blocks(&batch)
    };
    if accepted {
        for (voxel, block) in &edits.to_replace {
            world.set_block(*voxel, block.block);
        }
        for voxel in &edits.to_remove {
            world.set_block(*voxel, Block::AIR);
        }
    }
    world.end_bulk_edit();
    accepted
}

/// Deterministic world-gen state: one seeded stream keyed by world seed
/// and a spatial hash of the origin drives generation count, angles and
/// every rewrite draw.
fn generated_state(
    tree: &TreeSpecies,
    world_seed: u64,
    origin: IVec3,
) -> Result<TreeGrowthState, GrowthError> {
    let mut rng = ChaCha8Rng::seed_from_u64(plant_seed(world_seed, origin));
    let config = &tree.config;
    let generations =
        rng.gen_range(config.generated_min_generations..=config.generated_max_generations);
    let branch_angle = tree.definition.sample_branch_angle(&mut rng);
    let rotation_angle = tree.definition.sample_trunk_rotation(&mut rng);

    let mut axiom = tree.definition.seed_axiom().to_string();
    for _ in 1..generations {
        axiom = tree.definition.grow(&axiom, &mut rng)?;
    }

    Ok(TreeGrowthState {
        axiom,
        generation: generations,
        last_growth_ms: None,
        branch_angle,
        rotation_angle,
    })
}

/// FNV-style mixing of the world seed with the origin voxel, so every
/// position gets an independent deterministic stream.
const fn plant_seed(world_seed: u64, origin: IVec3) -> u64 {
    let mut hash = world_seed;
    hash ^= origin.x as u64;
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^= hash >> 32;
    hash ^= origin.y as u64;
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^= hash >> 32;
    hash ^= origin.z as u64;
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^= hash >> 32;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_buffer::VoxelBuffer;

    fn engine() -> GrowthEngine {
        GrowthEngine::with_session_seed(PlantRegistry::with_defaults(), 42)
    }

    fn planted_oak(engine: &GrowthEngine) -> Plant {
        engine.plant_sapling("verdant:oak", EntityId::new(1), IVec3::new(8, 64, 8)).unwrap()
    }

    #[test]
    fn test_unknown_species_is_an_error() {
        let engine = engine();
        assert!(matches!(
            engine.plant_sapling("verdant:baobab", EntityId::new(1), IVec3::ZERO),
            Err(GrowthError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_first_check_is_a_settle_step() {
        let engine = engine();
        let mut world = VoxelBuffer::new();
        let mut plant = planted_oak(&engine);

        let outcome = engine.update_outcome(&mut world, &mut plant, 1_000).unwrap();
        assert_eq!(outcome, UpdateOutcome::Reschedule(60_000));
        assert_eq!(plant.state.last_growth_ms, Some(1_000));
        assert_eq!(plant.state.generation, 1, "settle must not grow");
        assert_eq!(world.block_count(), 0, "settle must not touch the world");
    }

    #[test]
    fn test_growth_commits_axiom_generation_and_blocks_together() {
        let engine = engine();
        let mut world = VoxelBuffer::new();
        let mut plant = planted_oak(&engine);

        engine.update(&mut world, &mut plant, 1_000).unwrap();
        let before_axiom = plant.state.axiom.clone();
        let delay = engine.update(&mut world, &mut plant, 61_000).unwrap();

        assert_eq!(delay, Some(60_000));
        assert_ne!(plant.state.axiom, before_axiom);
        assert_eq!(plant.state.generation, 2);
        assert_eq!(plant.state.last_growth_ms, Some(61_000));
        assert!(world.block_count() > 0, "committed growth reaches the world");
        assert!(world.bulk_edits() >= 1);
        assert!(!world.in_bulk_edit(), "bulk brackets must balance");
    }

    #[test]
    fn test_unloaded_region_soft_retries_without_mutation() {
        let engine = engine();
        let mut world = VoxelBuffer::new();
        // Load a region that cannot contain the tree.
        world.set_loaded_region(Some(Region::new(
            IVec3::new(-100, 0, -100),
            IVec3::new(-90, 10, -90),
        )));
        let mut plant = planted_oak(&engine);
        engine.update(&mut world, &mut plant, 1_000).unwrap();

        let snapshot = plant.state.clone();
        let outcome = engine.update_outcome(&mut world, &mut plant, 61_000).unwrap();

        assert_eq!(outcome, UpdateOutcome::Reschedule(60_000));
        assert_eq!(plant.state, snapshot, "soft retry leaves state untouched");
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn test_vetoed_placement_backs_off_and_commits_nothing() {
        let engine = engine();
        let mut world = VoxelBuffer::new();
        let mut plant = planted_oak(&engine);
        engine.update(&mut world, &mut plant, 1_000).unwrap();

        world.set_veto_placements(true);
        let snapshot = plant.state.clone();
        let outcome = engine.update_outcome(&mut world, &mut plant, 61_000).unwrap();

        assert_eq!(outcome, UpdateOutcome::Reschedule(180_000), "backoff, not the normal interval");
        assert_eq!(plant.state, snapshot, "rejected batch leaves state untouched");
        assert_eq!(world.block_count(), 0, "no partial writes after a veto");
        assert!(!world.in_bulk_edit());
    }

    /// Registry with an extra species whose longevity window is tiny.
    fn registry_with_short_lived(min: u32, max: u32) -> PlantRegistry {
        PlantRegistry::with_defaults().with_tree(
            "verdant:mayfly",
            crate::registry::TreeSpecies {
                definition: verdant_lsystem::TreeDefinition::oak(),
                config: crate::config::GrowthConfig {
                    min_longevity: min,
                    max_longevity: max,
                    ..crate::config::GrowthConfig::default()
                },
                sapling: Block::SAPLING,
                dead_wood: Block::DEAD_WOOD,
            },
        )
    }

    #[test]
    fn test_longevity_kills_after_the_commit() {
        let engine = GrowthEngine::with_session_seed(registry_with_short_lived(1, 2), 9);
        let mut world = VoxelBuffer::new();
        let mut plant =
            engine.plant_sapling("verdant:mayfly", EntityId::new(3), IVec3::ZERO).unwrap();
        world.set_block(plant.origin, Block::SAPLING);

        engine.update(&mut world, &mut plant, 0).unwrap();
        // Generation 1 -> 2 == max longevity: death is certain after commit.
        let outcome = engine.update_outcome(&mut world, &mut plant, 60_000).unwrap();
        assert_eq!(outcome, UpdateOutcome::Died);
        assert_eq!(plant.state.generation, 2, "death happens after the commit");
        // The tree grew past the sapling stage, so its wood remains.
        assert_eq!(world.get_block(plant.origin), Block::TRUNK);
    }

    #[test]
    fn test_random_death_replaces_a_standing_sapling_with_dead_wood() {
        // min 0 / max 1: a generation-1 sapling is already at certain death.
        let engine = GrowthEngine::with_session_seed(registry_with_short_lived(0, 1), 9);
        let mut world = VoxelBuffer::new();
        let plant =
            engine.plant_sapling("verdant:mayfly", EntityId::new(3), IVec3::ZERO).unwrap();
        world.set_block(plant.origin, Block::SAPLING);

        assert!(engine.random_update(&mut world, &plant).unwrap());
        assert_eq!(world.get_block(plant.origin), Block::DEAD_WOOD);
    }

    #[test]
    fn test_random_update_below_longevity_never_kills() {
        let engine = engine();
        let mut world = VoxelBuffer::new();
        let plant = planted_oak(&engine);
        for _ in 0..50 {
            assert!(!engine.random_update(&mut world, &plant).unwrap());
        }
    }

    #[test]
    fn test_generate_is_deterministic_per_seed_and_origin() {
        let engine = engine();
        let origin = IVec3::new(40, 70, -12);
        let a = engine.generate(1234, "verdant:oak", origin).unwrap();
        let b = engine.generate(1234, "verdant:oak", origin).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert_eq!(a.get(&origin), Some(&Block::TRUNK), "the trunk stands on the origin");

        let elsewhere = engine.generate(1234, "verdant:oak", IVec3::new(41, 70, -12)).unwrap();
        assert_ne!(a, elsewhere, "neighbouring origins get independent streams");
    }

    #[test]
    fn test_generated_plant_reproduces_generated_blocks() {
        let engine = engine();
        let origin = IVec3::new(5, 60, 5);
        let generated = engine.generate(77, "verdant:oak", origin).unwrap();
        let plant =
            engine.generated_plant(77, "verdant:oak", EntityId::new(8), origin).unwrap();

        let tree = engine.tree_species("verdant:oak").unwrap();
        let structure = engine.build_plant_structure(tree, &plant).unwrap();
        let rebuilt: BTreeMap<IVec3, Block> = translated(&structure.block_map(), origin)
            .into_iter()
            .map(|(voxel, block)| (voxel, block.block))
            .collect();
        assert_eq!(rebuilt, generated);
        assert!(plant.state.generation >= tree.config.generated_min_generations);
    }

    #[test]
    fn test_initialize_delays() {
        let engine = engine();
        let plant = planted_oak(&engine);
        assert_eq!(engine.initialize_planted(&plant).unwrap(), Some(60_000));

        let offset = engine.initialize_generated(&plant).unwrap().unwrap();
        assert!((30_000..150_000).contains(&offset), "offset {offset} outside the jitter window");
    }

    #[test]
    fn test_staged_plant_advances_to_maturity() {
        let engine = engine();
        let mut world = VoxelBuffer::new();
        let (mut grass, first_delay) = engine
            .plant_staged(&mut world, "verdant:grass", EntityId::new(4), IVec3::new(1, 64, 1))
            .unwrap();

        assert_eq!(world.get_block(grass.origin), Block::GRASS_TUFT);
        assert_eq!(first_delay, Some(90_000));

        let next = engine.update_staged(&mut world, &mut grass).unwrap();
        assert_eq!(next, None, "two-stage grass matures in one step");
        assert_eq!(world.get_block(grass.origin), Block::TALL_GRASS);

        // Mature plants stay mature.
        assert_eq!(engine.update_staged(&mut world, &mut grass).unwrap(), None);
        assert_eq!(grass.stage, 1);
    }
}
