//! Plant bookkeeping + scheduler wiring.
//!
//! [`FloraSimulation`] is the orchestrator the host embeds: it owns the
//! living plants, turns the engine's returned delays into scheduler
//! calls, publishes [`FloraEvent`]s, and cascades destruction. The host's
//! job shrinks to "deliver scheduled actions and random ticks here".

use std::collections::BTreeMap;

use tracing::debug;

use verdant_shared::{Block, EntityId, IVec3};

use crate::contract::{ActionScheduler, WorldAccess, GROWTH_ACTION};
use crate::engine::{GrowthEngine, GrowthError, UpdateOutcome};
use crate::events::{flora_channel, FloraEvent, FloraEventReceiver, FloraEventSender};
use crate::plant::{Plant, StagedPlant};

/// The flora simulation driver.
#[derive(Debug)]
pub struct FloraSimulation {
    engine: GrowthEngine,
    trees: BTreeMap<EntityId, Plant>,
    staged: BTreeMap<EntityId, StagedPlant>,
    events: FloraEventSender,
}

impl FloraSimulation {
    /// Wraps an engine; returns the simulation and the event receiver
    /// downstream systems consume.
    #[must_use]
    pub fn new(engine: GrowthEngine, event_capacity: usize) -> (Self, FloraEventReceiver) {
        let (events, receiver) = flora_channel(event_capacity);
        (Self { engine, trees: BTreeMap::new(), staged: BTreeMap::new(), events }, receiver)
    }

    /// The wrapped engine.
    #[must_use]
    pub fn engine(&self) -> &GrowthEngine {
        &self.engine
    }

    /// A living tree by entity.
    #[must_use]
    pub fn tree(&self, entity: EntityId) -> Option<&Plant> {
        self.trees.get(&entity)
    }

    /// Number of living trees.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Registers a player-planted sapling and schedules its first check.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species.
    pub fn plant_tree(
        &mut self,
        scheduler: &mut dyn ActionScheduler,
        species: &str,
        entity: EntityId,
        origin: IVec3,
    ) -> Result<(), GrowthError> {
        let plant = self.engine.plant_sapling(species, entity, origin)?;
        if let Some(delay) = self.engine.initialize_planted(&plant)? {
            scheduler.schedule_action(entity, GROWTH_ACTION, delay);
        }
        self.trees.insert(entity, plant);
        Ok(())
    }

    /// Registers a world-generated tree (already expanded into the world
    /// by the generator) and schedules its first check with jitter.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species or malformed definition.
    pub fn add_generated_tree(
        &mut self,
        scheduler: &mut dyn ActionScheduler,
        world_seed: u64,
        species: &str,
        entity: EntityId,
        origin: IVec3,
    ) -> Result<(), GrowthError> {
        let plant = self.engine.generated_plant(world_seed, species, entity, origin)?;
        if let Some(delay) = self.engine.initialize_generated(&plant)? {
            scheduler.schedule_action(entity, GROWTH_ACTION, delay);
        }
        self.trees.insert(entity, plant);
        Ok(())
    }

    /// Plants a staged species (grass/bush) and schedules its advances.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species.
    pub fn plant_staged(
        &mut self,
        world: &mut dyn WorldAccess,
        scheduler: &mut dyn ActionScheduler,
        species: &str,
        entity: EntityId,
        origin: IVec3,
    ) -> Result<(), GrowthError> {
        let (plant, delay) = self.engine.plant_staged(world, species, entity, origin)?;
        if let Some(delay) = delay {
            scheduler.schedule_action(entity, GROWTH_ACTION, delay);
        }
        self.staged.insert(entity, plant);
        Ok(())
    }

    /// Delivers one scheduled action. Unknown entities and foreign action
    /// ids are ignored (the plant may have died since scheduling).
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for definition bugs surfaced by the engine.
    pub fn process_action(
        &mut self,
        world: &mut dyn WorldAccess,
        scheduler: &mut dyn ActionScheduler,
        entity: EntityId,
        action: &str,
        now_ms: u64,
    ) -> Result<(), GrowthError> {
        if action != GROWTH_ACTION {
            return Ok(());
        }

        if let Some(plant) = self.trees.get_mut(&entity) {
            let generation_before = plant.state.generation;
            match self.engine.update_outcome(world, plant, now_ms)? {
                UpdateOutcome::Reschedule(delay) => {
                    if plant.state.generation > generation_before {
                        self.events.send(FloraEvent::Grown {
                            entity,
                            generation: plant.state.generation,
                        });
                    }
                    scheduler.schedule_action(entity, GROWTH_ACTION, delay);
                }
                UpdateOutcome::Matured => {
                    self.events.send(FloraEvent::Matured { entity });
                }
                UpdateOutcome::Died => {
                    self.events.send(FloraEvent::Died { entity });
                    self.trees.remove(&entity);
                }
            }
            return Ok(());
        }

        if let Some(plant) = self.staged.get_mut(&entity) {
            match self.engine.update_staged(world, plant)? {
                Some(delay) => scheduler.schedule_action(entity, GROWTH_ACTION, delay),
                None => {
                    self.events.send(FloraEvent::Matured { entity });
                }
            }
            return Ok(());
        }

        debug!(entity = entity.value(), "scheduled action for an unknown plant ignored");
        Ok(())
    }

    /// Delivers a random (ambient) tick: may kill the plant, in which
    /// case its pending growth is cancelled. Returns `true` when the
    /// plant became terminal.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species.
    pub fn random_tick(
        &mut self,
        world: &mut dyn WorldAccess,
        scheduler: &mut dyn ActionScheduler,
        entity: EntityId,
    ) -> Result<bool, GrowthError> {
        let Some(plant) = self.trees.get(&entity) else {
            return Ok(false);
        };
        if self.engine.random_update(world, plant)? {
            scheduler.cancel_action(entity, GROWTH_ACTION);
            self.events.send(FloraEvent::Died { entity });
            self.trees.remove(&entity);
            return Ok(true);
        }
        Ok(false)
    }

    /// A voxel of this plant was destroyed: cascade-remove everything
    /// that depended on it. Returns the number of voxels removed by the
    /// cascade (0 when the voxel was not part of the plant).
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species or malformed definition.
    pub fn destroy_voxel(
        &mut self,
        world: &mut dyn WorldAccess,
        scheduler: &mut dyn ActionScheduler,
        entity: EntityId,
        voxel: IVec3,
    ) -> Result<usize, GrowthError> {
        let Some(plant) = self.trees.get(&entity) else {
            return Ok(0);
        };
        let Some(removed) = self.engine.get_blocks_connected_to(world, plant, voxel)? else {
            return Ok(0);
        };

        world.begin_bulk_edit();
        world.set_block(voxel, Block::AIR);
        for dependent in &removed {
            world.set_block(*dependent, Block::AIR);
        }
        world.end_bulk_edit();

        self.events.send(FloraEvent::Destroyed { entity, trigger: voxel, removed: removed.len() });

        // Cutting the base fells the whole plant: stop scheduling it.
        if voxel == plant.origin || removed.contains(&plant.origin) {
            scheduler.cancel_action(entity, GROWTH_ACTION);
            self.trees.remove(&entity);
        }
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PlantRegistry;
    use crate::world_buffer::VoxelBuffer;
    use std::collections::HashMap;

    /// Minimal in-memory scheduler double.
    #[derive(Debug, Default)]
    struct FakeScheduler {
        pending: HashMap<(EntityId, &'static str), u64>,
    }

    impl ActionScheduler for FakeScheduler {
        fn schedule_action(&mut self, entity: EntityId, action: &'static str, delay_ms: u64) {
            self.pending.insert((entity, action), delay_ms);
        }
        fn cancel_action(&mut self, entity: EntityId, action: &'static str) {
            self.pending.remove(&(entity, action));
        }
        fn has_pending_action(&self, entity: EntityId, action: &'static str) -> bool {
            self.pending.contains_key(&(entity, action))
        }
    }

    fn simulation() -> (FloraSimulation, FloraEventReceiver) {
        let engine = GrowthEngine::with_session_seed(PlantRegistry::with_defaults(), 7);
        FloraSimulation::new(engine, 64)
    }

    #[test]
    fn test_planting_schedules_the_first_check() {
        let (mut sim, _events) = simulation();
        let mut scheduler = FakeScheduler::default();
        let entity = EntityId::new(1);

        sim.plant_tree(&mut scheduler, "verdant:oak", entity, IVec3::new(0, 64, 0)).unwrap();
        assert!(scheduler.has_pending_action(entity, GROWTH_ACTION));
        assert_eq!(sim.tree_count(), 1);
    }

    #[test]
    fn test_growth_action_reschedules_and_emits_grown() {
        let (mut sim, events) = simulation();
        let mut scheduler = FakeScheduler::default();
        let mut world = VoxelBuffer::new();
        let entity = EntityId::new(2);
        sim.plant_tree(&mut scheduler, "verdant:oak", entity, IVec3::new(0, 64, 0)).unwrap();

        // Settle tick, then a real growth tick.
        sim.process_action(&mut world, &mut scheduler, entity, GROWTH_ACTION, 0).unwrap();
        sim.process_action(&mut world, &mut scheduler, entity, GROWTH_ACTION, 60_000).unwrap();

        assert!(scheduler.has_pending_action(entity, GROWTH_ACTION));
        let drained = events.drain();
        assert!(
            drained.contains(&FloraEvent::Grown { entity, generation: 2 }),
            "expected a Grown event, got {drained:?}"
        );
        assert!(world.block_count() > 0);
    }

    #[test]
    fn test_staged_plant_matures_and_stops_scheduling() {
        let (mut sim, events) = simulation();
        let mut scheduler = FakeScheduler::default();
        let mut world = VoxelBuffer::new();
        let entity = EntityId::new(3);
        let origin = IVec3::new(4, 64, 4);

        sim.plant_staged(&mut world, &mut scheduler, "verdant:grass", entity, origin).unwrap();
        assert!(scheduler.has_pending_action(entity, GROWTH_ACTION));

        scheduler.cancel_action(entity, GROWTH_ACTION);
        sim.process_action(&mut world, &mut scheduler, entity, GROWTH_ACTION, 90_000).unwrap();

        assert!(!scheduler.has_pending_action(entity, GROWTH_ACTION), "mature = nothing pending");
        assert_eq!(world.get_block(origin), Block::TALL_GRASS);
        assert!(events.drain().contains(&FloraEvent::Matured { entity }));
    }

    #[test]
    fn test_unknown_entity_actions_are_ignored() {
        let (mut sim, _events) = simulation();
        let mut scheduler = FakeScheduler::default();
        let mut world = VoxelBuffer::new();
        sim.process_action(&mut world, &mut scheduler, EntityId::new(99), GROWTH_ACTION, 0)
            .unwrap();
        assert_eq!(world.block_count(), 0);
    }
}
