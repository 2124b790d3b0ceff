//! Connectivity and destruction queries.
//!
//! "What else falls if this voxel goes?" is answered from the same
//! branch-indexed structure growth uses: find the branch step that
//! claimed the voxel, trim everything after it, and whatever vanished
//! from the block map is the cascade set.

use std::collections::BTreeSet;

use tracing::debug;

use verdant_shared::IVec3;

use crate::contract::WorldAccess;
use crate::engine::{GrowthEngine, GrowthError};
use crate::guard::Operation;
use crate::plant::Plant;

impl GrowthEngine {
    /// True if `voxel` belongs to this plant's current structure.
    ///
    /// Rebuilds the structure from the stored axiom and angles; there is
    /// no cached membership to go stale.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species or a malformed definition.
    pub fn is_owned_by_plant(&self, plant: &Plant, voxel: IVec3) -> Result<bool, GrowthError> {
        let tree = self.tree_species(&plant.species)?;
        let structure = self.build_plant_structure(tree, plant)?;
        Ok(structure.block_map().contains_key(&(voxel - plant.origin)))
    }

    /// Everything that structurally depends on `voxel`.
    ///
    /// Returns `None` when the voxel is not part of this plant's path (a
    /// normal negative result, not an error), or when the query is
    /// re-entered for a plant already being processed. Otherwise returns
    /// the world voxels that existed before the cut and no longer exist
    /// after trimming growth at the claiming step - the set the caller
    /// cascade-destroys.
    ///
    /// Voxels whose in-world block no longer matches the structure (the
    /// plant was already partially destroyed) are left out of the
    /// snapshot, so they are never re-destroyed.
    ///
    /// # Errors
    ///
    /// [`GrowthError`] for an unknown species or a malformed definition.
    pub fn get_blocks_connected_to(
        &self,
        world: &dyn WorldAccess,
        plant: &Plant,
        voxel: IVec3,
    ) -> Result<Option<BTreeSet<IVec3>>, GrowthError> {
        let tree = self.tree_species(&plant.species)?;
        let Some(_guard) = self.in_progress.try_begin(plant.entity, Operation::Destruction)
        else {
            debug!(entity = plant.entity.value(), "re-entrant destruction query dropped");
            return Ok(None);
        };

        let mut structure = self.build_plant_structure(tree, plant)?;
        let local = voxel - plant.origin;
        let Some((_branch, index)) = structure.find_branch(local) else {
            return Ok(None);
        };

        // Snapshot before mutation, discarding voxels the world no longer
        // agrees about.
        let snapshot: BTreeSet<IVec3> = structure
            .block_map()
            .iter()
            .filter(|(position, definition)| {
                let world_voxel = **position + plant.origin;
                world.is_voxel_relevant(world_voxel)
                    && world.get_block(world_voxel) == definition.block
            })
            .map(|(position, _)| *position)
            .collect();

        structure.trim(index);
        let remaining = structure.block_map();

        let removed: BTreeSet<IVec3> = snapshot
            .into_iter()
            .filter(|position| !remaining.contains_key(position))
            .map(|position| position + plant.origin)
            .collect();
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrowthConfig;
    use crate::plant::TreeGrowthState;
    use crate::registry::{PlantRegistry, TreeSpecies};
    use crate::world_buffer::VoxelBuffer;
    use verdant_lsystem::{GeometryRule, GeometryRuleSet, Grammar, TreeBlock, TreeDefinition};
    use verdant_shared::{Block, EntityId};

    /// A fixed two-branch tree: trunk with one pitched branch splitting
    /// off at axiom index 3. No grammar - the shape is the whole point.
    ///
    /// Indices: T=0 T=1 T=2 [=3 &(90)=4 T=5 T=6 ]=7 T=8
    fn two_branch_registry() -> PlantRegistry {
        let geometry = GeometryRuleSet::new().with_rule(
            'T',
            GeometryRule::Segment { block: TreeBlock::trunk(Block::TRUNK), advance: 1.0 },
        );
        let definition = TreeDefinition::new("TTT[&(90)TT]T", Grammar::new(), geometry);
        PlantRegistry::new().with_tree(
            "verdant:fixture",
            TreeSpecies {
                definition,
                config: GrowthConfig::default(),
                sapling: Block::SAPLING,
                dead_wood: Block::DEAD_WOOD,
            },
        )
    }

    fn fixture_plant(origin: IVec3) -> Plant {
        Plant {
            entity: EntityId::new(21),
            species: "verdant:fixture".to_string(),
            origin,
            state: TreeGrowthState {
                axiom: "TTT[&(90)TT]T".to_string(),
                generation: 1,
                last_growth_ms: None,
                branch_angle: 0.0,
                rotation_angle: 0.0,
            },
        }
    }

    /// Writes the plant's current blocks into the world.
    fn materialize(engine: &GrowthEngine, world: &mut VoxelBuffer, plant: &Plant) {
        let tree = engine.tree_species(&plant.species).unwrap();
        let structure = engine.build_plant_structure(tree, plant).unwrap();
        for (voxel, block) in verdant_lsystem::translated(&structure.block_map(), plant.origin) {
            world.set_block(voxel, block.block);
        }
    }

    #[test]
    fn test_ownership_membership() {
        let engine = GrowthEngine::with_session_seed(two_branch_registry(), 1);
        let origin = IVec3::new(10, 60, 10);
        let plant = fixture_plant(origin);

        assert!(engine.is_owned_by_plant(&plant, origin).unwrap());
        assert!(engine.is_owned_by_plant(&plant, origin + IVec3::new(0, 3, 0)).unwrap());
        assert!(!engine.is_owned_by_plant(&plant, origin + IVec3::new(5, 0, 0)).unwrap());
    }

    #[test]
    fn test_cutting_the_trunk_cascades_the_branch_and_everything_above() {
        let engine = GrowthEngine::with_session_seed(two_branch_registry(), 1);
        let origin = IVec3::new(0, 64, 0);
        let plant = fixture_plant(origin);
        let mut world = VoxelBuffer::new();
        materialize(&engine, &mut world, &plant);

        // Destroy the trunk voxel claimed at index 2 (height 2).
        let cut = origin + IVec3::new(0, 2, 0);
        let removed = engine.get_blocks_connected_to(&world, &plant, cut).unwrap().unwrap();

        // Everything from index >= 3. The branch's first voxel coincides
        // with the trunk-top voxel (both at height 3); the pitched branch
        // then leaves the axis along +Z.
        let expected: BTreeSet<IVec3> = [
            origin + IVec3::new(0, 3, 0), // trunk top / branch start (indices 5 and 8)
            origin + IVec3::new(0, 3, 1), // branch second segment (index 6)
        ]
        .into();
        assert_eq!(removed, expected);

        // The cut voxel itself and everything below stay: the caller
        // destroys the cut voxel, this query only reports dependents.
        assert!(!removed.contains(&cut));
        assert!(!removed.contains(&origin));
        assert!(!removed.contains(&(origin + IVec3::new(0, 1, 0))));
    }

    #[test]
    fn test_foreign_voxel_is_a_normal_negative() {
        let engine = GrowthEngine::with_session_seed(two_branch_registry(), 1);
        let plant = fixture_plant(IVec3::ZERO);
        let world = VoxelBuffer::new();

        let result =
            engine.get_blocks_connected_to(&world, &plant, IVec3::new(40, 40, 40)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_already_destroyed_voxels_are_not_reported_again() {
        let engine = GrowthEngine::with_session_seed(two_branch_registry(), 1);
        let origin = IVec3::ZERO;
        let plant = fixture_plant(origin);
        let mut world = VoxelBuffer::new();
        materialize(&engine, &mut world, &plant);

        // Someone already knocked out one branch voxel.
        let gone = origin + IVec3::new(0, 3, 1);
        world.set_block(gone, Block::AIR);

        let cut = origin + IVec3::new(0, 2, 0);
        let removed = engine.get_blocks_connected_to(&world, &plant, cut).unwrap().unwrap();
        assert!(!removed.contains(&gone), "world-mismatched voxels are filtered out");
        assert!(removed.contains(&(origin + IVec3::new(0, 3, 0))));
    }
}
