//! The branch-indexed structure: interpretation, merge, diff and trim.
//!
//! Interpreting an axiom yields a tree of [`BranchNode`]s - one per
//! bracketed `[...]` scope - each recording, per axiom index, exactly
//! which voxels that step claimed. Growth diffs, destruction trims and
//! the connectivity query all walk this one index.
//!
//! Nodes live in an arena and reference children by index; every map is
//! ordered so traversal (and therefore every derived artifact) is
//! deterministic.

use std::collections::{BTreeMap, BTreeSet};

use verdant_shared::{IVec3, Vec3};

use crate::axiom::Axiom;
use crate::error::StructureError;
use crate::geometry::{GeometryRuleSet, TreeBlock};
use crate::turtle::Turtle;

/// Flat voxel -> block map, ordered for deterministic iteration.
pub type BlockMap = BTreeMap<IVec3, TreeBlock>;

/// One bracketed scope of the axiom.
#[derive(Clone, Debug, Default)]
pub struct BranchNode {
    /// Axiom index at which this branch was opened.
    start_index: usize,
    /// Voxel -> the first (lowest) axiom index that claimed it as a
    /// "main" block. Reverse lookup for the destruction query.
    main_blocks: BTreeMap<IVec3, usize>,
    /// Axiom index -> every placement that step made.
    placements: BTreeMap<usize, BTreeMap<IVec3, TreeBlock>>,
    /// Child branches in the order their `[` appeared.
    children: Vec<usize>,
}

impl BranchNode {
    fn new(start_index: usize) -> Self {
        Self { start_index, ..Self::default() }
    }

    /// Axiom index at which this branch was opened.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// The axiom index that first claimed `voxel` as a main block, if any.
    #[must_use]
    pub fn main_index_of(&self, voxel: IVec3) -> Option<usize> {
        self.main_blocks.get(&voxel).copied()
    }
}

/// The interpreted form of one axiom: an arena of branch nodes.
///
/// A structure is a pure function of (axiom, geometry, branch angle,
/// trunk rotation); rebuild it whenever it is needed rather than caching
/// it against a mutating plant.
#[derive(Clone, Debug)]
pub struct TreeStructure {
    nodes: Vec<BranchNode>,
    root: usize,
}

impl TreeStructure {
    /// Interprets `axiom` into a branch structure.
    ///
    /// `branch_angle` and `trunk_rotation` are radians. Rotation symbols
    /// (`&` `^` `+` `-` `*` `/`) use their element parameter in *degrees*
    /// when present, the global branch angle otherwise. Symbols with a
    /// geometry rule emit placements; everything else is inert.
    ///
    /// # Errors
    ///
    /// [`StructureError`] when brackets do not balance - a definition
    /// bug, rejected rather than recovered.
    pub fn build(
        axiom: &Axiom,
        geometry: &GeometryRuleSet,
        branch_angle: f32,
        trunk_rotation: f32,
    ) -> Result<Self, StructureError> {
        let mut nodes = vec![BranchNode::new(0)];
        let mut current = 0usize;
        let mut turtle = Turtle::new(trunk_rotation);
        // Each entry is a plain Copy snapshot of the pose; popping cannot
        // observe later turtle movement.
        let mut stack: Vec<(Turtle, usize)> = Vec::new();

        for (index, element) in axiom.elements().iter().enumerate() {
            let angle = element
                .parameter
                .map_or(branch_angle, f32::to_radians);
            match element.symbol {
                '[' => {
                    stack.push((turtle, current));
                    let child = nodes.len();
                    nodes.push(BranchNode::new(index));
                    nodes[current].children.push(child);
                    current = child;
                }
                ']' => {
                    let (saved, parent) = stack
                        .pop()
                        .ok_or(StructureError::UnmatchedClosingBracket { index })?;
                    turtle = saved;
                    current = parent;
                }
                '&' => turtle.rotate_local(Vec3::X, angle),
                '^' => turtle.rotate_local(Vec3::X, -angle),
                '+' => turtle.rotate_local(Vec3::Z, angle),
                '-' => turtle.rotate_local(Vec3::Z, -angle),
                '*' => turtle.rotate_local(Vec3::Y, angle),
                '/' => turtle.rotate_local(Vec3::Y, -angle),
                symbol => {
                    if let Some(rule) = geometry.get(symbol) {
                        let out = rule.evaluate(&turtle, element.parameter);
                        let node = &mut nodes[current];
                        if let Some(main) = out.main {
                            let voxel = turtle.voxel();
                            node.main_blocks.entry(voxel).or_insert(index);
                            node.placements.entry(index).or_default().insert(voxel, main);
                        }
                        if !out.additional.is_empty() {
                            let step = node.placements.entry(index).or_default();
                            for (voxel, block) in out.additional {
                                step.insert(voxel, block);
                            }
                        }
                        if out.advance != 0.0 {
                            turtle.advance(out.advance);
                        }
                    }
                }
            }
        }

        if !stack.is_empty() {
            return Err(StructureError::UnclosedBranches { open: stack.len() });
        }

        Ok(Self { nodes, root: 0 })
    }

    /// Merges every branch's placements into one flat map.
    ///
    /// Per voxel the highest structural priority wins; ties keep the
    /// first placement encountered. Traversal order (own placements by
    /// index, then children in registration order) is deterministic.
    #[must_use]
    pub fn block_map(&self) -> BlockMap {
        let mut map = BlockMap::new();
        self.gather(self.root, &mut map);
        map
    }

    fn gather(&self, node: usize, map: &mut BlockMap) {
        let branch = &self.nodes[node];
        for step in branch.placements.values() {
            for (voxel, block) in step {
                match map.get(voxel) {
                    Some(existing) if existing.part >= block.part => {}
                    _ => {
                        map.insert(*voxel, *block);
                    }
                }
            }
        }
        for &child in &branch.children {
            self.gather(child, map);
        }
    }

    /// Depth-first search for the branch whose main-block map contains
    /// `voxel`; returns the branch's arena index and the axiom index that
    /// claimed the voxel. First match wins; `None` means the voxel is not
    /// part of this structure's path.
    #[must_use]
    pub fn find_branch(&self, voxel: IVec3) -> Option<(usize, usize)> {
        self.find_in(self.root, voxel)
    }

    fn find_in(&self, node: usize, voxel: IVec3) -> Option<(usize, usize)> {
        let branch = &self.nodes[node];
        if let Some(index) = branch.main_index_of(voxel) {
            return Some((node, index));
        }
        branch
            .children
            .iter()
            .find_map(|&child| self.find_in(child, voxel))
    }

    /// Borrows a node by arena index.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&BranchNode> {
        self.nodes.get(index)
    }

    /// Drops, transitively, every placement and child branch whose axiom
    /// index is strictly greater than `after_index`.
    ///
    /// Unlinked children stay in the arena but become unreachable;
    /// structures are rebuilt from the axiom, never compacted in place.
    pub fn trim(&mut self, after_index: usize) {
        self.trim_node(self.root, after_index);
    }

    fn trim_node(&mut self, node: usize, after_index: usize) {
        let branch = &mut self.nodes[node];
        branch.placements.retain(|&index, _| index <= after_index);
        branch.main_blocks.retain(|_, &mut index| index <= after_index);
        let children = std::mem::take(&mut branch.children);
        let kept: Vec<usize> = children
            .into_iter()
            .filter(|&child| self.nodes[child].start_index <= after_index)
            .collect();
        self.nodes[node].children = kept.clone();
        for child in kept {
            self.trim_node(child, after_index);
        }
    }
}

/// Returns `map` shifted by `offset` (tree-local to world coordinates).
#[must_use]
pub fn translated(map: &BlockMap, offset: IVec3) -> BlockMap {
    map.iter().map(|(voxel, block)| (*voxel + offset, *block)).collect()
}

/// The minimal voxel edits turning one block map into another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockDiff {
    /// Voxels the new structure claims that the old one did not.
    pub to_place: BlockMap,
    /// Voxels both claim, with a different definition in the new one.
    pub to_replace: BlockMap,
    /// Voxels only the old structure claimed; cleared to air.
    pub to_remove: BTreeSet<IVec3>,
}

impl BlockDiff {
    /// True when the maps are already identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_place.is_empty() && self.to_replace.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the minimal edit batch from `old` to `new`.
///
/// Unchanged voxels appear in neither output, so applying the diff leaves
/// already-correct world blocks untouched.
#[must_use]
pub fn diff(old: &BlockMap, new: &BlockMap) -> BlockDiff {
    let mut result = BlockDiff::default();
    for (voxel, block) in new {
        match old.get(voxel) {
            None => {
                result.to_place.insert(*voxel, *block);
            }
            Some(previous) if previous != block => {
                result.to_replace.insert(*voxel, *block);
            }
            Some(_) => {}
        }
    }
    for voxel in old.keys() {
        if !new.contains_key(voxel) {
            result.to_remove.insert(*voxel);
        }
    }
    result
}
