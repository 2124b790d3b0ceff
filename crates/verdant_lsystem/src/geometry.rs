//! Block-emission rules: how grammar symbols become voxels.
//!
//! A [`GeometryRule`] is invoked with the turtle's current pose and the
//! symbol's parameter; it produces at most one "main" placement (the
//! tree's logical path - what the destruction query walks) plus any number
//! of "additional" placements (canopy filler), and may advance the turtle.

use serde::{Deserialize, Serialize};
use verdant_shared::{Block, IVec3};

use crate::turtle::Turtle;

/// Structural role of a placed block.
///
/// The discriminant is the structural priority: when two generation steps
/// claim the same voxel, the higher part always wins.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum TreePart {
    /// Freshly planted sapling.
    Sapling = 0,
    /// Leaf canopy.
    Leaf = 1,
    /// Branch wood.
    Branch = 2,
    /// Trunk wood.
    Trunk = 3,
}

impl TreePart {
    /// Structural priority; higher wins voxel conflicts.
    #[inline]
    #[must_use]
    pub const fn priority(self) -> u8 {
        self as u8
    }
}

/// A block id tagged with its structural role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeBlock {
    /// The world block to place.
    pub block: Block,
    /// The structural role used for priority resolution.
    pub part: TreePart,
}

impl TreeBlock {
    /// Creates a tagged block.
    #[must_use]
    pub const fn new(block: Block, part: TreePart) -> Self {
        Self { block, part }
    }

    /// Trunk wood with trunk priority.
    #[must_use]
    pub const fn trunk(block: Block) -> Self {
        Self::new(block, TreePart::Trunk)
    }

    /// Branch wood with branch priority.
    #[must_use]
    pub const fn branch(block: Block) -> Self {
        Self::new(block, TreePart::Branch)
    }

    /// Leaves with leaf priority.
    #[must_use]
    pub const fn leaf(block: Block) -> Self {
        Self::new(block, TreePart::Leaf)
    }

    /// Sapling with the lowest priority.
    #[must_use]
    pub const fn sapling(block: Block) -> Self {
        Self::new(block, TreePart::Sapling)
    }
}

/// What one geometry rule invocation produced.
#[derive(Debug, Default)]
pub struct GeometryOutput {
    /// The placement that advances the tree's logical path, at the
    /// turtle's current voxel.
    pub main: Option<TreeBlock>,
    /// Extra placements at absolute voxels (canopy filler).
    pub additional: Vec<(IVec3, TreeBlock)>,
    /// Distance to move the turtle along its local up axis afterwards.
    pub advance: f32,
}

/// Closure form of a geometry rule.
pub type GeometryFn = Box<dyn Fn(&Turtle, Option<f32>) -> GeometryOutput + Send + Sync>;

/// Symbol-specific block emission.
pub enum GeometryRule {
    /// One main block at the turtle, then advance.
    ///
    /// The element parameter, when present, overrides the advance
    /// distance (segment length scaling).
    Segment {
        /// Block placed at the turtle's voxel.
        block: TreeBlock,
        /// Default advance distance.
        advance: f32,
    },
    /// One main block wrapped in a ball of leaves, then advance.
    ///
    /// The element parameter, when present, overrides the canopy radius.
    Canopy {
        /// Block placed at the turtle's voxel.
        core: TreeBlock,
        /// Leaf block filling the ball around the core.
        leaf: TreeBlock,
        /// Canopy ball radius in voxels.
        radius: i32,
        /// Advance distance after placing.
        advance: f32,
    },
    /// Arbitrary emission logic.
    Custom(GeometryFn),
}

impl GeometryRule {
    /// Evaluates the rule at the given pose.
    #[must_use]
    pub fn evaluate(&self, turtle: &Turtle, parameter: Option<f32>) -> GeometryOutput {
        match self {
            Self::Segment { block, advance } => GeometryOutput {
                main: Some(*block),
                additional: Vec::new(),
                advance: parameter.unwrap_or(*advance),
            },
            Self::Canopy { core, leaf, radius, advance } => {
                let radius = parameter.map_or(*radius, |p| p.round() as i32).max(0);
                GeometryOutput {
                    main: Some(*core),
                    additional: canopy_ball(turtle.voxel(), radius, *leaf),
                    advance: *advance,
                }
            }
            Self::Custom(f) => f(turtle, parameter),
        }
    }
}

impl std::fmt::Debug for GeometryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segment { block, advance } => f
                .debug_struct("Segment")
                .field("block", block)
                .field("advance", advance)
                .finish(),
            Self::Canopy { core, leaf, radius, advance } => f
                .debug_struct("Canopy")
                .field("core", core)
                .field("leaf", leaf)
                .field("radius", radius)
                .field("advance", advance)
                .finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

/// Leaf ball around `center`, corners shaved for a rounder shape,
/// center voxel left to the core block.
fn canopy_ball(center: IVec3, radius: i32, leaf: TreeBlock) -> Vec<(IVec3, TreeBlock)> {
    let mut blocks = Vec::new();
    for dy in -radius..=radius {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                let dist_sq = dx * dx + dy * dy + dz * dz;
                if dist_sq > radius * radius + 1 {
                    continue;
                }
                blocks.push((center + IVec3::new(dx, dy, dz), leaf));
            }
        }
    }
    blocks
}

/// Symbol -> [`GeometryRule`] table for one tree species.
#[derive(Debug, Default)]
pub struct GeometryRuleSet {
    rules: std::collections::HashMap<char, GeometryRule>,
}

impl GeometryRuleSet {
    /// Creates an empty ruleset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule for `symbol`, replacing any previous one.
    #[must_use]
    pub fn with_rule(mut self, symbol: char, rule: GeometryRule) -> Self {
        self.rules.insert(symbol, rule);
        self
    }

    /// Looks up the rule for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: char) -> Option<&GeometryRule> {
        self.rules.get(&symbol)
    }
}
