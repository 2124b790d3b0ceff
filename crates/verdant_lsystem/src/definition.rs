//! One tree species: grammar + geometry + shape parameters.
//!
//! A [`TreeDefinition`] owns everything needed to take an axiom string to
//! a [`TreeStructure`]. Per-tree variation (branch angle, trunk rotation)
//! is sampled once when the tree is planted and stored with the plant, so
//! rebuilding a structure is reproducible for its lifetime.

use rand::Rng;

use crate::axiom::Axiom;
use crate::error::DefinitionError;
use crate::geometry::{GeometryRule, GeometryRuleSet, TreeBlock};
use crate::grammar::{Grammar, Replacement};
use crate::structure::TreeStructure;
use verdant_shared::Block;

/// Grammar, geometry and shape parameters for one tree species.
#[derive(Debug)]
pub struct TreeDefinition {
    seed_axiom: String,
    grammar: Grammar,
    geometry: GeometryRuleSet,
    branch_angle_degrees: f32,
    angle_spread_degrees: f32,
}

impl TreeDefinition {
    /// Creates a definition with the default 30 +/- 10 degree branch angle.
    #[must_use]
    pub fn new(seed_axiom: impl Into<String>, grammar: Grammar, geometry: GeometryRuleSet) -> Self {
        Self {
            seed_axiom: seed_axiom.into(),
            grammar,
            geometry,
            branch_angle_degrees: 30.0,
            angle_spread_degrees: 10.0,
        }
    }

    /// Overrides the branch angle: `base` +/- `spread`, both in degrees.
    #[must_use]
    pub fn with_branch_angle(mut self, base: f32, spread: f32) -> Self {
        self.branch_angle_degrees = base;
        self.angle_spread_degrees = spread;
        self
    }

    /// The axiom every new plant of this species starts from.
    #[must_use]
    pub fn seed_axiom(&self) -> &str {
        &self.seed_axiom
    }

    /// Samples a per-tree branch angle, in radians.
    pub fn sample_branch_angle<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let spread = self.angle_spread_degrees;
        let degrees = if spread > 0.0 {
            self.branch_angle_degrees + rng.gen_range(-spread..=spread)
        } else {
            self.branch_angle_degrees
        };
        degrees.to_radians()
    }

    /// Samples a per-tree trunk rotation, in radians.
    pub fn sample_trunk_rotation<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(0.0..std::f32::consts::TAU)
    }

    /// Rewrites `axiom_text` by one generation.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::Grammar`] for malformed axiom or replacement
    /// text.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        axiom_text: &str,
        rng: &mut R,
    ) -> Result<String, DefinitionError> {
        let axiom = Axiom::parse(axiom_text)?;
        let rewritten = self.grammar.rewrite(&axiom, rng)?;
        Ok(rewritten.to_string())
    }

    /// True while any symbol of `axiom_text` still has a replacement
    /// rule; once false the plant has reached its final form.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::Grammar`] for malformed axiom text.
    pub fn can_grow(&self, axiom_text: &str) -> Result<bool, DefinitionError> {
        let axiom = Axiom::parse(axiom_text)?;
        Ok(axiom.elements().iter().any(|e| self.grammar.has_rule(e.symbol)))
    }

    /// Interprets `axiom_text` into a branch structure.
    ///
    /// Angles are radians, as stored per plant.
    ///
    /// # Errors
    ///
    /// [`DefinitionError`] for malformed text or unbalanced branches.
    pub fn build_structure(
        &self,
        axiom_text: &str,
        branch_angle: f32,
        trunk_rotation: f32,
    ) -> Result<TreeStructure, DefinitionError> {
        let axiom = Axiom::parse(axiom_text)?;
        let structure =
            TreeStructure::build(&axiom, &self.geometry, branch_angle, trunk_rotation)?;
        Ok(structure)
    }

    /// The stock oak: trunk segments splitting into pitched branch pairs,
    /// each tipped with a leaf canopy.
    ///
    /// Symbols: `s` sapling, `T` trunk segment, `B` branch segment,
    /// `c` canopy tip.
    #[must_use]
    pub fn oak() -> Self {
        let grammar = Grammar::new()
            .with_rule('s', 1.0, Replacement::text("TTc"))
            .and_then(|g| g.with_rule('c', 0.45, Replacement::text("T[&Bc][^Bc]c")))
            .and_then(|g| g.with_rule('c', 0.3, Replacement::text("TTc")))
            .expect("oak probability table sums below 1");

        let geometry = GeometryRuleSet::new()
            .with_rule(
                's',
                GeometryRule::Segment { block: TreeBlock::sapling(Block::SAPLING), advance: 0.0 },
            )
            .with_rule(
                'T',
                GeometryRule::Segment { block: TreeBlock::trunk(Block::TRUNK), advance: 1.0 },
            )
            .with_rule(
                'B',
                GeometryRule::Segment { block: TreeBlock::branch(Block::BRANCH), advance: 1.0 },
            )
            .with_rule(
                'c',
                GeometryRule::Canopy {
                    core: TreeBlock::branch(Block::BRANCH),
                    leaf: TreeBlock::leaf(Block::LEAVES),
                    radius: 2,
                    advance: 1.0,
                },
            );

        Self::new("s", grammar, geometry).with_branch_angle(30.0, 10.0)
    }
}
