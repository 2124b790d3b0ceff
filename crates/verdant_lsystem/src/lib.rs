//! # VERDANT L-System Core
//!
//! Deterministic, stochastic L-system tree generation.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a structure is a pure function of
//!    (axiom, branch angle, trunk rotation) - no ambient state
//! 2. **Indexed**: every placement remembers the axiom index that emitted
//!    it, so growth diffs and destruction trims are cheap
//! 3. **Pure**: this crate never touches the world; it only produces maps
//!    the growth engine applies
//!
//! ## Core Components
//!
//! - [`Axiom`]: parsed `symbol(parameter)` sequences
//! - [`Grammar`]: weighted stochastic replacement rules
//! - [`TreeStructure`]: the branch-indexed placement arena
//! - [`BlockDiff`]: minimal voxel edits between two structures
//! - [`TreeDefinition`]: grammar + geometry + shape parameters for one species
//!
//! ## Example
//!
//! ```rust,ignore
//! use verdant_lsystem::TreeDefinition;
//!
//! let oak = TreeDefinition::oak();
//! let axiom = oak.grow(oak.seed_axiom(), &mut rng)?;
//! let structure = oak.build_structure(&axiom, 35.0_f32.to_radians(), 0.0)?;
//! let blocks = structure.block_map();
//! ```

pub mod axiom;
pub mod definition;
pub mod error;
pub mod geometry;
pub mod grammar;
pub mod structure;
pub mod turtle;

pub use axiom::{Axiom, AxiomElement};
pub use definition::TreeDefinition;
pub use error::{DefinitionError, GrammarError, StructureError};
pub use geometry::{GeometryOutput, GeometryRule, GeometryRuleSet, TreeBlock, TreePart};
pub use grammar::{Grammar, Replacement};
pub use structure::{diff, translated, BlockDiff, BlockMap, BranchNode, TreeStructure};
pub use turtle::Turtle;
