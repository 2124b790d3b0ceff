//! # VERDANT Shared
//!
//! Common types used by the L-system core and the growth engine.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - world storage
//! - the entity/component framework
//! - anything stateful
//!
//! If you need world access, put it behind a trait in `verdant_growth`.

pub mod block;
pub mod math;

pub use block::{Block, EntityId};
pub use math::{IVec3, Quaternion, Region, Vec3};
