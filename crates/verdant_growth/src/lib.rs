//! # VERDANT Growth
//!
//! The impure half of the flora simulation: everything that touches the
//! world, the clock, or a scheduler.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   delays    ┌──────────────────┐  batched edits  ┌───────┐
//! │ FloraSim     │────────────>│   GrowthEngine   │────────────────>│ World │
//! │ (scheduling) │<────────────│ (state machine)  │<────────────────│ (dyn) │
//! └──────────────┘   events    └──────────────────┘  loaded checks  └───────┘
//!                                      │
//!                                      v
//!                              verdant_lsystem
//!                         (pure rewrite/diff/trim)
//! ```
//!
//! The engine never blocks: "wait for the world" is expressed as a
//! returned reschedule delay, never as a blocking call (single-threaded
//! cooperative model).
//!
//! ## Core Components
//!
//! - [`contract`]: the [`WorldAccess`]/[`ActionScheduler`] traits
//! - [`GrowthEngine`]: per-tick growth, death, world-gen expansion
//! - [`destruction`]: ownership and cascade queries
//! - [`StagedPlantDefinition`]: simple staged growth for grass and bushes
//! - [`FloraSimulation`]: plant bookkeeping + scheduler wiring
//! - [`VoxelBuffer`]: in-memory world for world-gen and tests

pub mod config;
pub mod contract;
pub mod destruction;
pub mod engine;
pub mod events;
mod guard;
pub mod plant;
pub mod registry;
pub mod simulation;
pub mod staged;
pub mod world_buffer;

pub use config::GrowthConfig;
pub use contract::{ActionScheduler, WorldAccess, GROWTH_ACTION};
pub use engine::{GrowthEngine, GrowthError, UpdateOutcome};
pub use events::{flora_channel, FloraEvent, FloraEventReceiver, FloraEventSender};
pub use plant::{Plant, StagedPlant, TreeGrowthState};
pub use registry::{GrowthDefinition, PlantRegistry, TreeSpecies};
pub use simulation::FloraSimulation;
pub use staged::{GrowthStage, StagedPlantDefinition};
pub use world_buffer::VoxelBuffer;
