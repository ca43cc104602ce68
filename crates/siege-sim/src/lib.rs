//! Simulation engine for NEON SIEGE.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the outer loop.

pub mod engine;
pub mod feed;
pub mod ids;
pub mod match_state;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use siege_core as core;
