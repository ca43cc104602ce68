//! NEON SIEGE headless runner.
//!
//! Drives the simulation on a fixed-rate game-loop thread, feeds it player
//! commands over a channel and keeps the latest snapshot for readers.

pub mod config;
pub mod game_loop;
pub mod state;

pub use siege_core as core;
