//! Tank AI for NEON SIEGE.
//!
//! Implements the per-tank behavior state machine and class-driven
//! behavior profiles.

pub mod fsm;
pub mod profiles;

pub use siege_core as core;

#[cfg(test)]
mod tests;
