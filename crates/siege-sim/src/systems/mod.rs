//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions that take `&mut World` (or `&World` for
//! read-only). Entity state lives in components; global match state lives
//! in [`crate::match_state::MatchState`].

pub mod ai;
pub mod cleanup;
pub mod combat;
pub mod effects;
pub mod game_over;
pub mod hub;
pub mod input;
pub mod kills;
pub mod movement;
pub mod respawn;
pub mod skills;
pub mod snapshot;
pub mod spawner;
pub mod specials;
pub mod status;
pub mod turrets;
pub mod weather;

/// Tolerance for accumulated-float comparisons against thresholds.
pub(crate) const EPSILON: f64 = 1e-9;
