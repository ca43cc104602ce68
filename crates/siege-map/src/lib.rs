//! Arena map for NEON SIEGE.
//!
//! Static tile grid, the standard arena layout, tile collision
//! queries and grid line-of-sight.

pub use siege_core as core;

pub mod grid;
pub mod layout;
pub mod los;

// Re-export key types for convenience.
pub use grid::TileMap;
pub use los::{cast_ray, has_line_of_sight, RayHit};
