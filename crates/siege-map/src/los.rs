//! Grid line-of-sight and ray casting.
//!
//! Uses stepped ray traversal: the segment is sampled at a fixed interval
//! and any sample inside a solid tile blocks it.

use siege_core::constants::TILE_SIZE;
use siege_core::types::Position;

use crate::grid::TileMap;

/// Sample interval along a ray (px). A quarter tile cannot skip a tile corner
/// by more than a few pixels.
const LOS_SAMPLE_INTERVAL: f64 = TILE_SIZE / 4.0;

/// Result of casting a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Last unobstructed point along the ray.
    pub end: Position,
    /// Solid tile that stopped the ray, if any.
    pub tile: Option<(i32, i32)>,
}

/// Check line-of-sight between two world points.
///
/// Endpoints themselves are not tested, so a tank standing next to a wall
/// can still see out.
pub fn has_line_of_sight(map: &TileMap, from: &Position, to: &Position) -> bool {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist < LOS_SAMPLE_INTERVAL {
        return true;
    }

    let num_samples = (dist / LOS_SAMPLE_INTERVAL).ceil() as usize;
    for i in 1..num_samples {
        let t = i as f64 / num_samples as f64;
        let sample = Position::new(from.x + dx * t, from.y + dy * t);
        if map.is_solid_at(&sample) {
            return false;
        }
    }
    true
}

/// Cast a ray from `from` along `angle` for at most `max_dist` px, stopping
/// at the first solid tile.
pub fn cast_ray(map: &TileMap, from: &Position, angle: f64, max_dist: f64) -> RayHit {
    let (sin, cos) = angle.sin_cos();
    let num_samples = (max_dist / LOS_SAMPLE_INTERVAL).ceil().max(1.0) as usize;
    let mut last = *from;

    for i in 1..=num_samples {
        let d = (i as f64 * LOS_SAMPLE_INTERVAL).min(max_dist);
        let sample = Position::new(from.x + cos * d, from.y + sin * d);
        if map.is_solid_at(&sample) {
            return RayHit {
                end: last,
                tile: Some(sample.tile()),
            };
        }
        last = sample;
    }
    RayHit { end: last, tile: None }
}
