//! Standard arena layout, generated deterministically in code.

use siege_core::constants::{BASE_TILES, HUB_TILE, MAP_HEIGHT, MAP_WIDTH};
use siege_core::enums::TileType;

use crate::grid::TileMap;

/// Wall ring gap half-width (tiles).
const GAP: i32 = 1;

/// Steel pillars (top-left tile of a 2×2 block).
const PILLARS: [(i32, i32); 6] = [(30, 20), (90, 20), (30, 60), (90, 60), (60, 28), (60, 52)];

/// Forest patches (inclusive tile rectangles).
const FOREST: [(i32, i32, i32, i32); 4] = [
    (45, 50, 50, 55),
    (70, 22, 75, 27),
    (20, 55, 26, 60),
    (95, 18, 100, 23),
];

/// Vertical plasma river columns.
const RIVERS: [i32; 2] = [35, 84];

/// Build the standard 120×80 arena.
pub fn standard() -> TileMap {
    let mut map = TileMap::new(MAP_WIDTH, MAP_HEIGHT);
    let w = MAP_WIDTH as i32;
    let h = MAP_HEIGHT as i32;

    for x in RIVERS {
        map.fill(x, 15, x + 1, h - 16, TileType::Water);
    }
    for (x0, y0, x1, y1) in FOREST {
        map.fill(x0, y0, x1, y1, TileType::Forest);
    }
    for (x, y) in PILLARS {
        map.fill(x, y, x + 1, y + 1, TileType::Steel);
    }

    wall_ring(&mut map, HUB_TILE, 6);
    for (bx, by) in BASE_TILES {
        wall_ring(&mut map, (bx, by), 4);
        map.fill(bx - 1, by - 1, bx + 1, by + 1, TileType::Base);
    }

    // Border last so nothing overwrites it.
    map.fill(0, 0, w - 1, 0, TileType::Steel);
    map.fill(0, h - 1, w - 1, h - 1, TileType::Steel);
    map.fill(0, 0, 0, h - 1, TileType::Steel);
    map.fill(w - 1, 0, w - 1, h - 1, TileType::Steel);

    map
}

/// Square wall ring at Chebyshev distance `r`, with a gap in the middle of
/// each side.
fn wall_ring(map: &mut TileMap, (cx, cy): (i32, i32), r: i32) {
    for d in -r..=r {
        if d.abs() <= GAP {
            continue;
        }
        map.set(cx + d, cy - r, TileType::Wall);
        map.set(cx + d, cy + r, TileType::Wall);
        map.set(cx - r, cy + d, TileType::Wall);
        map.set(cx + r, cy + d, TileType::Wall);
    }
}
