//! TileMap: the arena tile grid with collision queries.

use siege_core::constants::{TILE_SIZE, WALL_INTEGRITY};
use siege_core::enums::TileType;
use siege_core::types::Position;

/// Row-major tile grid. Walls carry an integrity counter; every other
/// tile type is permanent.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileType>,
    integrity: Vec<u8>,
}

impl TileMap {
    /// An empty grid of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Empty; width * height],
            integrity: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return None;
        }
        Some(ty as usize * self.width + tx as usize)
    }

    /// Tile at grid coordinates. Outside the grid reads as steel.
    pub fn get(&self, tx: i32, ty: i32) -> TileType {
        self.index(tx, ty).map_or(TileType::Steel, |i| self.tiles[i])
    }

    /// Set a tile. Walls start at full integrity. Out-of-range writes are ignored.
    pub fn set(&mut self, tx: i32, ty: i32, tile: TileType) {
        if let Some(i) = self.index(tx, ty) {
            self.tiles[i] = tile;
            self.integrity[i] = if tile == TileType::Wall { WALL_INTEGRITY } else { 0 };
        }
    }

    /// Fill an inclusive tile rectangle.
    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, tile: TileType) {
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                self.set(tx, ty, tile);
            }
        }
    }

    /// Tile under a world position.
    pub fn tile_at(&self, pos: &Position) -> TileType {
        let (tx, ty) = pos.tile();
        self.get(tx, ty)
    }

    pub fn is_solid_at(&self, pos: &Position) -> bool {
        self.tile_at(pos).is_solid()
    }

    /// Whether a tile is passable and free of structures.
    pub fn is_open(&self, tx: i32, ty: i32) -> bool {
        matches!(self.get(tx, ty), TileType::Empty | TileType::Forest)
    }

    /// Whether a circle overlaps any solid tile.
    pub fn circle_blocked(&self, center: &Position, radius: f64) -> bool {
        let min_tx = ((center.x - radius) / TILE_SIZE).floor() as i32;
        let max_tx = ((center.x + radius) / TILE_SIZE).floor() as i32;
        let min_ty = ((center.y - radius) / TILE_SIZE).floor() as i32;
        let max_ty = ((center.y + radius) / TILE_SIZE).floor() as i32;
        let r2 = radius * radius;

        for ty in min_ty..=max_ty {
            for tx in min_tx..=max_tx {
                if !self.get(tx, ty).is_solid() {
                    continue;
                }
                // Closest point on the tile rectangle to the circle center
                let left = tx as f64 * TILE_SIZE;
                let top = ty as f64 * TILE_SIZE;
                let cx = center.x.clamp(left, left + TILE_SIZE);
                let cy = center.y.clamp(top, top + TILE_SIZE);
                let dx = center.x - cx;
                let dy = center.y - cy;
                if dx * dx + dy * dy < r2 {
                    return true;
                }
            }
        }
        false
    }

    /// Remaining integrity of a wall tile (0 for anything else).
    pub fn integrity(&self, tx: i32, ty: i32) -> u8 {
        self.index(tx, ty).map_or(0, |i| self.integrity[i])
    }

    /// Chip one point off a wall tile. Returns true if the wall collapsed.
    pub fn damage_wall(&mut self, tx: i32, ty: i32) -> bool {
        let Some(i) = self.index(tx, ty) else {
            return false;
        };
        if self.tiles[i] != TileType::Wall {
            return false;
        }
        self.integrity[i] = self.integrity[i].saturating_sub(1);
        if self.integrity[i] == 0 {
            self.tiles[i] = TileType::Empty;
            return true;
        }
        false
    }

    /// Chip every wall tile whose center lies within `radius` of `center`.
    /// Returns the tiles that collapsed.
    pub fn damage_walls_in_radius(&mut self, center: &Position, radius: f64) -> Vec<(i32, i32)> {
        let min_tx = ((center.x - radius) / TILE_SIZE).floor() as i32;
        let max_tx = ((center.x + radius) / TILE_SIZE).floor() as i32;
        let min_ty = ((center.y - radius) / TILE_SIZE).floor() as i32;
        let max_ty = ((center.y + radius) / TILE_SIZE).floor() as i32;

        let mut collapsed = Vec::new();
        for ty in min_ty..=max_ty {
            for tx in min_tx..=max_tx {
                if self.get(tx, ty) != TileType::Wall {
                    continue;
                }
                if Position::from_tile(tx, ty).distance_to(center) > radius {
                    continue;
                }
                if self.damage_wall(tx, ty) {
                    collapsed.push((tx, ty));
                }
            }
        }
        collapsed
    }

    /// Count of tiles of a given type.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_as_steel() {
        let map = TileMap::new(4, 4);
        assert_eq!(map.get(-1, 0), TileType::Steel);
        assert_eq!(map.get(4, 0), TileType::Steel);
        assert_eq!(map.get(2, 2), TileType::Empty);
    }

    #[test]
    fn test_circle_blocked_by_adjacent_wall() {
        let mut map = TileMap::new(10, 10);
        map.set(5, 5, TileType::Steel);

        // Tile (5,5) spans x 200..240. A radius-18 circle centered at x=185
        // reaches x=203 and overlaps it.
        let touching = Position::new(185.0, 220.0);
        assert!(map.circle_blocked(&touching, 18.0));

        let clear = Position::new(170.0, 220.0);
        assert!(!map.circle_blocked(&clear, 18.0), "circle ends at x=188");
    }

    #[test]
    fn test_water_and_forest_do_not_block() {
        let mut map = TileMap::new(10, 10);
        map.set(5, 5, TileType::Water);
        map.set(6, 5, TileType::Forest);
        assert!(!map.circle_blocked(&Position::from_tile(5, 5), 18.0));
        assert!(!map.circle_blocked(&Position::from_tile(6, 5), 18.0));
    }

    #[test]
    fn test_wall_collapses_after_integrity_hits() {
        let mut map = TileMap::new(10, 10);
        map.set(3, 3, TileType::Wall);
        assert_eq!(map.integrity(3, 3), WALL_INTEGRITY);

        for _ in 0..WALL_INTEGRITY - 1 {
            assert!(!map.damage_wall(3, 3));
        }
        assert!(map.damage_wall(3, 3), "last hit collapses the wall");
        assert_eq!(map.get(3, 3), TileType::Empty);
        assert!(!map.damage_wall(3, 3), "empty tiles take no damage");
    }

    #[test]
    fn test_steel_is_indestructible() {
        let mut map = TileMap::new(10, 10);
        map.set(3, 3, TileType::Steel);
        for _ in 0..10 {
            map.damage_wall(3, 3);
        }
        assert_eq!(map.get(3, 3), TileType::Steel);
    }

    #[test]
    fn test_splash_chips_walls_in_radius() {
        let mut map = TileMap::new(10, 10);
        map.set(3, 3, TileType::Wall);
        map.set(8, 8, TileType::Wall);
        let center = Position::from_tile(3, 4);
        map.damage_walls_in_radius(&center, 75.0);
        assert_eq!(map.integrity(3, 3), WALL_INTEGRITY - 1);
        assert_eq!(map.integrity(8, 8), WALL_INTEGRITY, "far wall untouched");
    }
}
