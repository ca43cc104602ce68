//! Cleanup system: removes destroyed tanks and stray projectiles.

use hecs::{Entity, World};

use siege_core::components::{Health, Projectile, TankBody};
use siege_core::constants::{WORLD_HEIGHT, WORLD_WIDTH};
use siege_core::types::{Position, Rect};

/// Remove dead AI tanks (kill credit is settled by now) and projectiles
/// that left the world. The player's tank stays for the respawn sequence.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (body, health)) in world.query_mut::<(&TankBody, &Health)>() {
        if health.dead && !body.is_player {
            despawn_buffer.push(entity);
        }
    }

    let bounds = Rect {
        x: 0.0,
        y: 0.0,
        w: WORLD_WIDTH,
        h: WORLD_HEIGHT,
    };
    for (entity, (pos, _)) in world.query_mut::<(&Position, &Projectile)>() {
        if !bounds.contains(pos) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
