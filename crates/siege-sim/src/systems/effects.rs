//! Visual-only entities: particles and decals.
//!
//! Spawn helpers are deterministic (fan-out angles, no RNG) so effects
//! never perturb the simulation stream. Decay runs every tick, including
//! during the game-over sequence.

use std::f64::consts::TAU;

use hecs::{Entity, World};

use siege_core::components::{Decal, Particle};
use siege_core::constants::*;
use siege_core::enums::{DecalKind, ParticleKind};
use siege_core::types::{Position, Velocity};

/// Spawn `count` particles fanning out from `center`.
pub fn spawn_burst(world: &mut World, kind: ParticleKind, center: Position, count: usize, speed: f64, life: f64) {
    for i in 0..count {
        let angle = i as f64 * TAU / count.max(1) as f64;
        let (sin, cos) = angle.sin_cos();
        world.spawn((
            center,
            Velocity::new(cos * speed, sin * speed),
            Particle {
                kind,
                life,
                max_life: life,
                size: 3.0,
                hazard: None,
            },
        ));
    }
}

pub fn spawn_decal(world: &mut World, kind: DecalKind, position: Position, scale: f64) {
    world.spawn((
        position,
        Decal {
            kind,
            life: DECAL_LIFE,
            max_life: DECAL_LIFE,
            scale,
            rotation: 0.0,
        },
    ));
}

/// Sparks, smoke and a scorch mark sized to the blast.
pub fn explosion(world: &mut World, center: Position, radius: f64) {
    spawn_burst(world, ParticleKind::Spark, center, 8, radius * 3.0, 0.4);
    spawn_burst(world, ParticleKind::Smoke, center, 4, radius, 0.8);
    spawn_decal(world, DecalKind::Scorch, center, radius / TILE_SIZE);
}

/// Decay particles and decals, then enforce the population caps.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let mut particles: Vec<(Entity, f64)> = Vec::new();
    for (entity, (pos, vel, particle)) in world.query_mut::<(&mut Position, &Velocity, &mut Particle)>() {
        pos.x += vel.x * DT;
        pos.y += vel.y * DT;
        particle.life -= DT;
        if particle.life <= 0.0 {
            despawn_buffer.push(entity);
        } else if particle.hazard.is_none() {
            particles.push((entity, particle.life));
        }
    }

    let mut decals: Vec<(Entity, f64)> = Vec::new();
    for (entity, decal) in world.query_mut::<&mut Decal>() {
        decal.life -= DT;
        if decal.life <= 0.0 {
            despawn_buffer.push(entity);
        } else {
            decals.push((entity, decal.life));
        }
    }

    cull_oldest(&mut particles, MAX_PARTICLES, despawn_buffer);
    cull_oldest(&mut decals, MAX_DECALS, despawn_buffer);

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Queue the shortest-lived entries beyond `cap` for removal.
fn cull_oldest(entries: &mut [(Entity, f64)], cap: usize, out: &mut Vec<Entity>) {
    if entries.len() <= cap {
        return;
    }
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));
    let excess = entries.len() - cap;
    out.extend(entries[..excess].iter().map(|(e, _)| *e));
}
