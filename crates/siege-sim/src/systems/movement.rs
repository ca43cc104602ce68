//! Physics and movement step.
//!
//! Tanks accelerate toward their move intent, lose speed to friction picked
//! by terrain and weather, and slide along walls by rejecting each axis
//! separately. Overlapping tanks are pushed apart. Projectiles integrate
//! and age here; their impacts resolve in combat.

use glam::DVec2;
use hecs::{Entity, World};

use siege_core::components::*;
use siege_core::constants::*;
use siege_core::enums::{Faction, ParticleKind, TileType, WeatherType};
use siege_core::types::{angle_diff, Position, Velocity};
use siege_map::{has_line_of_sight, TileMap};

use crate::systems::effects;
use crate::systems::weather::WeatherModifiers;

/// Per-tick friction for a tile under the current weather, before the
/// weather friction multiplier.
pub fn base_friction(tile: TileType, weather: WeatherType) -> f64 {
    match (tile, weather) {
        (TileType::Water, WeatherType::Freeze) => ICE_FRICTION,
        (TileType::Water, _) => WATER_FRICTION,
        (TileType::Forest, WeatherType::Freeze) => SNOW_FRICTION,
        (_, WeatherType::Thunderstorm) => RAIN_FRICTION,
        _ => FRICTION,
    }
}

/// Friction coefficient after weather scaling, capped below 1.
pub fn friction(tile: TileType, weather: WeatherType, mods: &WeatherModifiers) -> f64 {
    (base_friction(tile, weather) * mods.friction_mult).min(MAX_FRICTION)
}

/// Multiplicative speed modifier from buffs, terrain and status.
pub fn speed_multiplier(buffs: &Buffs, status: &StatusEffects, tile: TileType, weather: WeatherType) -> f64 {
    let mut mult = 1.0;
    if buffs.turbo > 0.0 {
        mult *= SPEED_MOD_TURBO;
    }
    if buffs.rage > 0.0 {
        mult *= SPEED_MOD_RAGE;
    }
    if buffs.perm_speed {
        mult *= SPEED_MOD_PERM_SPEED;
    }
    if buffs.buff_blue > 0.0 {
        mult *= SPEED_MOD_BUFF_BLUE;
    }
    mult *= match (tile, weather) {
        (TileType::Water, WeatherType::Freeze) => SPEED_MOD_ICE_PLATE,
        (TileType::Water, _) => SPEED_MOD_WATER,
        (TileType::Forest, WeatherType::Freeze) => SPEED_MOD_SNOW_DRIFT,
        (TileType::Forest, _) => SPEED_MOD_FOREST,
        _ => 1.0,
    };
    if status.freeze > 0.0 {
        mult *= FREEZER_SLOW;
    }
    mult
}

/// Rotate `from` toward `to` by at most `max_step` radians.
pub fn turn_toward(from: f64, to: f64, max_step: f64) -> f64 {
    let diff = angle_diff(from, to);
    if diff.abs() <= max_step {
        to
    } else {
        from + max_step * diff.signum()
    }
}

/// Run the full movement step.
pub fn run(
    world: &mut World,
    map: &TileMap,
    weather: WeatherType,
    mods: &WeatherModifiers,
    despawn_buffer: &mut Vec<Entity>,
) {
    move_tanks(world, map, weather, mods);
    separate_tanks(world, map);
    move_projectiles(world, map);
    pickups(world, despawn_buffer);
}

fn move_tanks(world: &mut World, map: &TileMap, weather: WeatherType, mods: &WeatherModifiers) {
    for (_entity, (pos, vel, body, health, intent, buffs, status)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        &mut TankBody,
        &Health,
        &Intent,
        &Buffs,
        &StatusEffects,
    )>() {
        if health.dead {
            *vel = Velocity::default();
            continue;
        }

        let tile = map.tile_at(pos);
        let f = friction(tile, weather, mods);
        let max_speed = body.base_speed * speed_multiplier(buffs, status, tile, weather);

        let prev_speed = vel.speed();
        let dir = DVec2::new(intent.move_x, intent.move_y).normalize_or_zero();
        let mut v = vel.as_vec() + dir * max_speed * ACCEL_FACTOR * DT;
        v *= f;
        // Dash impulses exceed the cap and bleed off through friction only.
        let cap = max_speed.max(prev_speed * f);
        if v.length() > cap {
            v = v.normalize_or_zero() * cap;
        }

        let next_x = Position::new(pos.x + v.x * DT, pos.y);
        if map.circle_blocked(&next_x, body.radius) {
            v.x = 0.0;
        } else {
            pos.x = next_x.x;
        }
        let next_y = Position::new(pos.x, pos.y + v.y * DT);
        if map.circle_blocked(&next_y, body.radius) {
            v.y = 0.0;
        } else {
            pos.y = next_y.y;
        }
        pos.x = pos.x.clamp(body.radius, WORLD_WIDTH - body.radius);
        pos.y = pos.y.clamp(body.radius, WORLD_HEIGHT - body.radius);
        *vel = Velocity::from_vec(v);

        if dir != DVec2::ZERO {
            body.heading = turn_toward(body.heading, dir.y.atan2(dir.x), ROTATION_SPEED * DT);
        }
        body.turret_heading = if body.is_player {
            intent.aim
        } else {
            turn_toward(body.turret_heading, intent.aim, ROTATION_SPEED * DT)
        };
    }
}

/// Push overlapping living tanks apart, half the overlap each, unless the
/// push would shove a tank into a wall.
fn separate_tanks(world: &mut World, map: &TileMap) {
    let tanks: Vec<(Entity, Position, f64)> = world
        .query::<(&Position, &TankBody, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| !health.dead)
        .map(|(e, (pos, body, _))| (e, *pos, body.radius))
        .collect();

    let mut pushes: Vec<DVec2> = vec![DVec2::ZERO; tanks.len()];
    for i in 0..tanks.len() {
        for j in (i + 1)..tanks.len() {
            let delta = tanks[j].1.as_vec() - tanks[i].1.as_vec();
            let dist = delta.length();
            let overlap = tanks[i].2 + tanks[j].2 - dist;
            if overlap <= 0.0 {
                continue;
            }
            let normal = if dist > 1e-6 { delta / dist } else { DVec2::X };
            pushes[i] -= normal * overlap * 0.5;
            pushes[j] += normal * overlap * 0.5;
        }
    }

    for ((entity, pos, radius), push) in tanks.into_iter().zip(pushes) {
        if push == DVec2::ZERO {
            continue;
        }
        let moved = Position::from_vec(pos.as_vec() + push);
        if map.circle_blocked(&moved, radius) {
            continue;
        }
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = moved;
        }
    }
}

/// Integrate projectiles; missiles steer toward the nearest visible hostile.
fn move_projectiles(world: &mut World, map: &TileMap) {
    let tanks: Vec<(Position, Faction, bool)> = world
        .query::<(&Position, &TankBody, &Health, &StatusEffects)>()
        .iter()
        .filter(|(_, (_, _, health, _))| !health.dead)
        .map(|(_, (pos, body, _, status))| (*pos, body.faction, status.stealth > 0.0))
        .collect();

    for (_entity, (pos, vel, proj)) in world.query_mut::<(&mut Position, &mut Velocity, &mut Projectile)>() {
        proj.life -= DT;
        if proj.homing {
            let here = *pos;
            let target = tanks
                .iter()
                .filter(|(p, faction, stealthed)| {
                    !stealthed
                        && proj.attacker.faction.is_hostile_to(*faction)
                        && p.distance_to(&here) <= MISSILE_SEEK_RANGE
                        && has_line_of_sight(map, &here, p)
                })
                .min_by(|a, b| a.0.distance_sq_to(&here).total_cmp(&b.0.distance_sq_to(&here)));
            if let Some((target_pos, _, _)) = target {
                let heading = turn_toward(vel.heading(), here.angle_to(target_pos), MISSILE_TURN_RATE * DT);
                let speed = vel.speed();
                *vel = Velocity::new(heading.cos() * speed, heading.sin() * speed);
            }
        }
        pos.x += vel.x * DT;
        pos.y += vel.y * DT;
    }
}

/// Living tanks overlapping a health pack consume it.
fn pickups(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    let packs: Vec<(Entity, Position, f64)> = world
        .query::<(&Position, &HealthPack)>()
        .iter()
        .map(|(e, (pos, pack))| (e, *pos, pack.value))
        .collect();

    let mut healed: Vec<Position> = Vec::new();
    for (pack, pack_pos, value) in packs {
        for (_e, (pos, body, health)) in world.query_mut::<(&Position, &TankBody, &mut Health)>() {
            if health.dead || pos.distance_to(&pack_pos) > body.radius + HEALTH_PACK_RADIUS {
                continue;
            }
            health.hp = (health.hp + value).min(health.max_hp);
            despawn_buffer.push(pack);
            healed.push(pack_pos);
            break;
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    for pos in healed {
        effects::spawn_burst(world, ParticleKind::Heal, pos, 6, 40.0, 0.6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friction_by_terrain_and_weather() {
        assert_eq!(base_friction(TileType::Empty, WeatherType::Clear), FRICTION);
        assert_eq!(base_friction(TileType::Water, WeatherType::Clear), WATER_FRICTION);
        assert_eq!(base_friction(TileType::Water, WeatherType::Freeze), ICE_FRICTION);
        assert_eq!(base_friction(TileType::Forest, WeatherType::Freeze), SNOW_FRICTION);
        assert_eq!(base_friction(TileType::Empty, WeatherType::Thunderstorm), RAIN_FRICTION);
        assert_eq!(base_friction(TileType::Water, WeatherType::Thunderstorm), WATER_FRICTION);
    }

    #[test]
    fn test_friction_capped_under_freeze_weather() {
        let mods = crate::systems::weather::modifiers(WeatherType::Freeze);
        assert_eq!(friction(TileType::Water, WeatherType::Freeze, &mods), MAX_FRICTION);
    }

    #[test]
    fn test_speed_multiplier_stacks() {
        let buffs = Buffs {
            turbo: 1.0,
            rage: 1.0,
            ..Buffs::default()
        };
        let frozen = StatusEffects {
            freeze: 1.0,
            ..StatusEffects::default()
        };
        let m = speed_multiplier(&buffs, &frozen, TileType::Forest, WeatherType::Clear);
        let expected = SPEED_MOD_TURBO * SPEED_MOD_RAGE * SPEED_MOD_FOREST * FREEZER_SLOW;
        assert!((m - expected).abs() < 1e-12);
    }

    #[test]
    fn test_turn_toward_clamps_step() {
        assert_eq!(turn_toward(0.0, 0.05, 0.1), 0.05);
        assert!((turn_toward(0.0, 1.0, 0.1) - 0.1).abs() < 1e-12);
        assert!((turn_toward(0.0, -1.0, 0.1) + 0.1).abs() < 1e-12);
    }
}
