//! Combat resolver: fire intent into projectiles and instant hits, then
//! damage, splash, heat and burn application.
//!
//! Damage is applied immediately in application order. The first lethal
//! hit marks the target dead and records the kill; later hits on a dead
//! target are ignored, so every death produces exactly one [`KillRecord`].

use std::f64::consts::PI;

use glam::DVec2;
use hecs::{Entity, World};

use siege_core::components::*;
use siege_core::config::weapon_stats;
use siege_core::constants::*;
use siege_core::enums::{Faction, ParticleKind, StatusKind, TileType, WeaponType};
use siege_core::events::SimEvent;
use siege_core::types::{Position, Velocity};
use siege_map::{cast_ray, TileMap};

use crate::ids::to_id;
use crate::match_state::MatchState;
use crate::systems::effects;
use crate::systems::status::apply_status;
use crate::systems::EPSILON;

/// A death produced this tick, resolved by the kills system.
#[derive(Debug, Clone)]
pub struct KillRecord {
    pub victim: Entity,
    pub attacker: Attacker,
}

/// Mutable match context shared by every damage path.
pub struct CombatCtx<'a> {
    pub map: &'a mut TileMap,
    pub state: &'a mut MatchState,
    pub kills: &'a mut Vec<KillRecord>,
    pub events: &'a mut Vec<SimEvent>,
    pub now: f64,
}

/// A trigger pull resolved to a single shot.
#[derive(Debug, Clone)]
struct Shot {
    shooter: Entity,
    origin: Position,
    angle: f64,
    weapon: WeaponType,
    damage: f64,
    attacker: Attacker,
    burn: bool,
}

/// Apply damage to a tank. Returns whether any damage landed.
///
/// Shielded, dead and friendly targets are skipped. Stale entities are a
/// no-op.
pub fn apply_damage(
    world: &mut World,
    target: Entity,
    amount: f64,
    attacker: &Attacker,
    now: f64,
    kills: &mut Vec<KillRecord>,
) -> bool {
    let Ok((body, health, buffs, status)) =
        world.query_one_mut::<(&TankBody, &mut Health, &Buffs, &mut StatusEffects)>(target)
    else {
        return false;
    };
    if health.dead || buffs.shield > 0.0 || amount <= 0.0 || !attacker.faction.is_hostile_to(body.faction) {
        return false;
    }

    health.hp = (health.hp - amount).clamp(0.0, health.max_hp);
    health.last_damaged_at = now;
    if attacker.is_player {
        health.player_hit_at = Some(now);
    }
    if let Some(id) = attacker.id.filter(|id| *id != to_id(target)) {
        status.aggro = AGGRO_DURATION;
        status.aggro_target = Some(id);
    }

    if health.hp <= 0.0 {
        health.dead = true;
        kills.push(KillRecord {
            victim: target,
            attacker: attacker.clone(),
        });
    }
    true
}

/// Whether damage credited to `attacker` is void this tick.
pub fn is_disarmed(state: &MatchState, attacker: &Attacker) -> bool {
    attacker.is_player && state.player_disarmed()
}

/// Set a tank burning, crediting `attacker` for the damage ticks.
pub fn ignite(world: &mut World, target: Entity, attacker: &Attacker) {
    if let Ok(mut status) = world.get::<&mut StatusEffects>(target) {
        apply_status(&mut status, StatusKind::Burn, BURN_DURATION, false);
        status.burn_source = Some(attacker.clone());
    }
}

/// Damage a faction base. Deactivates it at zero hp.
pub fn damage_base(ctx: &mut CombatCtx, faction: Faction, amount: f64, attacker: Faction) {
    if !attacker.is_hostile_to(faction) {
        return;
    }
    let Some(base) = ctx.state.base_mut(faction) else {
        return;
    };
    if !base.active {
        return;
    }
    base.hp = (base.hp - amount).max(0.0);
    if base.hp > 0.0 {
        return;
    }
    base.active = false;

    tracing::info!(faction = faction.name(), by = attacker.name(), "base destroyed");
    ctx.state.alert.raise(
        &format!("{} BASE DESTROYED", faction.name()),
        &format!("Destroyed by {}", attacker.name()),
        faction.color(),
        ctx.now,
    );
    ctx.events.push(SimEvent::BaseDestroyed { faction });
}

/// Faction whose 3×3 base block contains `tile`.
pub fn base_at_tile(state: &MatchState, tile: (i32, i32)) -> Option<Faction> {
    state
        .bases
        .iter()
        .find(|b| {
            let (bx, by) = b.position.tile();
            (tile.0 - bx).abs() <= 1 && (tile.1 - by).abs() <= 1
        })
        .map(|b| b.faction)
}

/// Area damage with linear falloff `damage × (1 − d/r)` to every hostile
/// tank and base in radius, chipping walls along the way.
#[allow(clippy::too_many_arguments)]
pub fn splash(
    world: &mut World,
    ctx: &mut CombatCtx,
    center: Position,
    radius: f64,
    damage: f64,
    attacker: &Attacker,
    exclude: Option<Entity>,
    exclude_base: Option<Faction>,
    burn: bool,
) {
    if is_disarmed(ctx.state, attacker) {
        return;
    }
    let targets: Vec<(Entity, f64)> = world
        .query::<(&TankBody, &Health, &Position)>()
        .iter()
        .filter(|(e, (body, health, _))| {
            Some(*e) != exclude && !health.dead && attacker.faction.is_hostile_to(body.faction)
        })
        .map(|(e, (_, _, pos))| (e, pos.distance_to(&center)))
        .filter(|(_, d)| *d <= radius)
        .collect();

    for (target, d) in targets {
        let amount = damage * (1.0 - d / radius);
        if apply_damage(world, target, amount, attacker, ctx.now, ctx.kills) && burn {
            ignite(world, target, attacker);
        }
    }

    let bases: Vec<(Faction, f64)> = ctx
        .state
        .bases
        .iter()
        .filter(|b| b.active && Some(b.faction) != exclude_base)
        .map(|b| (b.faction, (b.position.distance_to(&center) - BASE_RADIUS).max(0.0)))
        .filter(|(_, d)| *d <= radius)
        .collect();
    for (faction, d) in bases {
        damage_base(ctx, faction, damage * (1.0 - d / radius), attacker.faction);
    }

    for tile in ctx.map.damage_walls_in_radius(&center, radius) {
        ctx.events.push(SimEvent::WallDestroyed { tile });
    }
    ctx.events.push(SimEvent::Explosion {
        position: center,
        radius,
    });
    effects::explosion(world, center, radius);
}

/// Nearest living hostile tank whose body overlaps a circle.
fn first_overlap(world: &World, center: &Position, radius: f64, faction: Faction) -> Option<Entity> {
    world
        .query::<(&TankBody, &Health, &Position)>()
        .iter()
        .filter(|(_, (body, health, _))| !health.dead && faction.is_hostile_to(body.faction))
        .map(|(e, (body, _, pos))| (e, pos.distance_to(center), body.radius))
        .filter(|(_, d, r)| *d < r + radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _, _)| e)
}

/// Run weapon fire and projectile resolution for one tick.
pub fn run(world: &mut World, ctx: &mut CombatCtx, despawn_buffer: &mut Vec<Entity>) {
    fire(world, ctx);
    resolve_projectiles(world, ctx, despawn_buffer);
}

/// Turn fire intent into shots: cooldowns, bursts, heat, ammo.
fn fire(world: &mut World, ctx: &mut CombatCtx) {
    let hub_owner = ctx.state.hub.owner;
    let mut shots: Vec<Shot> = Vec::new();

    for (entity, (pos, body, health, intent, weaponry, buffs)) in
        world.query_mut::<(&Position, &TankBody, &Health, &Intent, &mut Weaponry, &Buffs)>()
    {
        weaponry.cooldown = (weaponry.cooldown - DT).max(0.0);
        weaponry.mine_cooldown = (weaponry.mine_cooldown - DT).max(0.0);
        weaponry.missile_cooldown = (weaponry.missile_cooldown - DT).max(0.0);
        if weaponry.missile_ammo < MISSILE_MAX_AMMO {
            weaponry.missile_reload -= DT;
            if weaponry.missile_reload <= EPSILON {
                weaponry.missile_ammo += 1;
                weaponry.missile_reload = if weaponry.missile_ammo < MISSILE_MAX_AMMO {
                    MISSILE_RELOAD_TIME
                } else {
                    0.0
                };
            }
        }

        if health.dead {
            weaponry.burst_remaining = 0;
            weaponry.trigger_held = false;
            continue;
        }
        let pressed = intent.fire && !weaponry.trigger_held;
        weaponry.trigger_held = intent.fire;

        let attacker = Attacker {
            id: Some(to_id(entity)),
            faction: body.faction,
            name: body.name.clone(),
            is_player: body.is_player,
        };
        let stats = weapon_stats(weaponry.weapon);
        let damage_mult = if buffs.rage > 0.0 { RAGE_DAMAGE_MULT } else { 1.0 };
        let burn = buffs.perm_fire || buffs.buff_red > 0.0;

        if intent.fire {
            if weaponry.overheated {
                // Pulling a locked machine gun costs heat once per press.
                if pressed && weaponry.weapon == WeaponType::MachineGun {
                    weaponry.heat = (weaponry.heat + MG_LOCK_PENALTY).min(HEAT_MAX);
                }
            } else if weaponry.cooldown <= 0.0 && weaponry.burst_remaining == 0 {
                let mut delay = stats.fire_delay;
                if hub_owner == body.faction {
                    delay *= HUB_BUFF_RELOAD_MOD;
                }
                weaponry.cooldown = delay;
                weaponry.burst_remaining = stats.burst;
                weaponry.burst_timer = 0.0;
            }
        }

        if weaponry.burst_remaining > 0 {
            weaponry.burst_timer -= DT;
            if weaponry.overheated {
                weaponry.burst_remaining = 0;
            } else if weaponry.burst_timer <= EPSILON {
                shots.push(Shot {
                    shooter: entity,
                    origin: pos.offset(body.turret_heading, body.radius + PROJECTILE_RADIUS + 2.0),
                    angle: body.turret_heading,
                    weapon: weaponry.weapon,
                    damage: stats.damage * damage_mult,
                    attacker: attacker.clone(),
                    burn,
                });
                weaponry.burst_remaining -= 1;
                weaponry.burst_timer += BURST_INTERVAL;
                weaponry.heat = (weaponry.heat + stats.heat).min(HEAT_MAX);
                if weaponry.heat >= HEAT_MAX {
                    weaponry.overheated = true;
                    weaponry.burst_remaining = 0;
                }
            }
        }

        if intent.fire_missile && weaponry.missile_ammo > 0 && weaponry.missile_cooldown <= 0.0 {
            weaponry.missile_ammo -= 1;
            if weaponry.missile_reload <= 0.0 {
                weaponry.missile_reload = MISSILE_RELOAD_TIME;
            }
            weaponry.missile_cooldown = weapon_stats(WeaponType::Missile).fire_delay;
            shots.push(Shot {
                shooter: entity,
                origin: pos.offset(body.turret_heading, body.radius + PROJECTILE_RADIUS + 2.0),
                angle: body.turret_heading,
                weapon: WeaponType::Missile,
                damage: MISSILE_DAMAGE * damage_mult,
                attacker: attacker.clone(),
                burn,
            });
        }

        if intent.drop_mine && weaponry.mine_cooldown <= 0.0 {
            let mine = weapon_stats(WeaponType::Mine);
            weaponry.mine_cooldown = mine.fire_delay;
            shots.push(Shot {
                shooter: entity,
                origin: pos.offset(body.heading + PI, body.radius + PROJECTILE_RADIUS * 2.0),
                angle: body.heading,
                weapon: WeaponType::Mine,
                damage: mine.damage * damage_mult,
                attacker,
                burn,
            });
        }
    }

    for shot in shots {
        launch(world, ctx, shot);
    }
}

fn launch(world: &mut World, ctx: &mut CombatCtx, shot: Shot) {
    let stats = weapon_stats(shot.weapon);
    if stats.instant {
        resolve_laser(world, ctx, &shot);
        return;
    }

    let (sin, cos) = shot.angle.sin_cos();
    let (velocity, life, radius, homing) = match shot.weapon {
        WeaponType::Mine => (Velocity::default(), MINE_LIFE, PROJECTILE_RADIUS * 2.0, false),
        WeaponType::Missile => (
            Velocity::new(cos * MISSILE_SPEED, sin * MISSILE_SPEED),
            MISSILE_LIFE,
            PROJECTILE_RADIUS,
            true,
        ),
        _ => (
            Velocity::new(cos * stats.speed, sin * stats.speed),
            stats.range / stats.speed,
            PROJECTILE_RADIUS,
            false,
        ),
    };
    if shot.weapon != WeaponType::Mine {
        effects::spawn_burst(world, ParticleKind::Muzzle, shot.origin, 1, 0.0, 0.1);
    }
    world.spawn((
        shot.origin,
        velocity,
        Projectile {
            attacker: shot.attacker,
            from_base: false,
            weapon: shot.weapon,
            damage: shot.damage,
            radius,
            life,
            splash_radius: stats.splash_radius,
            burn: shot.burn,
            homing,
        },
    ));
}

/// Instant ray: stops at the first blocking tile, hits the first hostile
/// tank along the way, or the base block it ends on.
fn resolve_laser(world: &mut World, ctx: &mut CombatCtx, shot: &Shot) {
    let range = weapon_stats(WeaponType::Laser).range;
    let ray = cast_ray(ctx.map, &shot.origin, shot.angle, range);
    let length = shot.origin.distance_to(&ray.end);
    let dir = DVec2::new(shot.angle.cos(), shot.angle.sin());

    let mut best: Option<(Entity, f64)> = None;
    for (e, (body, health, pos)) in world.query::<(&TankBody, &Health, &Position)>().iter() {
        if e == shot.shooter || health.dead || !shot.attacker.faction.is_hostile_to(body.faction) {
            continue;
        }
        let rel = pos.as_vec() - shot.origin.as_vec();
        let along = rel.dot(dir);
        if along < 0.0 || along > length + body.radius {
            continue;
        }
        if (rel - dir * along).length() > body.radius {
            continue;
        }
        if best.map_or(true, |(_, d)| along < d) {
            best = Some((e, along));
        }
    }

    match best {
        Some((target, along)) => {
            let hit = Position::from_vec(shot.origin.as_vec() + dir * along);
            if apply_damage(world, target, shot.damage, &shot.attacker, ctx.now, ctx.kills) && shot.burn {
                ignite(world, target, &shot.attacker);
            }
            effects::spawn_burst(world, ParticleKind::Electric, hit, 3, 60.0, 0.2);
        }
        None => {
            if let Some(tile) = ray.tile {
                if ctx.map.get(tile.0, tile.1) == TileType::Base {
                    if let Some(faction) = base_at_tile(ctx.state, tile) {
                        damage_base(ctx, faction, shot.damage, shot.attacker.faction);
                    }
                }
            }
            effects::spawn_burst(world, ParticleKind::Electric, ray.end, 3, 60.0, 0.2);
        }
    }
}

/// Resolve projectile impacts, mine triggers and expiry.
fn resolve_projectiles(world: &mut World, ctx: &mut CombatCtx, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let projectiles: Vec<(Entity, Position, Projectile)> = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(e, (pos, p))| (e, *pos, p.clone()))
        .collect();

    for (entity, pos, proj) in projectiles {
        if proj.life <= 0.0 {
            despawn_buffer.push(entity);
            continue;
        }

        // Mines lie inert until the owner is back; shells in flight fizzle.
        if is_disarmed(ctx.state, &proj.attacker) {
            if proj.weapon != WeaponType::Mine {
                despawn_buffer.push(entity);
            }
            continue;
        }

        if proj.weapon == WeaponType::Mine {
            let trigger = world
                .query::<(&TankBody, &Health, &Position)>()
                .iter()
                .filter(|(_, (body, health, _))| !health.dead && proj.attacker.faction.is_hostile_to(body.faction))
                .map(|(e, (_, _, p))| (e, p.distance_to(&pos)))
                .filter(|(_, d)| *d <= MINE_TRIGGER_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(e, _)| e);
            if let Some(target) = trigger {
                if apply_damage(world, target, proj.damage, &proj.attacker, ctx.now, ctx.kills) && proj.burn {
                    ignite(world, target, &proj.attacker);
                }
                ctx.events.push(SimEvent::Explosion {
                    position: pos,
                    radius: MINE_TRIGGER_RADIUS,
                });
                effects::explosion(world, pos, MINE_TRIGGER_RADIUS);
                despawn_buffer.push(entity);
            }
            continue;
        }

        let (tx, ty) = pos.tile();
        let tile = ctx.map.get(tx, ty);
        if tile.is_solid() {
            let mut base_hit = None;
            match tile {
                TileType::Base => {
                    if let Some(faction) = base_at_tile(ctx.state, (tx, ty)) {
                        damage_base(ctx, faction, proj.damage, proj.attacker.faction);
                        base_hit = Some(faction);
                    }
                }
                TileType::Wall if proj.splash_radius <= 0.0 && !proj.from_base => {
                    if ctx.map.damage_wall(tx, ty) {
                        ctx.events.push(SimEvent::WallDestroyed { tile: (tx, ty) });
                    }
                }
                _ => {}
            }
            if proj.splash_radius > 0.0 {
                splash(
                    world,
                    ctx,
                    pos,
                    proj.splash_radius,
                    proj.damage,
                    &proj.attacker,
                    None,
                    base_hit,
                    proj.burn,
                );
            } else {
                effects::spawn_burst(world, ParticleKind::Spark, pos, 3, 80.0, 0.2);
            }
            despawn_buffer.push(entity);
            continue;
        }

        if let Some(target) = first_overlap(world, &pos, proj.radius, proj.attacker.faction) {
            if apply_damage(world, target, proj.damage, &proj.attacker, ctx.now, ctx.kills) && proj.burn {
                ignite(world, target, &proj.attacker);
            }
            if proj.splash_radius > 0.0 {
                splash(
                    world,
                    ctx,
                    pos,
                    proj.splash_radius,
                    proj.damage,
                    &proj.attacker,
                    Some(target),
                    None,
                    proj.burn,
                );
            } else {
                effects::spawn_burst(world, ParticleKind::Spark, pos, 3, 80.0, 0.2);
            }
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
