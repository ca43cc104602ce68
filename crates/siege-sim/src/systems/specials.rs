//! Class specials: FREEZER aura, FLASHER pulse, SMOKE cloud, BOMBER bomb,
//! plus the damage pulses of live smoke hazards.
//!
//! Specials share the `SpecialAbility` timer and are suppressed while the
//! caster is dead or silenced.

use hecs::{Entity, World};

use siege_core::components::*;
use siege_core::config::class_stats;
use siege_core::constants::*;
use siege_core::enums::{DecalKind, ParticleKind, StatusKind, TankClass};
use siege_core::types::{Position, Velocity};

use crate::ids::to_id;
use crate::systems::combat::{apply_damage, is_disarmed, splash, CombatCtx};
use crate::systems::effects;
use crate::systems::status::apply_status;
use crate::systems::EPSILON;

#[derive(Debug, Clone)]
struct Caster {
    entity: Entity,
    position: Position,
    class: TankClass,
    attacker: Attacker,
    ready: bool,
}

/// Run class specials and hazard pulses for one tick.
pub fn run(world: &mut World, ctx: &mut CombatCtx) {
    let mut casters: Vec<Caster> = Vec::new();
    for (entity, (pos, body, health, status, special)) in
        world.query_mut::<(&Position, &TankBody, &Health, &StatusEffects, &mut SpecialAbility)>()
    {
        special.cooldown = (special.cooldown - DT).max(0.0);
        if health.dead || status.silence > 0.0 {
            continue;
        }
        if !matches!(
            body.class,
            TankClass::Freezer | TankClass::Flasher | TankClass::Smoke | TankClass::Bomber
        ) {
            continue;
        }
        casters.push(Caster {
            entity,
            position: *pos,
            class: body.class,
            attacker: Attacker {
                id: Some(to_id(entity)),
                faction: body.faction,
                name: body.name.clone(),
                is_player: body.is_player,
            },
            ready: special.cooldown <= 0.0,
        });
    }

    for caster in casters {
        let faction = caster.attacker.faction;
        let cooldown = match caster.class {
            TankClass::Freezer => {
                afflict(world, &caster, AURA_RADIUS, StatusKind::Freeze, FREEZE_AURA_DURATION);
                if caster.ready {
                    effects::spawn_decal(world, DecalKind::Frost, caster.position, AURA_RADIUS / TILE_SIZE);
                    effects::spawn_burst(world, ParticleKind::Snowflake, caster.position, 6, AURA_RADIUS, 1.0);
                    Some(FROST_DECAL_INTERVAL)
                } else {
                    None
                }
            }
            TankClass::Flasher if caster.ready && hostile_within(world, &caster, AURA_RADIUS) => {
                afflict(world, &caster, AURA_RADIUS, StatusKind::Blind, BLIND_DURATION);
                effects::spawn_burst(world, ParticleKind::Shockwave, caster.position, 12, AURA_RADIUS * 2.0, 0.4);
                Some(FLASHER_CD)
            }
            TankClass::Smoke if caster.ready && hostile_within(world, &caster, AURA_RADIUS) => {
                release_smoke(world, &caster);
                Some(SMOKE_CD)
            }
            TankClass::Bomber if caster.ready && hostile_within(world, &caster, BOMBER_TRIGGER_RANGE) => {
                tracing::trace!(bomber = %caster.attacker.name, faction = faction.name(), "bomb detonated");
                splash(
                    world,
                    ctx,
                    caster.position,
                    BOMBER_SPLASH_RADIUS,
                    BOMBER_DAMAGE,
                    &caster.attacker,
                    Some(caster.entity),
                    None,
                    false,
                );
                Some(BOMBER_CD)
            }
            _ => None,
        };
        if let Some(cd) = cooldown {
            if let Ok(mut special) = world.get::<&mut SpecialAbility>(caster.entity) {
                special.cooldown = cd;
            }
        }
    }

    pulse_hazards(world, ctx);
}

/// Whether any living hostile tank is within `radius` of the caster.
fn hostile_within(world: &World, caster: &Caster, radius: f64) -> bool {
    world
        .query::<(&Position, &TankBody, &Health)>()
        .iter()
        .any(|(e, (pos, body, health))| {
            e != caster.entity
                && !health.dead
                && caster.attacker.faction.is_hostile_to(body.faction)
                && pos.distance_to(&caster.position) <= radius
        })
}

/// Apply a status to every hostile in radius.
fn afflict(world: &mut World, caster: &Caster, radius: f64, kind: StatusKind, duration: f64) {
    for (e, (pos, body, health, status)) in
        world.query_mut::<(&Position, &TankBody, &Health, &mut StatusEffects)>()
    {
        if e == caster.entity || health.dead || !caster.attacker.faction.is_hostile_to(body.faction) {
            continue;
        }
        if pos.distance_to(&caster.position) > radius {
            continue;
        }
        apply_status(status, kind, duration, class_stats(body.class).cc_immune);
    }
}

/// Drop a damaging smoke cloud and go stealthed.
fn release_smoke(world: &mut World, caster: &Caster) {
    world.spawn((
        caster.position,
        Velocity::default(),
        Particle {
            kind: ParticleKind::Smoke,
            life: SMOKE_CLOUD_LIFE,
            max_life: SMOKE_CLOUD_LIFE,
            size: SMOKE_CLOUD_RADIUS,
            hazard: Some(Hazard {
                attacker: caster.attacker.clone(),
                damage: SMOKE_DAMAGE,
                radius: SMOKE_CLOUD_RADIUS,
                pulse: SMOKE_PULSE,
                pulse_timer: SMOKE_PULSE,
            }),
        },
    ));
    if let Ok(mut status) = world.get::<&mut StatusEffects>(caster.entity) {
        status.stealth = status.stealth.max(STEALTH_DURATION);
    }
}

/// Each hazard damages hostiles inside it once per pulse.
fn pulse_hazards(world: &mut World, ctx: &mut CombatCtx) {
    let mut pulses: Vec<(Position, Hazard)> = Vec::new();
    for (_e, (pos, particle)) in world.query_mut::<(&Position, &mut Particle)>() {
        let Some(hazard) = particle.hazard.as_mut() else {
            continue;
        };
        hazard.pulse_timer -= DT;
        if hazard.pulse_timer <= EPSILON {
            hazard.pulse_timer += hazard.pulse;
            pulses.push((*pos, hazard.clone()));
        }
    }

    for (center, hazard) in pulses {
        if is_disarmed(ctx.state, &hazard.attacker) {
            continue;
        }
        let victims: Vec<Entity> = world
            .query::<(&Position, &TankBody, &Health)>()
            .iter()
            .filter(|(_, (pos, body, health))| {
                !health.dead
                    && hazard.attacker.faction.is_hostile_to(body.faction)
                    && pos.distance_to(&center) <= hazard.radius
            })
            .map(|(e, _)| e)
            .collect();
        for victim in victims {
            apply_damage(world, victim, hazard.damage, &hazard.attacker, ctx.now, ctx.kills);
        }
    }
}
