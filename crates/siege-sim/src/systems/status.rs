//! Status and buff tracker.
//!
//! Decrements every per-tank timer once per tick: skill cooldowns, buff
//! durations, status effects, heat. Burn damage is applied here and may
//! produce kills, which the caller resolves afterwards.

use hecs::{Entity, World};

use siege_core::components::{Attacker, Buffs, Health, Skills, StatusEffects, TankBody, Weaponry};
use siege_core::config::class_stats;
use siege_core::constants::*;
use siege_core::enums::StatusKind;

use crate::match_state::MatchState;
use crate::systems::combat::{apply_damage, KillRecord};
use crate::systems::weather::WeatherModifiers;

/// Apply a status effect with refresh-to-max stacking.
///
/// Crowd control is ignored by immune classes and while `cc_immunity` is
/// running. Returns whether the effect took hold.
pub fn apply_status(status: &mut StatusEffects, kind: StatusKind, duration: f64, cc_immune: bool) -> bool {
    if kind.is_crowd_control() && (cc_immune || status.cc_immunity > 0.0) {
        return false;
    }
    let timer = match kind {
        StatusKind::Burn => &mut status.burn,
        StatusKind::Freeze => &mut status.freeze,
        StatusKind::Silence => &mut status.silence,
        StatusKind::Blind => &mut status.blind,
    };
    *timer = timer.max(duration);
    true
}

/// Count a timer down to zero. Returns true on the tick it expires.
fn tick_down(timer: &mut f64, dt: f64) -> bool {
    if *timer <= 0.0 {
        *timer = 0.0;
        return false;
    }
    *timer = (*timer - dt).max(0.0);
    *timer == 0.0
}

/// Decrement the faction-wide guardian buffs.
pub fn tick_faction_buffs(state: &mut MatchState, dt: f64) {
    for buff in state.faction_buffs.iter_mut() {
        buff.red = (buff.red - dt).max(0.0);
        buff.blue = (buff.blue - dt).max(0.0);
    }
}

/// Run all per-tank timers for one tick.
pub fn run(
    world: &mut World,
    state: &mut MatchState,
    weather: &WeatherModifiers,
    kills: &mut Vec<KillRecord>,
    now: f64,
) {
    tick_faction_buffs(state, DT);
    let disarmed = state.player_disarmed();

    let mut burns: Vec<(Entity, Attacker)> = Vec::new();

    for (entity, (body, health, weaponry, skills, buffs, status)) in world.query_mut::<(
        &TankBody,
        &mut Health,
        &mut Weaponry,
        &mut Skills,
        &mut Buffs,
        &mut StatusEffects,
    )>() {
        for cd in [
            &mut skills.dash,
            &mut skills.emp,
            &mut skills.rage,
            &mut skills.turbo,
            &mut skills.shield,
        ] {
            *cd = (*cd - DT).max(0.0);
        }

        tick_down(&mut buffs.rage, DT);
        tick_down(&mut buffs.shield, DT);
        if tick_down(&mut buffs.turbo, DT) {
            skills.turbo = TURBO_CD;
        }
        let faction_buff = state.buff(body.faction);
        buffs.buff_red = faction_buff.red;
        buffs.buff_blue = faction_buff.blue;

        let mut cc_expired = false;
        cc_expired |= tick_down(&mut status.freeze, DT);
        cc_expired |= tick_down(&mut status.silence, DT);
        cc_expired |= tick_down(&mut status.blind, DT);
        tick_down(&mut status.cc_immunity, DT);
        if cc_expired && !class_stats(body.class).cc_immune {
            status.cc_immunity = CC_IMMUNITY_DURATION;
        }
        tick_down(&mut status.stealth, DT);
        if tick_down(&mut status.aggro, DT) {
            status.aggro_target = None;
        }

        if status.burn > 0.0 {
            if let Some(source) = status
                .burn_source
                .clone()
                .filter(|s| !health.dead && !(s.is_player && disarmed))
            {
                burns.push((entity, source));
            }
            if tick_down(&mut status.burn, DT) {
                status.burn_source = None;
            }
        }

        // Heat
        let mut rate = HEAT_DISSIPATION * weather.heat_dissipation_mult;
        if status.freeze > 0.0 {
            rate *= HEAT_DISSIPATION_FREEZE_MOD;
        }
        weaponry.heat = (weaponry.heat - rate * DT).clamp(0.0, HEAT_MAX);
        if weaponry.overheated && weaponry.heat < HEAT_MAX - OVERHEAT_HYSTERESIS {
            weaponry.overheated = false;
        }

        // Player regeneration
        if body.is_player && !health.dead && now - health.last_damaged_at >= PLAYER_REGEN_DELAY {
            health.hp = (health.hp + PLAYER_REGEN_AMOUNT * DT).min(health.max_hp);
        }
    }

    for (entity, source) in burns {
        apply_damage(world, entity, BURN_DPS * DT, &source, now, kills);
    }
}
