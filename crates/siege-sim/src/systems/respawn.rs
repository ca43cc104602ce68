//! Player respawn sequencer.
//!
//! DEATH_CAM → FADE_OUT → OMEN → MATERIALIZE → ACTIVATION → READY. One
//! phase advance per tick at most; time past a phase boundary carries into
//! the next phase. The tank is restored at its base on MATERIALIZE and
//! rejoins combat on ACTIVATION. READY holds until the respawn input.

use hecs::{Entity, World};

use siege_core::components::{Buffs, Health, StatusEffects, TankBody, Weaponry};
use siege_core::constants::*;
use siege_core::enums::RespawnPhase;
use siege_core::events::SimEvent;
use siege_core::state::RespawnState;
use siege_core::types::{Position, Velocity};

use crate::match_state::MatchState;
use crate::systems::EPSILON;
use crate::world_setup::spawn_point;

/// Time spent in a phase before it advances. `None` for phases that hold.
pub fn duration(phase: RespawnPhase) -> Option<f64> {
    match phase {
        RespawnPhase::Idle | RespawnPhase::Ready => None,
        RespawnPhase::DeathCam => Some(RESPAWN_DEATH_CAM),
        RespawnPhase::FadeOut => Some(RESPAWN_FADE_OUT),
        RespawnPhase::Omen => Some(RESPAWN_OMEN),
        RespawnPhase::Materialize => Some(RESPAWN_MATERIALIZE),
        RespawnPhase::Activation => Some(RESPAWN_ACTIVATION),
    }
}

fn next(phase: RespawnPhase) -> RespawnPhase {
    match phase {
        RespawnPhase::Idle => RespawnPhase::Idle,
        RespawnPhase::DeathCam => RespawnPhase::FadeOut,
        RespawnPhase::FadeOut => RespawnPhase::Omen,
        RespawnPhase::Omen => RespawnPhase::Materialize,
        RespawnPhase::Materialize => RespawnPhase::Activation,
        RespawnPhase::Activation | RespawnPhase::Ready => RespawnPhase::Ready,
    }
}

/// Advance the sequence by `dt`. Returns the phase entered, if any.
pub fn advance(state: &mut RespawnState, dt: f64) -> Option<RespawnPhase> {
    if state.phase == RespawnPhase::Idle {
        return None;
    }
    state.elapsed += dt;
    let limit = duration(state.phase)?;
    if state.elapsed + EPSILON < limit {
        return None;
    }
    state.elapsed = (state.elapsed - limit).max(0.0);
    state.phase = next(state.phase);
    Some(state.phase)
}

/// Respawn input: leaves READY once its minimum dwell has passed.
pub fn acknowledge(state: &mut RespawnState) -> bool {
    if state.phase != RespawnPhase::Ready || state.elapsed + EPSILON < RESPAWN_READY {
        return false;
    }
    *state = RespawnState::default();
    true
}

/// Run the sequencer for one tick.
pub fn run(world: &mut World, state: &mut MatchState, events: &mut Vec<SimEvent>) {
    let Some(entered) = advance(&mut state.respawn, DT) else {
        return;
    };
    tracing::debug!(phase = ?entered, "respawn phase");
    let Some(player) = state.player else {
        return;
    };
    match entered {
        RespawnPhase::Materialize => {
            let at = spawn_point(PLAYER_FACTION, 0);
            restore(world, player, at);
        }
        RespawnPhase::Activation => {
            if let Ok(mut health) = world.get::<&mut Health>(player) {
                health.dead = false;
            }
            tracing::info!("player respawned");
            events.push(SimEvent::PlayerRespawned);
        }
        _ => {}
    }
}

/// Put the dead player back together at `at`. Permanent upgrades survive;
/// everything timed is cleared.
fn restore(world: &mut World, player: Entity, at: Position) {
    let Ok((pos, vel, body, health, weaponry, buffs, status)) = world.query_one_mut::<(
        &mut Position,
        &mut Velocity,
        &mut TankBody,
        &mut Health,
        &mut Weaponry,
        &mut Buffs,
        &mut StatusEffects,
    )>(player) else {
        return;
    };
    *pos = at;
    *vel = Velocity::default();
    body.heading = at.angle_to(&Position::from_tile(HUB_TILE.0, HUB_TILE.1));
    body.turret_heading = body.heading;
    health.hp = health.max_hp;
    health.player_hit_at = None;
    weaponry.heat = 0.0;
    weaponry.overheated = false;
    weaponry.burst_remaining = 0;
    weaponry.missile_ammo = MISSILE_MAX_AMMO;
    weaponry.missile_reload = 0.0;
    buffs.rage = 0.0;
    buffs.shield = 0.0;
    buffs.turbo = 0.0;
    *status = StatusEffects::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead() -> RespawnState {
        RespawnState {
            phase: RespawnPhase::DeathCam,
            elapsed: 0.0,
        }
    }

    #[test]
    fn test_chain_never_skips_a_phase() {
        let mut state = dead();
        let mut seen = vec![state.phase];
        // A huge step still advances one phase per call.
        while state.phase != RespawnPhase::Ready {
            if let Some(p) = advance(&mut state, 10.0) {
                seen.push(p);
            }
        }
        assert_eq!(
            seen,
            vec![
                RespawnPhase::DeathCam,
                RespawnPhase::FadeOut,
                RespawnPhase::Omen,
                RespawnPhase::Materialize,
                RespawnPhase::Activation,
                RespawnPhase::Ready,
            ]
        );
    }

    #[test]
    fn test_ready_after_summed_durations() {
        let total = RESPAWN_DEATH_CAM + RESPAWN_FADE_OUT + RESPAWN_OMEN + RESPAWN_MATERIALIZE + RESPAWN_ACTIVATION;
        let mut state = dead();
        let mut ticks = 0u32;
        while state.phase != RespawnPhase::Ready {
            advance(&mut state, DT);
            ticks += 1;
        }
        let expected = (total / DT).round() as i64;
        assert!((ticks as i64 - expected).abs() <= 1, "{ticks} ticks vs {expected}");
    }

    #[test]
    fn test_overflow_carries_into_next_phase() {
        let mut state = dead();
        advance(&mut state, RESPAWN_DEATH_CAM + 0.1);
        assert_eq!(state.phase, RespawnPhase::FadeOut);
        assert!((state.elapsed - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_ready_holds_until_acknowledged() {
        let mut state = RespawnState {
            phase: RespawnPhase::Ready,
            elapsed: 0.0,
        };
        assert!(!acknowledge(&mut state), "minimum dwell not reached");
        for _ in 0..600 {
            assert_eq!(advance(&mut state, DT), None);
        }
        assert_eq!(state.phase, RespawnPhase::Ready);
        assert!(acknowledge(&mut state));
        assert_eq!(state.phase, RespawnPhase::Idle);
        assert!(!acknowledge(&mut state));
    }

    #[test]
    fn test_idle_never_advances() {
        let mut state = RespawnState::default();
        assert_eq!(advance(&mut state, 100.0), None);
        assert_eq!(state.elapsed, 0.0);
    }
}
