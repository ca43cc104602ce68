//! Tank behavior finite state machine.
//!
//! Pure functions that compute state transitions and control intent for
//! one AI tank from its situation and memory. No ECS dependency and no
//! randomness: random draws arrive pre-rolled in [`AiRolls`].

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use siege_core::components::{AiMemory, Objective};
use siege_core::constants::*;
use siege_core::enums::{AiState, TankClass};
use siege_core::types::{angle_diff, EntityId, Position};

use crate::profiles::{get_profile, BehaviorProfile};

/// A hostile the tank can currently see.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub id: EntityId,
    pub position: Position,
    pub distance: f64,
}

/// Input to the AI FSM for a single tank.
#[derive(Debug, Clone)]
pub struct AiContext {
    pub class: TankClass,
    pub position: Position,
    pub heading: f64,
    pub turret_heading: f64,
    pub hp_fraction: f64,
    /// Range of the equipped primary weapon.
    pub weapon_range: f64,
    /// Primary weapon ready: off cooldown and not overheated.
    pub weapon_ready: bool,
    pub missiles_ready: bool,
    /// Best visible hostile (aggro target preferred), already filtered
    /// by detection range, line of sight and stealth.
    pub target: Option<Contact>,
    /// Nearest health pack within the heal search radius.
    pub heal_source: Option<Position>,
    /// Objective anchor for defenders.
    pub objective: Option<Objective>,
    /// Fallback retreat point (own base, or anchor).
    pub home: Position,
    /// Whether last tick's intent asked to move.
    pub was_moving: bool,
    pub dt: f64,
}

/// Pre-rolled random draws for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct AiRolls {
    /// Next strafe hold time, in [AI_STRAFE_MIN, AI_STRAFE_MAX].
    pub strafe_duration: f64,
}

/// Output from the AI FSM.
#[derive(Debug, Clone)]
pub struct AiDecision {
    pub memory: AiMemory,
    /// Desired movement direction (unit length or zero).
    pub move_dir: DVec2,
    /// Desired turret angle.
    pub aim: f64,
    pub fire: bool,
    pub fire_missile: bool,
    pub state_changed: bool,
}

/// Evaluate the FSM for one tank.
pub fn evaluate(ctx: &AiContext, memory: &AiMemory, rolls: AiRolls) -> AiDecision {
    let profile = get_profile(ctx.class);
    let mut mem = memory.clone();
    let prev_state = mem.state;

    tick_timers(ctx, &mut mem, rolls);
    remember_target(ctx, &mut mem);

    let next = next_state(ctx, &profile, &mut mem);
    if next != mem.state {
        mem.state = next;
        mem.state_timer = 0.0;
        if next == AiState::Exploring {
            mem.exploration_timer = 0.0;
        }
    }

    let (move_dir, aim) = match mem.state {
        AiState::Aggressive => engage(ctx, &profile, &mem),
        AiState::Tactical => hunt(ctx, &mut mem),
        AiState::Survival => retreat(ctx, &mem),
        AiState::Support => defend(ctx, &profile, &mem),
        AiState::Stuck => unstick(ctx, &mem),
        AiState::Exploring => explore(ctx, &mut mem),
    };

    // Any hurt roamer grabs a nearby pack regardless of state.
    let move_dir = match ctx.heal_source {
        Some(pack) if profile.retreats && ctx.hp_fraction < AI_SURVIVAL_EXIT && mem.state != AiState::Stuck => {
            direction(&ctx.position, &pack)
        }
        _ => move_dir,
    };

    let (fire, fire_missile) = match ctx.target {
        Some(t) if mem.state != AiState::Stuck => {
            let aligned = angle_diff(ctx.turret_heading, aim).abs() < AI_AIM_TOLERANCE;
            let in_leash = ctx
                .objective
                .as_ref()
                .map_or(true, |o| o.anchor.distance_to(&t.position) <= o.leash_radius + ctx.weapon_range);
            (
                ctx.weapon_ready && aligned && in_leash && t.distance <= ctx.weapon_range,
                profile.uses_missiles && ctx.missiles_ready && in_leash && t.distance <= MISSILE_SEEK_RANGE,
            )
        }
        _ => (false, false),
    };

    AiDecision {
        state_changed: mem.state != prev_state,
        memory: mem,
        move_dir,
        aim,
        fire,
        fire_missile,
    }
}

fn tick_timers(ctx: &AiContext, mem: &mut AiMemory, rolls: AiRolls) {
    mem.state_timer += ctx.dt;
    mem.exploration_timer += ctx.dt;

    mem.strafe_timer -= ctx.dt;
    if mem.strafe_timer <= 0.0 {
        mem.strafe_dir = if mem.strafe_dir > 0.0 { -1.0 } else { 1.0 };
        mem.strafe_timer = rolls.strafe_duration;
    }

    if mem.last_known_target.is_some() {
        mem.memory_timer -= ctx.dt;
        if mem.memory_timer <= 0.0 {
            mem.memory_timer = 0.0;
            mem.last_known_target = None;
            mem.target = None;
        }
    }
}

fn remember_target(ctx: &AiContext, mem: &mut AiMemory) {
    if let Some(t) = ctx.target {
        mem.target = Some(t.id);
        mem.last_known_target = Some(t.position);
        mem.memory_timer = AI_MEMORY_DECAY;
    }
}

fn next_state(ctx: &AiContext, profile: &BehaviorProfile, mem: &mut AiMemory) -> AiState {
    if profile.defends_objective {
        return AiState::Support;
    }

    // Stuck detection: sample displacement once per check interval.
    if profile.unsticks {
        if mem.state == AiState::Stuck {
            let moved = ctx.position.distance_to(&mem.stuck_pos);
            if moved < AI_STUCK_EPSILON && mem.state_timer < AI_STUCK_RECOVERY {
                return AiState::Stuck;
            }
            mem.stuck_pos = ctx.position;
            mem.stuck_timer = 0.0;
            if moved < AI_STUCK_EPSILON {
                // Recovery window ran out without progress; try the other side next time.
                mem.strafe_dir = -mem.strafe_dir;
            }
        } else {
            mem.stuck_timer += ctx.dt;
            if mem.stuck_timer >= AI_STUCK_CHECK_INTERVAL {
                let moved = ctx.position.distance_to(&mem.stuck_pos);
                mem.stuck_pos = ctx.position;
                mem.stuck_timer = 0.0;
                if ctx.was_moving && moved < AI_STUCK_EPSILON {
                    return AiState::Stuck;
                }
            }
        }
    }

    if profile.retreats {
        let hurt = ctx.hp_fraction < AI_LOW_HEALTH;
        let recovered = ctx.hp_fraction >= AI_SURVIVAL_EXIT;
        if ctx.heal_source.is_none() && (hurt || (mem.state == AiState::Survival && !recovered)) {
            return AiState::Survival;
        }
    }

    if ctx.target.is_some() {
        AiState::Aggressive
    } else if mem.last_known_target.is_some() {
        AiState::Tactical
    } else {
        AiState::Exploring
    }
}

fn direction(from: &Position, to: &Position) -> DVec2 {
    (to.as_vec() - from.as_vec()).normalize_or_zero()
}

/// Close to preferred range, then strafe around the target.
fn engage(ctx: &AiContext, profile: &BehaviorProfile, mem: &AiMemory) -> (DVec2, f64) {
    let Some(t) = ctx.target else {
        return (DVec2::ZERO, ctx.turret_heading);
    };
    let aim = ctx.position.angle_to(&t.position);
    let to_target = direction(&ctx.position, &t.position);
    let lateral = DVec2::new(-to_target.y, to_target.x) * mem.strafe_dir;

    let move_dir = if t.distance > profile.preferred_range {
        to_target
    } else if t.distance < profile.preferred_range * 0.6 {
        (lateral - to_target).normalize_or_zero()
    } else {
        lateral
    };
    (move_dir, aim)
}

/// Head to the last known position; forget it on arrival.
fn hunt(ctx: &AiContext, mem: &mut AiMemory) -> (DVec2, f64) {
    let Some(last) = mem.last_known_target else {
        return (DVec2::ZERO, ctx.turret_heading);
    };
    if ctx.position.distance_to(&last) <= AI_ARRIVAL_RADIUS {
        mem.last_known_target = None;
        mem.target = None;
        mem.memory_timer = 0.0;
        return (DVec2::ZERO, ctx.turret_heading);
    }
    (direction(&ctx.position, &last), ctx.position.angle_to(&last))
}

/// Back away from the threat toward home, covering the retreat.
fn retreat(ctx: &AiContext, mem: &AiMemory) -> (DVec2, f64) {
    let threat = ctx.target.map(|t| t.position).or(mem.last_known_target);
    let homeward = direction(&ctx.position, &ctx.home);
    match threat {
        Some(threat) => {
            let away = direction(&threat, &ctx.position);
            let dir = (away + homeward).normalize_or_zero();
            let dir = if dir == DVec2::ZERO { away } else { dir };
            (dir, ctx.position.angle_to(&threat))
        }
        None => (homeward, homeward.y.atan2(homeward.x)),
    }
}

/// Hold the anchor, engaging anything that comes inside the leash.
fn defend(ctx: &AiContext, profile: &BehaviorProfile, mem: &AiMemory) -> (DVec2, f64) {
    let Some(obj) = &ctx.objective else {
        return engage(ctx, profile, mem);
    };
    let from_anchor = ctx.position.distance_to(&obj.anchor);
    let target_in_leash = ctx
        .target
        .filter(|t| obj.anchor.distance_to(&t.position) <= obj.leash_radius + ctx.weapon_range);

    match target_in_leash {
        Some(_) if from_anchor <= obj.leash_radius => {
            let (dir, aim) = engage(ctx, profile, mem);
            // Never chase past the leash.
            let next = ctx.position.as_vec() + dir * TILE_SIZE;
            let dir = if Position::from_vec(next).distance_to(&obj.anchor) > obj.leash_radius {
                direction(&ctx.position, &obj.anchor)
            } else {
                dir
            };
            (dir, aim)
        }
        Some(t) => (direction(&ctx.position, &obj.anchor), ctx.position.angle_to(&t.position)),
        None if from_anchor > AI_ARRIVAL_RADIUS => {
            let dir = direction(&ctx.position, &obj.anchor);
            (dir, dir.y.atan2(dir.x))
        }
        None => (DVec2::ZERO, ctx.turret_heading),
    }
}

/// Back off diagonally from the current heading.
fn unstick(ctx: &AiContext, mem: &AiMemory) -> (DVec2, f64) {
    let angle = ctx.heading + PI - mem.strafe_dir * FRAC_PI_2 * 0.5;
    (DVec2::new(angle.cos(), angle.sin()), ctx.turret_heading)
}

/// Rotate through patrol points.
fn explore(ctx: &AiContext, mem: &mut AiMemory) -> (DVec2, f64) {
    let idx = mem.patrol_index % AI_PATROL_TILES.len();
    let (tx, ty) = AI_PATROL_TILES[idx];
    let point = Position::from_tile(tx, ty);

    if ctx.position.distance_to(&point) <= AI_ARRIVAL_RADIUS
        || mem.exploration_timer >= AI_EXPLORATION_TIMEOUT
    {
        mem.patrol_index = (idx + 1) % AI_PATROL_TILES.len();
        mem.exploration_timer = 0.0;
    }

    let (tx, ty) = AI_PATROL_TILES[mem.patrol_index];
    let dir = direction(&ctx.position, &Position::from_tile(tx, ty));
    (dir, dir.y.atan2(dir.x))
}
