use proptest::prelude::*;
use siege_core::components::{AiMemory, Objective};
use siege_core::constants::*;
use siege_core::enums::{AiState, TankClass};
use siege_core::types::{EntityId, Position};

use crate::fsm::{evaluate, AiContext, AiRolls, Contact};
use crate::profiles::get_profile;

const ROLLS: AiRolls = AiRolls {
    strafe_duration: 2.0,
};

fn make_context(class: TankClass, hp_fraction: f64) -> AiContext {
    AiContext {
        class,
        position: Position::new(1000.0, 1000.0),
        heading: 0.0,
        turret_heading: 0.0,
        hp_fraction,
        weapon_range: 800.0,
        weapon_ready: true,
        missiles_ready: false,
        target: None,
        heal_source: None,
        objective: None,
        home: Position::new(200.0, 1000.0),
        was_moving: true,
        dt: DT,
    }
}

fn contact_at(x: f64, y: f64, from: &Position) -> Contact {
    let position = Position::new(x, y);
    Contact {
        id: EntityId(7),
        position,
        distance: from.distance_to(&position),
    }
}

#[test]
fn test_visible_target_goes_aggressive() {
    let mut ctx = make_context(TankClass::Normal, 1.0);
    ctx.target = Some(contact_at(1400.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert_eq!(d.memory.state, AiState::Aggressive);
    assert!(d.state_changed);
    assert_eq!(d.memory.target, Some(EntityId(7)));
    assert!(d.aim.abs() < 1e-9, "target due east, aim should be 0");
    assert!(d.fire, "aligned, ready and in range");
    assert!(d.move_dir.x > 0.9, "beyond preferred range, close in");
}

#[test]
fn test_misaligned_turret_holds_fire() {
    let mut ctx = make_context(TankClass::Normal, 1.0);
    ctx.turret_heading = std::f64::consts::PI;
    ctx.target = Some(contact_at(1400.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert!(!d.fire, "turret facing away should not fire");
}

#[test]
fn test_out_of_range_holds_fire() {
    let mut ctx = make_context(TankClass::Normal, 1.0);
    ctx.weapon_range = 300.0;
    ctx.target = Some(contact_at(1400.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert_eq!(d.memory.state, AiState::Aggressive);
    assert!(!d.fire);
}

#[test]
fn test_strafes_inside_preferred_range() {
    let mut ctx = make_context(TankClass::Normal, 1.0);
    ctx.target = Some(contact_at(1250.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert!(d.move_dir.x.abs() < 1e-9, "pure lateral movement");
    assert!((d.move_dir.y.abs() - 1.0).abs() < 1e-9);
}

#[test]
fn test_strafe_direction_flips_on_timer() {
    let ctx = make_context(TankClass::Normal, 1.0);
    let mem = AiMemory {
        strafe_dir: 1.0,
        strafe_timer: DT / 2.0,
        ..AiMemory::default()
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.strafe_dir, -1.0);
    assert_eq!(d.memory.strafe_timer, ROLLS.strafe_duration);
}

#[test]
fn test_lost_target_goes_tactical_then_forgets() {
    let ctx = make_context(TankClass::Normal, 1.0);
    let mem = AiMemory {
        state: AiState::Aggressive,
        target: Some(EntityId(7)),
        last_known_target: Some(Position::new(1500.0, 1000.0)),
        memory_timer: AI_MEMORY_DECAY,
        ..AiMemory::default()
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.state, AiState::Tactical);
    assert!(d.move_dir.x > 0.9, "head to last known position");
    assert!(!d.fire, "no target visible, no fire");

    // Memory decays after AI_MEMORY_DECAY seconds.
    let mem = AiMemory {
        memory_timer: DT / 2.0,
        ..d.memory
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.last_known_target, None);
    assert_eq!(d.memory.state, AiState::Exploring);
}

#[test]
fn test_tactical_arrival_forgets_position() {
    let ctx = make_context(TankClass::Normal, 1.0);
    let mem = AiMemory {
        state: AiState::Tactical,
        last_known_target: Some(Position::new(1030.0, 1000.0)),
        memory_timer: AI_MEMORY_DECAY,
        ..AiMemory::default()
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.last_known_target, None);
}

#[test]
fn test_low_health_without_heal_goes_survival() {
    let mut ctx = make_context(TankClass::Normal, AI_LOW_HEALTH - 0.05);
    ctx.target = Some(contact_at(1300.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert_eq!(d.memory.state, AiState::Survival);
    assert!(d.move_dir.x < 0.0, "retreat west, away from the threat and toward home");
}

#[test]
fn test_low_health_with_heal_source_seeks_pack() {
    let mut ctx = make_context(TankClass::Normal, AI_LOW_HEALTH - 0.05);
    ctx.heal_source = Some(Position::new(1000.0, 1300.0));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert_ne!(d.memory.state, AiState::Survival);
    assert!(d.move_dir.y > 0.99, "move straight to the pack");
}

#[test]
fn test_survival_has_exit_hysteresis() {
    let ctx = make_context(TankClass::Normal, (AI_LOW_HEALTH + AI_SURVIVAL_EXIT) / 2.0);
    let mem = AiMemory {
        state: AiState::Survival,
        ..AiMemory::default()
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.state, AiState::Survival, "between thresholds stays in SURVIVAL");

    let ctx = make_context(TankClass::Normal, AI_SURVIVAL_EXIT);
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.state, AiState::Exploring);
}

#[test]
fn test_no_displacement_goes_stuck_then_recovers() {
    let ctx = make_context(TankClass::Normal, 1.0);
    let mem = AiMemory {
        stuck_pos: ctx.position,
        stuck_timer: AI_STUCK_CHECK_INTERVAL,
        strafe_dir: 1.0,
        strafe_timer: 2.0,
        ..AiMemory::default()
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_eq!(d.memory.state, AiState::Stuck);
    assert!(d.move_dir.x < 0.0, "back away from the heading");

    let mut moved = ctx.clone();
    moved.position = Position::new(990.0, 1000.0);
    let d = evaluate(&moved, &d.memory, ROLLS);
    assert_ne!(d.memory.state, AiState::Stuck, "displacement exits STUCK");
}

#[test]
fn test_idle_tank_never_reports_stuck() {
    let mut ctx = make_context(TankClass::Normal, 1.0);
    ctx.was_moving = false;
    let mem = AiMemory {
        stuck_pos: ctx.position,
        stuck_timer: AI_STUCK_CHECK_INTERVAL,
        ..AiMemory::default()
    };
    let d = evaluate(&ctx, &mem, ROLLS);
    assert_ne!(d.memory.state, AiState::Stuck);
}

#[test]
fn test_exploring_rotates_patrol_points() {
    let mut ctx = make_context(TankClass::Normal, 1.0);
    let (tx, ty) = AI_PATROL_TILES[0];
    ctx.position = Position::from_tile(tx, ty);
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert_eq!(d.memory.state, AiState::Exploring);
    assert_eq!(d.memory.patrol_index, 1, "arrival advances the patrol index");

    let mem = AiMemory {
        exploration_timer: AI_EXPLORATION_TIMEOUT,
        patrol_index: 3,
        ..d.memory
    };
    let mut far = ctx.clone();
    far.position = Position::new(200.0, 200.0);
    let d = evaluate(&far, &mem, ROLLS);
    assert_eq!(d.memory.patrol_index, 0, "timeout wraps to the first point");
}

#[test]
fn test_bosses_ignore_survival_and_stuck() {
    for class in [TankClass::BossRed, TankClass::BossOverlord, TankClass::GuardianBlue] {
        let ctx = make_context(class, 0.05);
        let mem = AiMemory {
            stuck_pos: ctx.position,
            stuck_timer: AI_STUCK_CHECK_INTERVAL,
            ..AiMemory::default()
        };
        let d = evaluate(&ctx, &mem, ROLLS);
        assert_eq!(d.memory.state, AiState::Support, "{} should defend", class.name());
    }
}

#[test]
fn test_defender_returns_to_anchor() {
    let mut ctx = make_context(TankClass::GuardianRed, 1.0);
    ctx.objective = Some(Objective {
        anchor: Position::new(1000.0, 1500.0),
        leash_radius: 240.0,
    });
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert!(d.move_dir.y > 0.99, "walk back to the anchor");
    assert!(!d.fire);
}

#[test]
fn test_defender_ignores_targets_outside_leash() {
    let mut ctx = make_context(TankClass::BossBlue, 1.0);
    ctx.weapon_range = 300.0;
    ctx.objective = Some(Objective {
        anchor: ctx.position,
        leash_radius: 320.0,
    });
    ctx.target = Some(contact_at(2000.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert!(!d.fire);
    assert!(!d.fire_missile, "missiles also respect the leash");
}

#[test]
fn test_boss_fires_missiles_in_seek_range() {
    let mut ctx = make_context(TankClass::BossRed, 1.0);
    ctx.missiles_ready = true;
    ctx.objective = Some(Objective {
        anchor: ctx.position,
        leash_radius: 320.0,
    });
    ctx.target = Some(contact_at(1400.0, 1000.0, &ctx.position));
    let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
    assert!(d.fire_missile);
}

#[test]
fn test_profiles_follow_class_roles() {
    assert!(get_profile(TankClass::Normal).retreats);
    assert!(!get_profile(TankClass::BossOverlord).retreats);
    assert!(get_profile(TankClass::GuardianRed).defends_objective);
    assert!(get_profile(TankClass::BossBlue).uses_missiles);
    assert!(!get_profile(TankClass::Normal).uses_missiles);
    assert!(
        get_profile(TankClass::Bomber).preferred_range < BOMBER_TRIGGER_RANGE,
        "bombers close inside trigger range"
    );
}

proptest! {
    #[test]
    fn prop_move_dir_is_unit_or_zero(
        x in 100.0..4700.0f64,
        y in 100.0..3100.0f64,
        tx in 100.0..4700.0f64,
        ty in 100.0..3100.0f64,
        hp in 0.0..1.0f64,
        heading in -3.2..3.2f64,
    ) {
        let mut ctx = make_context(TankClass::Normal, hp);
        ctx.position = Position::new(x, y);
        ctx.heading = heading;
        ctx.target = Some(contact_at(tx, ty, &ctx.position));
        let d = evaluate(&ctx, &AiMemory::default(), ROLLS);
        let len = d.move_dir.length();
        prop_assert!(len < 1e-9 || (len - 1.0).abs() < 1e-6, "len = {}", len);
        prop_assert!(d.aim.is_finite());
    }
}
