//! Skill activation and weapon switching.
//!
//! Requests come in through `Intent`. Skills are blocked while dead or
//! silenced, and so is the weapon switch.

use glam::DVec2;
use hecs::{Entity, World};

use siege_core::components::*;
use siege_core::config::class_stats;
use siege_core::constants::*;
use siege_core::enums::{Faction, ParticleKind, StatusKind};
use siege_core::types::{Position, Velocity};

use crate::systems::effects;
use crate::systems::status::apply_status;

/// Process skill requests for every tank.
pub fn run(world: &mut World) {
    let mut emps: Vec<(Entity, Position, Faction)> = Vec::new();

    for (entity, (pos, vel, body, health, intent, skills, buffs, status, weaponry)) in world.query_mut::<(
        &Position,
        &mut Velocity,
        &TankBody,
        &Health,
        &Intent,
        &mut Skills,
        &mut Buffs,
        &StatusEffects,
        &mut Weaponry,
    )>() {
        if health.dead || status.silence > 0.0 {
            continue;
        }

        if let Some(weapon) = intent.switch_weapon.filter(|w| w.is_primary() && *w != weaponry.weapon) {
            weaponry.weapon = weapon;
            weaponry.burst_remaining = 0;
        }

        if intent.dash && skills.dash <= 0.0 {
            let mut dir = DVec2::new(intent.move_x, intent.move_y).normalize_or_zero();
            if dir == DVec2::ZERO {
                dir = DVec2::new(body.heading.cos(), body.heading.sin());
            }
            *vel = Velocity::from_vec(vel.as_vec() + dir * DASH_IMPULSE);
            skills.dash = DASH_CD;
        }
        if intent.emp && skills.emp <= 0.0 {
            emps.push((entity, *pos, body.faction));
            skills.emp = EMP_CD;
        }
        if intent.rage && skills.rage <= 0.0 {
            buffs.rage = RAGE_DURATION;
            skills.rage = RAGE_CD;
        }
        // Turbo's cooldown starts when the buff expires.
        if intent.turbo && skills.turbo <= 0.0 && buffs.turbo <= 0.0 {
            buffs.turbo = TURBO_DURATION;
        }
        if intent.shield && skills.shield <= 0.0 {
            buffs.shield = SHIELD_DURATION;
            skills.shield = SHIELD_CD;
        }
    }

    for (source, center, faction) in emps {
        for (e, (pos, body, health, status)) in
            world.query_mut::<(&Position, &TankBody, &Health, &mut StatusEffects)>()
        {
            if e == source || health.dead || !faction.is_hostile_to(body.faction) {
                continue;
            }
            if pos.distance_to(&center) <= EMP_RADIUS {
                apply_status(status, StatusKind::Silence, EMP_SILENCE, class_stats(body.class).cc_immune);
            }
        }
        effects::spawn_burst(world, ParticleKind::Electric, center, 12, EMP_RADIUS * 2.0, 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_core::enums::{TankClass, WeaponType};

    use crate::world_setup::spawn_tank;

    fn tank(world: &mut World, faction: Faction, class: TankClass, x: f64) -> Entity {
        spawn_tank(
            world,
            faction,
            class,
            WeaponType::Cannon,
            Position::new(x, 500.0),
            "T".to_string(),
            SpawnOrigin::Roster,
        )
    }

    #[test]
    fn test_emp_silences_hostiles_in_radius() {
        let mut world = World::new();
        let caster = tank(&mut world, Faction::Blue, TankClass::Normal, 500.0);
        let near = tank(&mut world, Faction::Red, TankClass::Normal, 700.0);
        let far = tank(&mut world, Faction::Red, TankClass::Normal, 900.0);
        let ally = tank(&mut world, Faction::Blue, TankClass::Normal, 600.0);
        let boss = tank(&mut world, Faction::Neutral, TankClass::BossRed, 550.0);
        world.get::<&mut Intent>(caster).unwrap().emp = true;

        run(&mut world);

        let silence = |e| world.get::<&StatusEffects>(e).unwrap().silence;
        assert_eq!(silence(near), EMP_SILENCE);
        assert_eq!(silence(far), 0.0);
        assert_eq!(silence(ally), 0.0);
        assert_eq!(silence(boss), 0.0, "bosses are immune to crowd control");
        assert_eq!(world.get::<&Skills>(caster).unwrap().emp, EMP_CD);
    }

    #[test]
    fn test_silence_blocks_skills_and_weapon_switch() {
        let mut world = World::new();
        let t = tank(&mut world, Faction::Blue, TankClass::Normal, 500.0);
        world.get::<&mut StatusEffects>(t).unwrap().silence = 1.0;
        {
            let mut intent = world.get::<&mut Intent>(t).unwrap();
            intent.rage = true;
            intent.switch_weapon = Some(WeaponType::Laser);
        }
        run(&mut world);
        assert_eq!(world.get::<&Buffs>(t).unwrap().rage, 0.0);
        assert_eq!(world.get::<&Weaponry>(t).unwrap().weapon, WeaponType::Cannon);
    }

    #[test]
    fn test_dash_uses_heading_without_move_input() {
        let mut world = World::new();
        let t = tank(&mut world, Faction::Blue, TankClass::Normal, 500.0);
        world.get::<&mut Intent>(t).unwrap().dash = true;
        run(&mut world);
        let v = *world.get::<&Velocity>(t).unwrap();
        assert!((v.x - DASH_IMPULSE).abs() < 1e-9, "heading 0 dashes east");
        assert_eq!(world.get::<&Skills>(t).unwrap().dash, DASH_CD);
    }

    #[test]
    fn test_turbo_cooldown_waits_for_expiry() {
        let mut world = World::new();
        let t = tank(&mut world, Faction::Blue, TankClass::Normal, 500.0);
        world.get::<&mut Intent>(t).unwrap().turbo = true;
        run(&mut world);
        assert_eq!(world.get::<&Buffs>(t).unwrap().turbo, TURBO_DURATION);
        assert_eq!(world.get::<&Skills>(t).unwrap().turbo, 0.0);
    }
}
