//! Base turrets: every active base shells the nearest visible hostile in
//! range on a fixed cooldown.

use std::f64::consts::SQRT_2;

use hecs::World;

use siege_core::components::{Attacker, Health, Projectile, StatusEffects, TankBody};
use siege_core::config::weapon_stats;
use siege_core::constants::*;
use siege_core::enums::{Faction, ParticleKind, WeaponType};
use siege_core::types::{Position, Velocity};

use crate::match_state::MatchState;
use crate::systems::effects;

/// Shells leave from outside the corners of the 3×3 base block.
const MUZZLE_OFFSET: f64 = BASE_RADIUS * SQRT_2 + PROJECTILE_RADIUS * 2.0;

pub fn run(world: &mut World, state: &mut MatchState) {
    let tanks: Vec<(Position, Faction)> = world
        .query::<(&Position, &TankBody, &Health, &StatusEffects)>()
        .iter()
        .filter(|(_, (_, _, health, status))| !health.dead && status.stealth <= 0.0)
        .map(|(_, (pos, body, _, _))| (*pos, body.faction))
        .collect();
    let cannon = weapon_stats(WeaponType::Cannon);

    for base in state.bases.iter_mut().filter(|b| b.active) {
        base.turret_cooldown = (base.turret_cooldown - DT).max(0.0);

        let target = tanks
            .iter()
            .filter(|(pos, faction)| {
                base.faction.is_hostile_to(*faction) && pos.distance_to(&base.position) <= BASE_TURRET_RANGE
            })
            .min_by(|a, b| {
                a.0.distance_sq_to(&base.position)
                    .total_cmp(&b.0.distance_sq_to(&base.position))
            });
        let Some((target_pos, _)) = target else {
            continue;
        };
        base.turret_angle = base.position.angle_to(target_pos);
        if base.turret_cooldown > 0.0 {
            continue;
        }
        base.turret_cooldown = BASE_TURRET_CD;

        let origin = base.position.offset(base.turret_angle, MUZZLE_OFFSET);
        let (sin, cos) = base.turret_angle.sin_cos();
        world.spawn((
            origin,
            Velocity::new(cos * cannon.speed, sin * cannon.speed),
            Projectile {
                attacker: Attacker {
                    id: None,
                    faction: base.faction,
                    name: format!("{} BASE", base.faction.name()),
                    is_player: false,
                },
                from_base: true,
                weapon: WeaponType::Cannon,
                damage: BASE_TURRET_DAMAGE,
                radius: PROJECTILE_RADIUS,
                life: BASE_TURRET_RANGE / cannon.speed,
                splash_radius: 0.0,
                burn: false,
                homing: false,
            },
        ));
        effects::spawn_burst(world, ParticleKind::Muzzle, origin, 1, 0.0, 0.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_core::components::SpawnOrigin;
    use siege_core::config::MatchConfig;
    use siege_core::enums::TankClass;

    use crate::world_setup::spawn_tank;

    fn setup() -> (World, MatchState) {
        let state = MatchState::new(&MatchConfig::default().validate().unwrap());
        (World::new(), state)
    }

    fn near_red_base(world: &mut World, state: &MatchState, faction: Faction, dy: f64) -> hecs::Entity {
        let base = state.base(Faction::Red).unwrap().position;
        spawn_tank(
            world,
            faction,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(base.x, base.y + dy),
            "T".to_string(),
            SpawnOrigin::Roster,
        )
    }

    fn shells(world: &World) -> Vec<Projectile> {
        world.query::<&Projectile>().iter().map(|(_, p)| p.clone()).collect()
    }

    #[test]
    fn test_turret_fires_at_hostile_in_range() {
        let (mut world, mut state) = setup();
        state.base_mut(Faction::Red).unwrap().turret_cooldown = 0.0;
        near_red_base(&mut world, &state, Faction::Blue, 300.0);
        run(&mut world, &mut state);

        let fired = shells(&world);
        assert_eq!(fired.len(), 1);
        assert!(fired[0].from_base);
        assert_eq!(fired[0].damage, BASE_TURRET_DAMAGE);
        assert_eq!(fired[0].splash_radius, 0.0, "turret shells never splash");
        assert_eq!(fired[0].attacker.name, "RED BASE");
        let base = state.base(Faction::Red).unwrap();
        assert_eq!(base.turret_cooldown, BASE_TURRET_CD);
        assert!((base.turret_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9, "aims south");
    }

    #[test]
    fn test_turret_ignores_friends_stealth_and_far_targets() {
        let (mut world, mut state) = setup();
        state.base_mut(Faction::Red).unwrap().turret_cooldown = 0.0;
        near_red_base(&mut world, &state, Faction::Red, 200.0);
        near_red_base(&mut world, &state, Faction::Blue, BASE_TURRET_RANGE + 50.0);
        let hidden = near_red_base(&mut world, &state, Faction::Blue, 250.0);
        world.get::<&mut StatusEffects>(hidden).unwrap().stealth = 1.0;
        run(&mut world, &mut state);
        assert!(shells(&world).is_empty());
    }

    #[test]
    fn test_destroyed_base_is_silent() {
        let (mut world, mut state) = setup();
        {
            let red = state.base_mut(Faction::Red).unwrap();
            red.turret_cooldown = 0.0;
            red.active = false;
        }
        near_red_base(&mut world, &state, Faction::Blue, 300.0);
        run(&mut world, &mut state);
        assert!(shells(&world).is_empty());
    }
}
