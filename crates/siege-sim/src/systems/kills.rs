//! Kill resolution: feed, scorecards, assists, guardian and zone rewards,
//! reinforcements and the player's death.

use hecs::World;

use siege_core::components::{Buffs, Health, Scorecard, SpawnOrigin, TankBody, Weaponry};
use siege_core::constants::*;
use siege_core::enums::{DecalKind, Faction, RespawnPhase, TankClass};
use siege_core::events::SimEvent;
use siege_core::state::RespawnState;
use siege_core::types::Position;

use crate::ids::to_entity;
use crate::match_state::{MatchState, PendingReinforcement};
use crate::systems::combat::KillRecord;
use crate::systems::effects;

/// Resolve every kill recorded this tick, in order.
pub fn run(world: &mut World, state: &mut MatchState, kills: &mut Vec<KillRecord>, events: &mut Vec<SimEvent>, now: f64) {
    for record in kills.drain(..) {
        let Ok(victim) = world.get::<&TankBody>(record.victim).map(|b| (*b).clone()) else {
            continue;
        };
        let victim_pos = world
            .get::<&Position>(record.victim)
            .map(|p| *p)
            .unwrap_or_default();
        let player_hit_at = world
            .get::<&Health>(record.victim)
            .ok()
            .and_then(|h| h.player_hit_at);
        let killer = &record.attacker;

        if let Ok(mut card) = world.get::<&mut Scorecard>(record.victim) {
            card.deaths += 1;
        }
        let killer_entity = killer.id.and_then(to_entity);
        if let Some(e) = killer_entity {
            if let Ok(mut card) = world.get::<&mut Scorecard>(e) {
                card.kills += 1;
            }
        }

        // Assist: the player hit the victim recently but someone else finished it.
        if !killer.is_player && !victim.is_player && player_hit_at.is_some_and(|t| now - t <= ASSIST_WINDOW) {
            if let Some(mut card) = state.player.and_then(|p| world.get::<&mut Scorecard>(p).ok()) {
                card.assists += 1;
            }
        }

        tracing::debug!(
            killer = %killer.name,
            victim = %victim.name,
            killer_faction = killer.faction.name(),
            victim_faction = victim.faction.name(),
            "kill"
        );
        state.feed.push(&killer.name, killer.faction, &victim.name, victim.faction, now);
        events.push(SimEvent::Kill {
            killer: killer.name.clone(),
            victim: victim.name.clone(),
            killer_faction: killer.faction,
            victim_faction: victim.faction,
            by_player: killer.is_player,
        });
        effects::explosion(world, victim_pos, victim.radius * 2.0);
        effects::spawn_decal(world, DecalKind::Crater, victim_pos, victim.radius / TANK_RADIUS);

        match victim.origin {
            SpawnOrigin::Player => {
                tracing::info!(killer = %killer.name, "player destroyed");
                state.player_killer = Some(killer.name.clone());
                state.respawn = RespawnState {
                    phase: RespawnPhase::DeathCam,
                    elapsed: 0.0,
                };
                events.push(SimEvent::PlayerDied);
            }
            SpawnOrigin::Roster | SpawnOrigin::Reinforcement => {
                if state.base(victim.faction).is_some_and(|b| b.active) {
                    let weapon = world
                        .get::<&Weaponry>(record.victim)
                        .map(|w| w.weapon)
                        .unwrap_or_default();
                    state.spawner.reinforcements.push(PendingReinforcement {
                        faction: victim.faction,
                        class: victim.class,
                        weapon,
                        name: victim.name.clone(),
                        due_at: state.match_time + REINFORCEMENT_DELAY,
                    });
                }
            }
            SpawnOrigin::Guardian(index) => {
                if let Some(point) = state.spawner.guardians.get_mut(index) {
                    point.next_spawn_at = Some(state.match_time + GUARDIAN_RESPAWN_DELAY);
                }
                grant_guardian_buff(state, events, killer.faction, victim.class, now);
            }
            SpawnOrigin::Zone(_) => {
                if let Some(mut buffs) = killer_entity.and_then(|e| world.get::<&mut Buffs>(e).ok()) {
                    match victim.class {
                        TankClass::Smoke | TankClass::Bomber => buffs.perm_fire = true,
                        TankClass::Freezer | TankClass::Flasher => buffs.perm_speed = true,
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Guardian kills buff the killer's whole faction until the spawn point
/// brings the guardian back.
fn grant_guardian_buff(state: &mut MatchState, events: &mut Vec<SimEvent>, faction: Faction, class: TankClass, now: f64) {
    let Some(buff) = state.buff_mut(faction) else {
        return;
    };
    let label = match class {
        TankClass::GuardianRed => {
            buff.red = GUARDIAN_RESPAWN_DELAY;
            "BURNING CORE"
        }
        TankClass::GuardianBlue => {
            buff.blue = GUARDIAN_RESPAWN_DELAY;
            "OVERDRIVE"
        }
        _ => return,
    };
    tracing::info!(faction = faction.name(), buff = label, "guardian buff granted");
    state.alert.raise(
        &format!("{} ACQUIRED {}", faction.name(), label),
        "Guardian destroyed",
        faction.color(),
        now,
    );
    events.push(SimEvent::GuardianBuff { faction, class });
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_core::components::Attacker;
    use siege_core::config::ValidatedConfig;
    use siege_core::enums::WeaponType;

    use crate::ids::to_id;
    use crate::world_setup;

    fn state() -> MatchState {
        MatchState::new(&ValidatedConfig {
            seed: 1,
            time_scale: 1.0,
            roster: Vec::new(),
            viewport: DEFAULT_VIEWPORT,
            player_weapon: WeaponType::Cannon,
        })
    }

    fn credit(world: &World, e: hecs::Entity) -> Attacker {
        let body = world.get::<&TankBody>(e).unwrap();
        Attacker {
            id: Some(to_id(e)),
            faction: body.faction,
            name: body.name.clone(),
            is_player: body.is_player,
        }
    }

    #[test]
    fn test_guardian_kill_buffs_faction_and_schedules_respawn() {
        let mut world = World::new();
        let mut state = state();
        state.match_time = 100.0;
        let killer = world_setup::spawn_tank(
            &mut world,
            Faction::Green,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(500.0, 500.0),
            "G-1".to_string(),
            SpawnOrigin::Roster,
        );
        let guardian = world_setup::spawn_tank(
            &mut world,
            Faction::Neutral,
            TankClass::GuardianRed,
            WeaponType::Cannon,
            Position::new(600.0, 500.0),
            "GUARDIAN".to_string(),
            SpawnOrigin::Guardian(0),
        );
        state.spawner.guardians[0].next_spawn_at = None;

        let mut kills = vec![KillRecord {
            victim: guardian,
            attacker: credit(&world, killer),
        }];
        let mut events = Vec::new();
        run(&mut world, &mut state, &mut kills, &mut events, 100.0);

        assert_eq!(state.buff(Faction::Green).red, GUARDIAN_RESPAWN_DELAY);
        assert_eq!(state.spawner.guardians[0].next_spawn_at, Some(100.0 + GUARDIAN_RESPAWN_DELAY));
        assert_eq!(world.get::<&Scorecard>(killer).unwrap().kills, 1);
        assert_eq!(state.feed.len(), 1);
        assert!(events.contains(&SimEvent::GuardianBuff {
            faction: Faction::Green,
            class: TankClass::GuardianRed
        }));
    }

    #[test]
    fn test_roster_death_queues_reinforcement() {
        let mut world = World::new();
        let mut state = state();
        let killer = world_setup::spawn_tank(
            &mut world,
            Faction::Red,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(500.0, 500.0),
            "R-1".to_string(),
            SpawnOrigin::Roster,
        );
        let victim = world_setup::spawn_tank(
            &mut world,
            Faction::Purple,
            TankClass::Freezer,
            WeaponType::MachineGun,
            Position::new(600.0, 500.0),
            "P-1".to_string(),
            SpawnOrigin::Roster,
        );
        let mut kills = vec![KillRecord {
            victim,
            attacker: credit(&world, killer),
        }];
        run(&mut world, &mut state, &mut kills, &mut Vec::new(), 0.0);

        let pending = &state.spawner.reinforcements;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].class, TankClass::Freezer);
        assert_eq!(pending[0].weapon, WeaponType::MachineGun);
        assert_eq!(pending[0].due_at, REINFORCEMENT_DELAY);
        assert_eq!(world.get::<&Scorecard>(victim).unwrap().deaths, 1);
    }

    #[test]
    fn test_zone_elite_kill_grants_permanent_upgrade() {
        let mut world = World::new();
        let mut state = state();
        let killer = world_setup::spawn_tank(
            &mut world,
            Faction::Blue,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(500.0, 500.0),
            "B-1".to_string(),
            SpawnOrigin::Roster,
        );
        let elite = world_setup::spawn_tank(
            &mut world,
            Faction::Neutral,
            TankClass::Flasher,
            WeaponType::Laser,
            Position::new(600.0, 500.0),
            "ELITE".to_string(),
            SpawnOrigin::Zone(3),
        );
        let mut kills = vec![KillRecord {
            victim: elite,
            attacker: credit(&world, killer),
        }];
        run(&mut world, &mut state, &mut kills, &mut Vec::new(), 0.0);
        let buffs = world.get::<&Buffs>(killer).unwrap();
        assert!(buffs.perm_speed);
        assert!(!buffs.perm_fire);
        assert!(state.spawner.reinforcements.is_empty(), "zone elites never reinforce");
    }
}
