//! Mid-match arrivals on the match clock: guardians, lockdown zone events,
//! health packs and roster reinforcements.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use siege_core::components::{HealthPack, PackSource, SpawnOrigin};
use siege_core::constants::*;
use siege_core::enums::{Faction, TankClass};
use siege_core::events::SimEvent;
use siege_core::types::Position;
use siege_map::TileMap;

use crate::match_state::MatchState;
use crate::systems::EPSILON;
use crate::world_setup::{spawn_defender, spawn_point, spawn_tank};

/// Attempts at finding an open tile for a global pack before giving up
/// until the next interval.
const PACK_PLACEMENT_ATTEMPTS: usize = 32;

/// Staging slot used for returning reinforcements.
const REINFORCEMENT_SLOT: usize = 1;

/// Run every spawn schedule against the current match time.
pub fn run(
    world: &mut World,
    map: &TileMap,
    state: &mut MatchState,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
    now: f64,
) {
    spawn_guardians(world, state, events, now);
    spawn_zone_events(world, state, events, now);
    spawn_health_packs(world, map, state, rng);
    spawn_reinforcements(world, state);
}

fn due(at: f64, match_time: f64) -> bool {
    match_time >= at - EPSILON
}

fn spawn_guardians(world: &mut World, state: &mut MatchState, events: &mut Vec<SimEvent>, now: f64) {
    let match_time = state.match_time;
    let mut spawned: Vec<(TankClass, Position)> = Vec::new();
    for (i, point) in state.spawner.guardians.iter_mut().enumerate() {
        if !point.next_spawn_at.is_some_and(|at| due(at, match_time)) {
            continue;
        }
        point.next_spawn_at = None;
        let class = GUARDIAN_CLASSES[i];
        let anchor = Position::from_tile(point.tile.0, point.tile.1);
        spawn_defender(
            world,
            class,
            anchor,
            GUARDIAN_LEASH,
            class.name().replace('_', " "),
            SpawnOrigin::Guardian(i),
        );
        spawned.push((class, anchor));
    }

    for (class, position) in spawned {
        tracing::info!(class = class.name(), x = position.x, y = position.y, "guardian spawned");
        state.alert.raise(
            "GUARDIAN DEPLOYED",
            "Destroy it to empower your faction",
            Faction::Neutral.color(),
            now,
        );
        events.push(SimEvent::GuardianSpawned { class, position });
    }
}

fn spawn_zone_events(world: &mut World, state: &mut MatchState, events: &mut Vec<SimEvent>, now: f64) {
    if !state.spawner.elites_spawned && due(ZONE_ELITE_TIME, state.match_time) {
        state.spawner.elites_spawned = true;
        for (i, ((tx, ty), class, leash)) in ELITE_ZONES.into_iter().enumerate() {
            spawn_defender(
                world,
                class,
                Position::from_tile(tx, ty),
                leash,
                format!("ELITE {}", class.name()),
                SpawnOrigin::Zone(i),
            );
        }
        tracing::info!(count = ELITE_ZONES.len(), "lockdown: elites deployed");
        state.alert.raise("LOCKDOWN", "Elite units hold the buff zones", Faction::Neutral.color(), now);
        events.push(SimEvent::ZoneEvent { bosses: false });
    }

    if !state.spawner.bosses_spawned && due(ZONE_BOSS_TIME, state.match_time) {
        state.spawner.bosses_spawned = true;
        for (i, ((tx, ty), class, leash)) in BOSS_ZONES.into_iter().enumerate() {
            spawn_defender(
                world,
                class,
                Position::from_tile(tx, ty),
                leash,
                class.name().replace('_', " "),
                SpawnOrigin::Zone(ELITE_ZONES.len() + i),
            );
        }
        tracing::info!(count = BOSS_ZONES.len(), "lockdown: bosses deployed");
        state.alert.raise("WARNING: BOSSES INBOUND", "Heavy units have entered the arena", "#ff0055", now);
        events.push(SimEvent::ZoneEvent { bosses: true });
    }
}

fn spawn_health_packs(world: &mut World, map: &TileMap, state: &mut MatchState, rng: &mut ChaCha8Rng) {
    let match_time = state.match_time;

    if due(state.spawner.next_global_pack, match_time) {
        state.spawner.next_global_pack += HEALTH_PACK_SPAWN_GLOBAL;
        let global = world
            .query::<&HealthPack>()
            .iter()
            .filter(|(_, p)| p.source == PackSource::Global)
            .count();
        if global < HEALTH_PACK_MAX_GLOBAL {
            if let Some(position) = random_open_position(map, rng) {
                world.spawn((
                    position,
                    HealthPack {
                        value: HEALTH_PACK_VALUE,
                        source: PackSource::Global,
                    },
                ));
            }
        }
    }

    if due(state.spawner.next_base_pack, match_time) {
        state.spawner.next_base_pack += HEALTH_PACK_SPAWN_BASE;
        for base in state.bases.iter().filter(|b| b.active) {
            let source = PackSource::Base(base.faction);
            let waiting = world.query::<&HealthPack>().iter().any(|(_, p)| p.source == source);
            if waiting {
                continue;
            }
            // Two tiles to the side of the staging lane.
            let lane = spawn_point(base.faction, 1);
            let side = spawn_point(base.faction, 2);
            let position = Position::new(
                lane.x + (side.x - lane.x) * 2.0,
                lane.y + (side.y - lane.y) * 2.0,
            );
            world.spawn((
                position,
                HealthPack {
                    value: HEALTH_PACK_VALUE,
                    source,
                },
            ));
        }
    }
}

/// A random passable tile center away from the border.
fn random_open_position(map: &TileMap, rng: &mut ChaCha8Rng) -> Option<Position> {
    let w = map.width() as i32;
    let h = map.height() as i32;
    (0..PACK_PLACEMENT_ATTEMPTS).find_map(|_| {
        let tx = rng.gen_range(1..w - 1);
        let ty = rng.gen_range(1..h - 1);
        map.is_open(tx, ty).then(|| Position::from_tile(tx, ty))
    })
}

fn spawn_reinforcements(world: &mut World, state: &mut MatchState) {
    let match_time = state.match_time;
    let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.spawner.reinforcements)
        .into_iter()
        .partition(|r| due(r.due_at, match_time));
    state.spawner.reinforcements = waiting;

    for r in ready {
        if !state.base(r.faction).is_some_and(|b| b.active) {
            continue;
        }
        spawn_tank(
            world,
            r.faction,
            r.class,
            r.weapon,
            spawn_point(r.faction, REINFORCEMENT_SLOT),
            r.name.clone(),
            SpawnOrigin::Reinforcement,
        );
        tracing::debug!(name = %r.name, faction = r.faction.name(), "reinforcement arrived");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use siege_core::components::{Objective, TankBody};
    use siege_core::config::MatchConfig;
    use siege_core::enums::WeaponType;

    use crate::match_state::PendingReinforcement;

    fn setup() -> (World, TileMap, MatchState, ChaCha8Rng) {
        let state = MatchState::new(&MatchConfig::default().validate().unwrap());
        (
            World::new(),
            siege_map::layout::standard(),
            state,
            ChaCha8Rng::seed_from_u64(9),
        )
    }

    fn tanks_of(world: &World, pred: impl Fn(&TankBody) -> bool) -> usize {
        world.query::<&TankBody>().iter().filter(|(_, b)| pred(b)).count()
    }

    #[test]
    fn test_guardians_arrive_at_sixty_seconds() {
        let (mut world, map, mut state, mut rng) = setup();
        let mut events = Vec::new();
        state.match_time = GUARDIAN_SPAWN_INITIAL - 1.0;
        run(&mut world, &map, &mut state, &mut rng, &mut events, 0.0);
        assert_eq!(tanks_of(&world, |b| b.class.is_guardian()), 0);

        state.match_time = GUARDIAN_SPAWN_INITIAL;
        run(&mut world, &map, &mut state, &mut rng, &mut events, 0.0);
        assert_eq!(tanks_of(&world, |b| b.class == TankClass::GuardianRed), 2);
        assert_eq!(tanks_of(&world, |b| b.class == TankClass::GuardianBlue), 2);
        assert!(state.spawner.guardians.iter().all(|g| g.next_spawn_at.is_none()));
        let guardian_events = events
            .iter()
            .filter(|e| matches!(e, SimEvent::GuardianSpawned { .. }))
            .count();
        assert_eq!(guardian_events, 4);

        run(&mut world, &map, &mut state, &mut rng, &mut events, 0.0);
        assert_eq!(tanks_of(&world, |b| b.class.is_guardian()), 4, "no double spawn");
    }

    #[test]
    fn test_zone_events_spawn_once_each() {
        let (mut world, map, mut state, mut rng) = setup();
        let mut events = Vec::new();
        state.spawner.guardians.clear();
        state.match_time = ZONE_ELITE_TIME;
        run(&mut world, &map, &mut state, &mut rng, &mut events, 0.0);
        run(&mut world, &map, &mut state, &mut rng, &mut events, 0.0);
        assert_eq!(tanks_of(&world, |b| b.faction == Faction::Neutral), ELITE_ZONES.len());

        state.match_time = ZONE_BOSS_TIME;
        run(&mut world, &map, &mut state, &mut rng, &mut events, 0.0);
        assert_eq!(tanks_of(&world, |b| b.class.is_boss()), BOSS_ZONES.len());
        let leashed = world.query::<&Objective>().iter().count();
        assert_eq!(leashed, ELITE_ZONES.len() + BOSS_ZONES.len());
        assert!(events.contains(&SimEvent::ZoneEvent { bosses: true }));
    }

    #[test]
    fn test_global_packs_respect_cap() {
        let (mut world, map, mut state, mut rng) = setup();
        state.spawner.guardians.clear();
        state.spawner.next_base_pack = f64::MAX;
        for i in 1..=(HEALTH_PACK_MAX_GLOBAL + 3) {
            state.match_time = i as f64 * HEALTH_PACK_SPAWN_GLOBAL;
            run(&mut world, &map, &mut state, &mut rng, &mut Vec::new(), 0.0);
        }
        let packs = world.query::<&HealthPack>().iter().count();
        assert_eq!(packs, HEALTH_PACK_MAX_GLOBAL);
        for (_, (pos, _)) in world.query::<(&Position, &HealthPack)>().iter() {
            let (tx, ty) = pos.tile();
            assert!(map.is_open(tx, ty), "pack on a blocked tile");
        }
    }

    #[test]
    fn test_base_packs_only_at_active_bases() {
        let (mut world, map, mut state, mut rng) = setup();
        state.spawner.guardians.clear();
        state.base_mut(Faction::Green).unwrap().active = false;
        state.match_time = HEALTH_PACK_SPAWN_BASE;
        state.spawner.next_global_pack = f64::MAX;
        run(&mut world, &map, &mut state, &mut rng, &mut Vec::new(), 0.0);
        let sources: Vec<PackSource> = world.query::<&HealthPack>().iter().map(|(_, p)| p.source).collect();
        assert_eq!(sources.len(), 3);
        assert!(!sources.contains(&PackSource::Base(Faction::Green)));
    }

    #[test]
    fn test_reinforcement_needs_active_base() {
        let (mut world, map, mut state, mut rng) = setup();
        state.spawner.guardians.clear();
        let pending = |faction, name: &str| PendingReinforcement {
            faction,
            class: TankClass::Normal,
            weapon: WeaponType::Cannon,
            name: name.to_string(),
            due_at: REINFORCEMENT_DELAY,
        };
        state.spawner.reinforcements = vec![pending(Faction::Red, "RED-1"), pending(Faction::Purple, "PURPLE-1")];
        state.base_mut(Faction::Purple).unwrap().active = false;

        state.match_time = REINFORCEMENT_DELAY - 1.0;
        run(&mut world, &map, &mut state, &mut rng, &mut Vec::new(), 0.0);
        assert_eq!(tanks_of(&world, |_| true), 0);
        assert_eq!(state.spawner.reinforcements.len(), 2);

        state.match_time = REINFORCEMENT_DELAY;
        run(&mut world, &map, &mut state, &mut rng, &mut Vec::new(), 0.0);
        assert_eq!(tanks_of(&world, |b| b.name == "RED-1" && b.origin == SpawnOrigin::Reinforcement), 1);
        assert_eq!(tanks_of(&world, |b| b.faction == Faction::Purple), 0);
        assert!(state.spawner.reinforcements.is_empty());
    }
}
