//! AI system: bridges the ECS world and the pure FSM in `siege-ai`.
//!
//! For each AI tank, picks a visible target and heal source, pre-rolls the
//! random draws, evaluates the FSM, and writes the decision back as intent
//! and memory.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use siege_ai::fsm::{evaluate, AiContext, AiRolls, Contact};
use siege_core::components::*;
use siege_core::config::weapon_stats;
use siege_core::constants::*;
use siege_core::enums::Faction;
use siege_core::types::{EntityId, Position};
use siege_map::{has_line_of_sight, TileMap};

use crate::ids::to_id;
use crate::match_state::MatchState;

/// What the AI may know about another tank.
#[derive(Debug, Clone, Copy)]
struct Sighting {
    id: EntityId,
    position: Position,
    faction: Faction,
    stealthed: bool,
}

/// Per-tank inputs gathered before evaluation.
struct Pending {
    entity: Entity,
    ctx: AiContext,
    memory: AiMemory,
    is_boss: bool,
    leash: Option<Objective>,
}

/// Best target for a tank: its aggro target when visible, else the nearest
/// visible hostile.
fn pick_target(
    map: &TileMap,
    sightings: &[Sighting],
    me: EntityId,
    position: &Position,
    faction: Faction,
    range: f64,
    aggro: Option<EntityId>,
) -> Option<Contact> {
    let visible: Vec<Contact> = sightings
        .iter()
        .filter(|s| s.id != me && !s.stealthed && faction.is_hostile_to(s.faction))
        .map(|s| Contact {
            id: s.id,
            position: s.position,
            distance: position.distance_to(&s.position),
        })
        .filter(|c| c.distance <= range && has_line_of_sight(map, position, &c.position))
        .collect();

    aggro
        .and_then(|id| visible.iter().find(|c| c.id == id).copied())
        .or_else(|| visible.into_iter().min_by(|a, b| a.distance.total_cmp(&b.distance)))
}

/// Run the AI system for one tick.
pub fn run(world: &mut World, map: &TileMap, state: &MatchState, visibility: f64, rng: &mut ChaCha8Rng) {
    let sightings: Vec<Sighting> = world
        .query::<(&Position, &TankBody, &Health, &StatusEffects)>()
        .iter()
        .filter(|(_, (_, _, health, _))| !health.dead)
        .map(|(e, (pos, body, _, status))| Sighting {
            id: to_id(e),
            position: *pos,
            faction: body.faction,
            stealthed: status.stealth > 0.0,
        })
        .collect();
    let packs: Vec<Position> = world
        .query::<(&Position, &HealthPack)>()
        .iter()
        .map(|(_, (pos, _))| *pos)
        .collect();

    let detection = AI_DETECTION_RANGE * visibility;
    let mut pending: Vec<Pending> = Vec::new();
    for (entity, (pos, body, health, weaponry, status, memory, intent, objective)) in world
        .query::<(
            &Position,
            &TankBody,
            &Health,
            &Weaponry,
            &StatusEffects,
            &AiMemory,
            &Intent,
            Option<&Objective>,
        )>()
        .iter()
    {
        if health.dead {
            continue;
        }
        let target = if status.blind > 0.0 {
            None
        } else {
            pick_target(map, &sightings, to_id(entity), pos, body.faction, detection, status.aggro_target)
        };
        let heal_source = packs
            .iter()
            .filter(|p| p.distance_to(pos) <= AI_HEAL_SEARCH_RADIUS)
            .min_by(|a, b| a.distance_sq_to(pos).total_cmp(&b.distance_sq_to(pos)))
            .copied();
        let home = objective
            .map(|o| o.anchor)
            .or_else(|| state.base(body.faction).filter(|b| b.active).map(|b| b.position))
            .unwrap_or(*pos);

        pending.push(Pending {
            entity,
            ctx: AiContext {
                class: body.class,
                position: *pos,
                heading: body.heading,
                turret_heading: body.turret_heading,
                hp_fraction: health.hp / health.max_hp,
                weapon_range: weapon_stats(weaponry.weapon).range,
                weapon_ready: weaponry.cooldown <= 0.0 && !weaponry.overheated,
                missiles_ready: weaponry.missile_ammo > 0 && weaponry.missile_cooldown <= 0.0,
                target,
                heal_source,
                objective: objective.cloned(),
                home,
                was_moving: intent.move_x != 0.0 || intent.move_y != 0.0,
                dt: DT,
            },
            memory: memory.clone(),
            is_boss: body.class.is_boss(),
            leash: objective.cloned().filter(|_| !body.class.is_objective_defender()),
        });
    }

    for p in pending {
        let rolls = AiRolls {
            strafe_duration: rng.gen_range(AI_STRAFE_MIN..=AI_STRAFE_MAX),
        };
        let decision = evaluate(&p.ctx, &p.memory, rolls);
        if decision.state_changed {
            tracing::trace!(entity = ?p.entity, state = ?decision.memory.state, "ai state changed");
        }

        // Zone elites roam but never leave their leash.
        let mut move_dir = decision.move_dir;
        if let Some(leash) = &p.leash {
            let next = Position::from_vec(p.ctx.position.as_vec() + move_dir * TILE_SIZE);
            if next.distance_to(&leash.anchor) > leash.leash_radius {
                move_dir = (leash.anchor.as_vec() - p.ctx.position.as_vec()).normalize_or_zero();
            }
        }

        let intent = Intent {
            move_x: move_dir.x,
            move_y: move_dir.y,
            aim: decision.aim,
            fire: decision.fire,
            fire_missile: decision.fire_missile,
            shield: p.is_boss && p.ctx.hp_fraction < 0.5,
            rage: p.is_boss && p.ctx.target.is_some(),
            ..Intent::default()
        };

        if let Ok((slot, memory)) = world.query_one_mut::<(&mut Intent, &mut AiMemory)>(p.entity) {
            *slot = intent;
            *memory = decision.memory;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use siege_core::config::MatchConfig;
    use siege_core::enums::{AiState, TankClass, TileType, WeaponType};

    use crate::world_setup::spawn_tank;

    fn sighting(id: u64, x: f64, faction: Faction) -> Sighting {
        Sighting {
            id: EntityId(id),
            position: Position::new(x, 500.0),
            faction,
            stealthed: false,
        }
    }

    #[test]
    fn test_prefers_visible_aggro_target() {
        let map = TileMap::new(MAP_WIDTH, MAP_HEIGHT);
        let me = Position::new(400.0, 500.0);
        let sightings = [sighting(1, 500.0, Faction::Red), sighting(2, 800.0, Faction::Red)];
        let t = pick_target(&map, &sightings, EntityId(9), &me, Faction::Blue, 700.0, None);
        assert_eq!(t.map(|c| c.id), Some(EntityId(1)), "nearest by default");
        let t = pick_target(&map, &sightings, EntityId(9), &me, Faction::Blue, 700.0, Some(EntityId(2)));
        assert_eq!(t.map(|c| c.id), Some(EntityId(2)), "aggro target wins");
    }

    #[test]
    fn test_ignores_stealth_friends_and_out_of_range() {
        let map = TileMap::new(MAP_WIDTH, MAP_HEIGHT);
        let me = Position::new(400.0, 500.0);
        let mut hidden = sighting(1, 450.0, Faction::Red);
        hidden.stealthed = true;
        let sightings = [hidden, sighting(2, 420.0, Faction::Blue), sighting(3, 2000.0, Faction::Red)];
        assert!(pick_target(&map, &sightings, EntityId(9), &me, Faction::Blue, 700.0, None).is_none());
    }

    #[test]
    fn test_wall_blocks_target() {
        let mut map = TileMap::new(MAP_WIDTH, MAP_HEIGHT);
        map.fill(12, 10, 12, 15, TileType::Steel);
        let me = Position::new(400.0, 500.0);
        let sightings = [sighting(1, 600.0, Faction::Red)];
        assert!(pick_target(&map, &sightings, EntityId(9), &me, Faction::Blue, 700.0, None).is_none());
    }

    #[test]
    fn test_run_writes_intent() {
        let mut world = World::new();
        let map = TileMap::new(MAP_WIDTH, MAP_HEIGHT);
        let state = MatchState::new(&MatchConfig::default().validate().unwrap());
        let ai = spawn_tank(
            &mut world,
            Faction::Red,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(1000.0, 1000.0),
            "R".to_string(),
            SpawnOrigin::Roster,
        );
        spawn_tank(
            &mut world,
            Faction::Blue,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(1400.0, 1000.0),
            "B".to_string(),
            SpawnOrigin::Roster,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        run(&mut world, &map, &state, 1.0, &mut rng);
        let memory = world.get::<&AiMemory>(ai).unwrap();
        assert_eq!(memory.state, AiState::Aggressive);
        let intent = world.get::<&Intent>(ai).unwrap();
        assert!(intent.aim.abs() < 1e-9, "aims east at the hostile");
    }
}
