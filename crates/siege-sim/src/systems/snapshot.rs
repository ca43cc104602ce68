//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system never modifies the world. Radar jitter draws from its own
//! RNG so building a snapshot never perturbs the simulation stream.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use siege_core::components::*;
use siege_core::constants::*;
use siege_core::enums::*;
use siege_core::events::SimEvent;
use siege_core::state::*;
use siege_core::types::{Position, Rect, SimTime};

use crate::match_state::MatchState;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build(
    world: &World,
    state: &MatchState,
    time: &SimTime,
    phase: GamePhase,
    events: Vec<SimEvent>,
    radar_rng: &mut ChaCha8Rng,
) -> GameStateSnapshot {
    let player = build_player(world, state);
    let mods = state.weather.modifiers();

    GameStateSnapshot {
        time: *time,
        phase,
        match_time: state.match_time,
        remaining: (MATCH_DURATION - state.match_time).max(0.0),
        weather: WeatherView {
            current: state.weather.current,
            next_change_in: state.weather.time_to_change(),
            blend: state.weather.blend(),
            visibility: mods.visibility,
        },
        radar: RadarView {
            entities: build_radar(world, state, mods.radar_jitter, radar_rng),
            camera: camera(&player.position, state.viewport),
        },
        player,
        bases: state.bases.clone(),
        hub: Some(state.hub.clone()),
        kill_feed: state.feed.entries(),
        alert: state.alert.current().cloned(),
        respawn: state.respawn,
        game_over: state.game_over,
        result: state.result.clone(),
        counts: build_counts(world),
        events,
    }
}

fn build_player(world: &World, state: &MatchState) -> PlayerView {
    let awaiting_respawn = state.respawn.phase == RespawnPhase::Ready;
    let killer_name = state.player_killer.clone();
    let Some(entity) = state.player else {
        return PlayerView {
            awaiting_respawn,
            killer_name,
            ..PlayerView::default()
        };
    };
    let mut query = world.query_one::<(
        &Position,
        &TankBody,
        &Health,
        &Weaponry,
        &Skills,
        &Buffs,
        &StatusEffects,
        &Scorecard,
    )>(entity);
    let Some((pos, body, health, weaponry, skills, buffs, status, card)) = query.as_mut().ok().and_then(|q| q.get())
    else {
        return PlayerView {
            awaiting_respawn,
            killer_name,
            ..PlayerView::default()
        };
    };

    PlayerView {
        position: *pos,
        heading: body.heading,
        turret_heading: body.turret_heading,
        hp: health.hp,
        max_hp: health.max_hp,
        heat: weaponry.heat,
        overheated: weaponry.overheated,
        weapon: weaponry.weapon,
        missile_ammo: weaponry.missile_ammo,
        missile_reload: weaponry.missile_reload,
        kills: card.kills,
        deaths: card.deaths,
        assists: card.assists,
        cooldowns: SkillCooldowns {
            dash: skills.dash,
            emp: skills.emp,
            rage: skills.rage,
            turbo: skills.turbo,
            shield: skills.shield,
        },
        buffs: BuffFlags {
            rage: buffs.rage > 0.0,
            shield: buffs.shield > 0.0,
            turbo: buffs.turbo > 0.0,
            perm_fire: buffs.perm_fire,
            perm_speed: buffs.perm_speed,
            buff_red: buffs.buff_red > 0.0,
            buff_blue: buffs.buff_blue > 0.0,
        },
        status: StatusFlags {
            burning: status.burn > 0.0,
            frozen: status.freeze > 0.0,
            silenced: status.silence > 0.0,
            blinded: status.blind > 0.0,
            stealthed: status.stealth > 0.0,
        },
        dead: health.dead,
        awaiting_respawn,
        killer_name,
    }
}

/// Radar entries in a stable order: tanks, bases, hub, items.
/// Stealthed hostiles are hidden from the player's radar.
fn build_radar(world: &World, state: &MatchState, jitter: f64, rng: &mut ChaCha8Rng) -> Vec<RadarBlip> {
    let mut blips: Vec<RadarBlip> = world
        .query::<(&Position, &TankBody, &Health, &StatusEffects)>()
        .iter()
        .filter(|(_, (_, body, health, status))| {
            !health.dead && !(status.stealth > 0.0 && PLAYER_FACTION.is_hostile_to(body.faction))
        })
        .map(|(_, (pos, body, _, _))| RadarBlip {
            position: *pos,
            faction: body.faction,
            category: if body.class.is_boss() {
                RadarCategory::Boss
            } else if body.class.is_guardian() {
                RadarCategory::Guardian
            } else {
                RadarCategory::Tank
            },
            is_player: body.is_player,
        })
        .collect();

    blips.extend(state.bases.iter().filter(|b| b.active).map(|b| RadarBlip {
        position: b.position,
        faction: b.faction,
        category: RadarCategory::Base,
        is_player: false,
    }));
    blips.push(RadarBlip {
        position: state.hub.position,
        faction: state.hub.owner,
        category: RadarCategory::Hub,
        is_player: false,
    });
    blips.extend(world.query::<(&Position, &HealthPack)>().iter().map(|(_, (pos, _))| RadarBlip {
        position: *pos,
        faction: Faction::Neutral,
        category: RadarCategory::Item,
        is_player: false,
    }));

    if jitter > 0.0 {
        for blip in blips.iter_mut() {
            blip.position.x += rng.gen_range(-0.5..0.5) * jitter;
            blip.position.y += rng.gen_range(-0.5..0.5) * jitter;
        }
    }
    blips
}

/// Viewport-sized rectangle centered on `focus`, kept inside the world.
fn camera(focus: &Position, viewport: (f64, f64)) -> Rect {
    let (w, h) = viewport;
    Rect {
        x: (focus.x - w / 2.0).min(WORLD_WIDTH - w).max(0.0),
        y: (focus.y - h / 2.0).min(WORLD_HEIGHT - h).max(0.0),
        w,
        h,
    }
}

fn build_counts(world: &World) -> EntityCounts {
    EntityCounts {
        tanks: world.query::<&TankBody>().iter().count(),
        projectiles: world.query::<&Projectile>().iter().count(),
        particles: world.query::<&Particle>().iter().count(),
        decals: world.query::<&Decal>().iter().count(),
        health_packs: world.query::<&HealthPack>().iter().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use siege_core::config::MatchConfig;

    use crate::world_setup::{setup_match, spawn_tank};

    fn setup() -> (World, MatchState) {
        let config = MatchConfig::default().validate().unwrap();
        let mut world = World::new();
        let mut state = MatchState::new(&config);
        setup_match(&mut world, &mut state, &config);
        (world, state)
    }

    fn snapshot(world: &World, state: &MatchState) -> GameStateSnapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        build(world, state, &SimTime::default(), GamePhase::Playing, Vec::new(), &mut rng)
    }

    #[test]
    fn test_player_view_reflects_components() {
        let (mut world, state) = setup();
        let player = state.player.unwrap();
        world.get::<&mut Health>(player).unwrap().hp = 700.0;
        world.get::<&mut Buffs>(player).unwrap().shield = 2.0;
        world.get::<&mut StatusEffects>(player).unwrap().freeze = 1.0;

        let snap = snapshot(&world, &state);
        assert_eq!(snap.player.hp, 700.0);
        assert_eq!(snap.player.max_hp, HP_PLAYER);
        assert!(snap.player.buffs.shield);
        assert!(!snap.player.buffs.rage);
        assert!(snap.player.status.frozen);
        assert_eq!(snap.remaining, MATCH_DURATION);
    }

    #[test]
    fn test_camera_is_clamped_to_world() {
        let cam = camera(&Position::new(10.0, 10.0), DEFAULT_VIEWPORT);
        assert_eq!((cam.x, cam.y), (0.0, 0.0));
        let cam = camera(&Position::new(WORLD_WIDTH, WORLD_HEIGHT), DEFAULT_VIEWPORT);
        assert!((cam.x + cam.w - WORLD_WIDTH).abs() < 1e-9);
        assert!((cam.y + cam.h - WORLD_HEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_radar_hides_stealthed_hostiles_only() {
        let mut world = World::new();
        let state = MatchState::new(&MatchConfig::default().validate().unwrap());
        let enemy = spawn_tank(
            &mut world,
            Faction::Red,
            TankClass::Smoke,
            WeaponType::Cannon,
            Position::new(500.0, 500.0),
            "R".to_string(),
            SpawnOrigin::Roster,
        );
        let friend = spawn_tank(
            &mut world,
            PLAYER_FACTION,
            TankClass::Smoke,
            WeaponType::Cannon,
            Position::new(600.0, 500.0),
            "B".to_string(),
            SpawnOrigin::Roster,
        );
        spawn_tank(
            &mut world,
            PLAYER_FACTION,
            TankClass::Normal,
            WeaponType::Cannon,
            Position::new(700.0, 500.0),
            "YOU".to_string(),
            SpawnOrigin::Player,
        );
        world.get::<&mut StatusEffects>(enemy).unwrap().stealth = 2.0;
        world.get::<&mut StatusEffects>(friend).unwrap().stealth = 2.0;

        let snap = snapshot(&world, &state);
        let tanks: Vec<_> = snap
            .radar
            .entities
            .iter()
            .filter(|b| b.category == RadarCategory::Tank)
            .collect();
        assert_eq!(tanks.len(), 2, "the enemy in smoke is hidden");
        assert!(tanks.iter().all(|b| b.faction == PLAYER_FACTION));
        let players: Vec<_> = tanks.iter().filter(|b| b.is_player).collect();
        assert_eq!(players.len(), 1, "exactly one entry is flagged as the player");
        assert_eq!(players[0].position, Position::new(700.0, 500.0));
        assert!(snap.radar.entities.iter().filter(|b| b.category != RadarCategory::Tank).all(|b| !b.is_player));
        assert_eq!(
            snap.radar.entities.iter().filter(|b| b.category == RadarCategory::Base).count(),
            4
        );
    }

    #[test]
    fn test_jitter_only_under_ion_storm() {
        let (world, mut state) = setup();
        let calm = snapshot(&world, &state);
        let hub = calm.radar.entities.iter().find(|b| b.category == RadarCategory::Hub).unwrap();
        assert_eq!(hub.position, state.hub.position, "clear weather leaves radar exact");

        state.weather.current = WeatherType::IonStorm;
        state.weather.previous = WeatherType::IonStorm;
        let stormy = snapshot(&world, &state);
        let moved = stormy
            .radar
            .entities
            .iter()
            .zip(calm.radar.entities.iter())
            .filter(|(a, b)| a.position != b.position)
            .count();
        assert!(moved > 0, "ion storm jitters radar positions");
    }

    #[test]
    fn test_counts_track_entities() {
        let (world, state) = setup();
        let snap = snapshot(&world, &state);
        assert_eq!(snap.counts.tanks, world.query::<&TankBody>().iter().count());
        assert_eq!(snap.counts.projectiles, 0);
    }
}
