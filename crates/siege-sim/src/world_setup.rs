//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player, the faction rosters and mid-match arrivals with
//! the full tank component bundle.

use hecs::{Entity, EntityBuilder, World};

use siege_core::components::*;
use siege_core::config::{class_stats, ResolvedRosterEntry, ValidatedConfig};
use siege_core::constants::*;
use siege_core::enums::{Faction, TankClass, WeaponType};
use siege_core::types::{Position, Velocity};

use crate::match_state::MatchState;

/// Spawn the player and every roster tank for a fresh match.
pub fn setup_match(world: &mut World, state: &mut MatchState, config: &ValidatedConfig) {
    let player = spawn_player(world, config.player_weapon);
    state.player = Some(player);
    spawn_roster(world, &config.roster);
}

/// Staging position for the `slot`-th tank of a faction: rows of three
/// in front of its base, facing the hub.
pub fn spawn_point(faction: Faction, slot: usize) -> Position {
    let Some((bx, by)) = Faction::PLAYABLE
        .iter()
        .position(|f| *f == faction)
        .map(|i| BASE_TILES[i])
    else {
        return Position::from_tile(HUB_TILE.0, HUB_TILE.1);
    };
    let dx = (HUB_TILE.0 - bx).signum();
    let dy = (HUB_TILE.1 - by).signum();
    let lateral = (slot % 3) as i32 - 1;
    let depth = 2 + (slot / 3) as i32;
    Position::from_tile(bx + dx * depth - dy * lateral, by + dy * depth + dx * lateral)
}

/// Spawn the player's tank at the first staging slot of its base.
pub fn spawn_player(world: &mut World, weapon: WeaponType) -> Entity {
    let position = spawn_point(PLAYER_FACTION, 0);
    let player = spawn_tank(
        world,
        PLAYER_FACTION,
        TankClass::Normal,
        weapon,
        position,
        "PLAYER".to_string(),
        SpawnOrigin::Player,
    );
    tracing::debug!(x = position.x, y = position.y, weapon = ?weapon, "player spawned");
    player
}

/// Spawn every roster tank. Names run `<FACTION>-<n>` per faction.
pub fn spawn_roster(world: &mut World, roster: &[ResolvedRosterEntry]) {
    // The player holds slot 0 of its own faction.
    let mut slots = [0usize; 4];
    if let Some(i) = Faction::PLAYABLE.iter().position(|f| *f == PLAYER_FACTION) {
        slots[i] = 1;
    }
    let mut numbers = [0u32; 4];

    for entry in roster {
        let Some(i) = Faction::PLAYABLE.iter().position(|f| *f == entry.faction) else {
            continue;
        };
        for _ in 0..entry.count {
            numbers[i] += 1;
            spawn_tank(
                world,
                entry.faction,
                entry.class,
                entry.weapon,
                spawn_point(entry.faction, slots[i]),
                format!("{}-{}", entry.faction.name(), numbers[i]),
                SpawnOrigin::Roster,
            );
            slots[i] += 1;
        }
    }
}

/// Spawn one tank with the full component bundle. AI tanks get a memory
/// record, the player gets the `Player` marker and player hit points.
pub fn spawn_tank(
    world: &mut World,
    faction: Faction,
    class: TankClass,
    weapon: WeaponType,
    position: Position,
    name: String,
    origin: SpawnOrigin,
) -> Entity {
    let stats = class_stats(class);
    let is_player = origin == SpawnOrigin::Player;
    let max_hp = if is_player { HP_PLAYER } else { stats.max_hp };

    let mut builder = EntityBuilder::new();
    builder
        .add(position)
        .add(Velocity::default())
        .add(TankBody {
            faction,
            class,
            name,
            radius: stats.radius,
            base_speed: stats.base_speed,
            is_player,
            heading: 0.0,
            turret_heading: 0.0,
            origin,
        })
        .add(Health {
            hp: max_hp,
            max_hp,
            dead: false,
            last_damaged_at: 0.0,
            player_hit_at: None,
        })
        .add(Weaponry {
            weapon,
            cooldown: 0.0,
            heat: 0.0,
            overheated: false,
            trigger_held: false,
            burst_remaining: 0,
            burst_timer: 0.0,
            missile_ammo: MISSILE_MAX_AMMO,
            missile_reload: 0.0,
            missile_cooldown: 0.0,
            mine_cooldown: 0.0,
        })
        .add(Skills::default())
        .add(Buffs::default())
        .add(StatusEffects::default())
        .add(SpecialAbility::default())
        .add(Intent::default())
        .add(Scorecard::default());

    if is_player {
        builder.add(Player);
    } else {
        builder.add(AiMemory {
            strafe_dir: 1.0,
            stuck_pos: position,
            ..AiMemory::default()
        });
    }
    world.spawn(builder.build())
}

/// Spawn a neutral objective defender leashed to `anchor`.
pub fn spawn_defender(
    world: &mut World,
    class: TankClass,
    anchor: Position,
    leash_radius: f64,
    name: String,
    origin: SpawnOrigin,
) -> Entity {
    let entity = spawn_tank(
        world,
        Faction::Neutral,
        class,
        class_stats(class).weapon,
        anchor,
        name,
        origin,
    );
    let _ = world.insert_one(entity, Objective { anchor, leash_radius });
    entity
}
