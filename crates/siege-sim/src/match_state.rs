//! Global match state: everything that is not an entity.
//!
//! One `MatchState` per match, created with the engine and replaced
//! wholesale on restart.

use hecs::Entity;

use siege_core::config::ValidatedConfig;
use siege_core::constants::*;
use siege_core::enums::{Faction, GameOverPhase, RespawnPhase, TankClass, WeaponType};
use siege_core::state::{BaseStats, GameOverState, GameResult, HubStats, RespawnState};
use siege_core::types::Position;

use crate::feed::{AlertSlot, KillFeed};
use crate::systems::weather::WeatherState;

/// Faction-wide guardian buffs (seconds remaining).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FactionBuff {
    pub red: f64,
    pub blue: f64,
}

/// A guardian spawn point.
#[derive(Debug, Clone)]
pub struct GuardianPoint {
    pub tile: (i32, i32),
    /// Match time of the next spawn; `None` while a guardian is alive.
    pub next_spawn_at: Option<f64>,
}

/// A dead roster tank waiting to return at its base.
#[derive(Debug, Clone)]
pub struct PendingReinforcement {
    pub faction: Faction,
    pub class: TankClass,
    pub weapon: WeaponType,
    pub name: String,
    pub due_at: f64,
}

/// Timers for everything the spawner introduces mid-match.
#[derive(Debug, Clone)]
pub struct SpawnSchedule {
    pub guardians: Vec<GuardianPoint>,
    pub elites_spawned: bool,
    pub bosses_spawned: bool,
    pub next_global_pack: f64,
    pub next_base_pack: f64,
    pub reinforcements: Vec<PendingReinforcement>,
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        Self {
            guardians: GUARDIAN_SPAWN_TILES
                .iter()
                .map(|&tile| GuardianPoint {
                    tile,
                    next_spawn_at: Some(GUARDIAN_SPAWN_INITIAL),
                })
                .collect(),
            elites_spawned: false,
            bosses_spawned: false,
            next_global_pack: HEALTH_PACK_SPAWN_GLOBAL,
            next_base_pack: HEALTH_PACK_SPAWN_BASE,
            reinforcements: Vec::new(),
        }
    }
}

/// All global match state.
#[derive(Debug)]
pub struct MatchState {
    /// In `Faction::PLAYABLE` order.
    pub bases: Vec<BaseStats>,
    pub hub: HubStats,
    pub weather: WeatherState,
    pub feed: KillFeed,
    pub alert: AlertSlot,
    pub respawn: RespawnState,
    pub game_over: GameOverState,
    pub result: Option<GameResult>,
    /// In `Faction::PLAYABLE` order.
    pub faction_buffs: [FactionBuff; 4],
    pub spawner: SpawnSchedule,
    /// Match clock; stops at game over.
    pub match_time: f64,
    pub player: Option<Entity>,
    /// Name of the player's last killer; cleared on respawn.
    pub player_killer: Option<String>,
    pub player_weapon: WeaponType,
    pub viewport: (f64, f64),
}

impl MatchState {
    pub fn new(config: &ValidatedConfig) -> Self {
        let bases = Faction::PLAYABLE
            .iter()
            .zip(BASE_TILES)
            .map(|(&faction, (tx, ty))| BaseStats {
                faction,
                position: Position::from_tile(tx, ty),
                hp: HP_BASE,
                max_hp: HP_BASE,
                active: true,
                turret_cooldown: BASE_TURRET_CD,
                turret_angle: 0.0,
            })
            .collect();

        Self {
            bases,
            hub: HubStats::new(Position::from_tile(HUB_TILE.0, HUB_TILE.1)),
            weather: WeatherState::default(),
            feed: KillFeed::default(),
            alert: AlertSlot::default(),
            respawn: RespawnState::default(),
            game_over: GameOverState::default(),
            result: None,
            faction_buffs: [FactionBuff::default(); 4],
            spawner: SpawnSchedule::default(),
            match_time: 0.0,
            player: None,
            player_killer: None,
            player_weapon: config.player_weapon,
            viewport: config.viewport,
        }
    }

    pub fn base(&self, faction: Faction) -> Option<&BaseStats> {
        self.bases.iter().find(|b| b.faction == faction)
    }

    pub fn base_mut(&mut self, faction: Faction) -> Option<&mut BaseStats> {
        self.bases.iter_mut().find(|b| b.faction == faction)
    }

    /// Guardian buffs held by a faction. Neutral holds none.
    pub fn buff(&self, faction: Faction) -> FactionBuff {
        faction_index(faction).map_or_else(FactionBuff::default, |i| self.faction_buffs[i])
    }

    pub fn buff_mut(&mut self, faction: Faction) -> Option<&mut FactionBuff> {
        faction_index(faction).map(|i| &mut self.faction_buffs[i])
    }

    /// Whether the player is between death and ACTIVATION. Damage the player
    /// left behind (shells in flight, mines, burns) is void meanwhile.
    pub fn player_disarmed(&self) -> bool {
        matches!(
            self.respawn.phase,
            RespawnPhase::DeathCam | RespawnPhase::FadeOut | RespawnPhase::Omen | RespawnPhase::Materialize
        )
    }

    /// Whether the game-over sequence has started.
    pub fn is_over(&self) -> bool {
        self.game_over.phase != GameOverPhase::None
    }
}

/// Index of a base-owning faction in `Faction::PLAYABLE`.
pub fn faction_index(faction: Faction) -> Option<usize> {
    Faction::PLAYABLE.iter().position(|f| *f == faction)
}
