//! Match state records and the snapshot handed to the outer loop each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{KillFeedEntry, SimEvent, TacticalAlert};
use crate::types::{Position, Rect, SimTime};

/// Faction base structure. Deactivated at hp 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStats {
    pub faction: Faction,
    pub position: Position,
    pub hp: f64,
    pub max_hp: f64,
    pub active: bool,
    pub turret_cooldown: f64,
    pub turret_angle: f64,
}

/// Central hub objective. Written only by the hub controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubStats {
    pub position: Position,
    pub owner: Faction,
    /// Faction the current progress belongs to.
    pub capturing: Faction,
    /// 0..=100.
    pub progress: f64,
    /// Seconds until the next owner repair pulse.
    pub repair_timer: f64,
    pub state: HubState,
}

impl HubStats {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            owner: Faction::Neutral,
            capturing: Faction::Neutral,
            progress: 0.0,
            repair_timer: 0.0,
            state: HubState::Neutral,
        }
    }
}

/// Player respawn sequencer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RespawnState {
    pub phase: RespawnPhase,
    /// Seconds spent in the current phase.
    pub elapsed: f64,
}

/// Match conclusion sequencer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameOverState {
    pub phase: GameOverPhase,
    pub elapsed: f64,
}

/// Final match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Faction,
    pub victory: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub time_survived: f64,
    pub bases_destroyed: u32,
    pub rating: Rating,
}

/// Complete visible state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Match clock (seconds). Stops at game over.
    pub match_time: f64,
    pub remaining: f64,
    pub weather: WeatherView,
    pub player: PlayerView,
    pub bases: Vec<BaseStats>,
    pub hub: Option<HubStats>,
    pub radar: RadarView,
    pub kill_feed: Vec<KillFeedEntry>,
    pub alert: Option<TacticalAlert>,
    pub respawn: RespawnState,
    pub game_over: GameOverState,
    pub result: Option<GameResult>,
    pub counts: EntityCounts,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherView {
    pub current: WeatherType,
    /// Seconds until the next weather change.
    pub next_change_in: f64,
    /// 0..1 blend from the previous weather's modifiers.
    pub blend: f64,
    pub visibility: f64,
}

/// Player HUD data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub heading: f64,
    pub turret_heading: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub heat: f64,
    pub overheated: bool,
    pub weapon: WeaponType,
    pub missile_ammo: u32,
    pub missile_reload: f64,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub cooldowns: SkillCooldowns,
    pub buffs: BuffFlags,
    pub status: StatusFlags,
    pub dead: bool,
    /// In the READY phase, waiting for respawn input.
    pub awaiting_respawn: bool,
    /// Who destroyed the player, until the player respawns.
    pub killer_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillCooldowns {
    pub dash: f64,
    pub emp: f64,
    pub rage: f64,
    pub turbo: f64,
    pub shield: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffFlags {
    pub rage: bool,
    pub shield: bool,
    pub turbo: bool,
    pub perm_fire: bool,
    pub perm_speed: bool,
    pub buff_red: bool,
    pub buff_blue: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusFlags {
    pub burning: bool,
    pub frozen: bool,
    pub silenced: bool,
    pub blinded: bool,
    pub stealthed: bool,
}

/// Minimap contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarView {
    pub entities: Vec<RadarBlip>,
    /// World-space camera rectangle centered on the player.
    pub camera: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarBlip {
    pub position: Position,
    pub faction: Faction,
    pub category: RadarCategory,
    pub is_player: bool,
}

/// Live entity counts by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCounts {
    pub tanks: usize,
    pub projectiles: usize,
    pub particles: usize,
    pub decals: usize,
    pub health_packs: usize,
}
