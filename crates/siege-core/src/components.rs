//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// How a tank entered the match. Decides whether it comes back after death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnOrigin {
    Player,
    /// Initial roster tank.
    Roster,
    /// Respawned roster tank.
    Reinforcement,
    /// Spawned at a guardian point (index into the guardian table).
    Guardian(usize),
    /// Spawned by a lockdown zone event (index into the zone table).
    Zone(usize),
}

/// Core identity and orientation of a tank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankBody {
    pub faction: Faction,
    pub class: TankClass,
    /// Display name used by the kill feed.
    pub name: String,
    pub radius: f64,
    /// Top speed before modifiers (px/s).
    pub base_speed: f64,
    pub is_player: bool,
    /// Hull heading (radians).
    pub heading: f64,
    /// Turret heading (radians).
    pub turret_heading: f64,
    pub origin: SpawnOrigin,
}

/// Hit points. `dead` flips exactly once, in the damage path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
    pub max_hp: f64,
    pub dead: bool,
    /// Match time of the last damage taken.
    pub last_damaged_at: f64,
    /// Match time of the last hit dealt by the player, for assists.
    pub player_hit_at: Option<f64>,
}

/// Primary weapon, heat and secondary ordnance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weaponry {
    pub weapon: WeaponType,
    /// Seconds until the next trigger pull is accepted.
    pub cooldown: f64,
    pub heat: f64,
    pub overheated: bool,
    /// Trigger state on the previous tick, for press detection.
    pub trigger_held: bool,
    /// Shots left in the current burst.
    pub burst_remaining: u32,
    pub burst_timer: f64,
    pub missile_ammo: u32,
    /// Seconds until the next missile round reloads.
    pub missile_reload: f64,
    /// Seconds until another missile may launch.
    pub missile_cooldown: f64,
    pub mine_cooldown: f64,
}

/// Skill cooldowns (seconds remaining).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skills {
    pub dash: f64,
    pub emp: f64,
    pub rage: f64,
    pub turbo: f64,
    pub shield: f64,
}

/// Active buff durations (seconds remaining) and permanent upgrades.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub rage: f64,
    pub shield: f64,
    pub turbo: f64,
    pub perm_fire: bool,
    pub perm_speed: bool,
    /// Faction-wide burning core, mirrored from the faction buff table.
    pub buff_red: f64,
    /// Faction-wide overdrive, mirrored from the faction buff table.
    pub buff_blue: f64,
}

/// Who dealt a piece of damage. Carried by projectiles and hazards so
/// credit survives the attacker's death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    pub id: Option<EntityId>,
    pub faction: Faction,
    pub name: String,
    pub is_player: bool,
}

/// Timed debuffs plus stealth and aggro.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub burn: f64,
    /// Credit for burn damage ticks.
    pub burn_source: Option<Attacker>,
    pub freeze: f64,
    pub silence: f64,
    pub blind: f64,
    /// While positive, new freeze/silence/blind applications are ignored.
    pub cc_immunity: f64,
    pub stealth: f64,
    pub aggro: f64,
    pub aggro_target: Option<EntityId>,
}

/// Class special timer (FREEZER, FLASHER, SMOKE, BOMBER).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub cooldown: f64,
}

/// Decoded control intent for one tick. Written by the player latch or the
/// AI system, consumed by movement and combat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intent {
    /// Desired movement direction (not normalized).
    pub move_x: f64,
    pub move_y: f64,
    /// Desired turret angle (radians).
    pub aim: f64,
    pub fire: bool,
    pub fire_missile: bool,
    pub drop_mine: bool,
    pub dash: bool,
    pub emp: bool,
    pub rage: bool,
    pub turbo: bool,
    pub shield: bool,
    pub switch_weapon: Option<WeaponType>,
}

/// AI memory record, owned by its tank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiMemory {
    pub state: AiState,
    /// Seconds spent in the current state.
    pub state_timer: f64,
    pub target: Option<EntityId>,
    pub last_known_target: Option<Position>,
    /// Seconds left before the last known position is forgotten.
    pub memory_timer: f64,
    /// +1 or -1.
    pub strafe_dir: f64,
    pub strafe_timer: f64,
    /// Position sampled at the last stuck check.
    pub stuck_pos: Position,
    pub stuck_timer: f64,
    pub exploration_timer: f64,
    pub patrol_index: usize,
}

/// Objective defenders stay leashed to an anchor point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub anchor: Position,
    pub leash_radius: f64,
}

/// Per-tank match statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scorecard {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

/// Marker for the player-controlled tank.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Projectile in flight (or a placed mine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub attacker: Attacker,
    /// Fired by a base turret rather than a tank.
    pub from_base: bool,
    pub weapon: WeaponType,
    pub damage: f64,
    pub radius: f64,
    /// Seconds left before expiry.
    pub life: f64,
    pub splash_radius: f64,
    /// Applies burn on hit.
    pub burn: bool,
    pub homing: bool,
}

/// Damaging area attached to a particle (smoke cloud).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub attacker: Attacker,
    pub damage: f64,
    pub radius: f64,
    pub pulse: f64,
    pub pulse_timer: f64,
}

/// Short-lived visual. Only hazards affect gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub life: f64,
    pub max_life: f64,
    pub size: f64,
    pub hazard: Option<Hazard>,
}

/// Ground mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decal {
    pub kind: DecalKind,
    pub life: f64,
    pub max_life: f64,
    pub scale: f64,
    pub rotation: f64,
}

/// Where a health pack came from; global packs count toward the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackSource {
    Global,
    Base(Faction),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPack {
    pub value: f64,
    pub source: PackSource,
}
