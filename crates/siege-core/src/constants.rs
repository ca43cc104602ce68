//! Simulation constants and tuning parameters.

use crate::enums::{Faction, TankClass};

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 40.0;

/// Map width in tiles.
pub const MAP_WIDTH: usize = 120;

/// Map height in tiles.
pub const MAP_HEIGHT: usize = 80;

pub const WORLD_WIDTH: f64 = MAP_WIDTH as f64 * TILE_SIZE;
pub const WORLD_HEIGHT: f64 = MAP_HEIGHT as f64 * TILE_SIZE;

/// Hits a destructible wall tile absorbs before it collapses.
pub const WALL_INTEGRITY: u8 = 3;

/// Base tile positions: (tile x, tile y).
pub const BASE_TILES: [(i32, i32); 4] = [(60, 10), (60, 70), (10, 40), (110, 40)];

/// Hub tile position.
pub const HUB_TILE: (i32, i32) = (60, 40);

/// Guardian spawn tiles: top-left, top-right, bottom-left, bottom-right.
pub const GUARDIAN_SPAWN_TILES: [(i32, i32); 4] = [(10, 10), (110, 10), (10, 70), (110, 70)];

/// AI patrol rotation (tiles).
pub const AI_PATROL_TILES: [(i32, i32); 4] = [(60, 25), (80, 30), (40, 30), (60, 40)];

// --- Match ---

/// Faction of the player-controlled tank.
pub const PLAYER_FACTION: Faction = Faction::Blue;

/// Match duration in seconds.
pub const MATCH_DURATION: f64 = 480.0;

/// Default camera viewport for radar (px).
pub const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 720.0);

// --- Weather ---

/// Hold duration of each weather state (seconds).
pub const WEATHER_DURATION: f64 = 120.0;

/// Modifier blend window at the start of each weather state (seconds).
pub const WEATHER_TRANSITION: f64 = 5.0;

/// Friction multiplier under freeze weather.
pub const FREEZE_WEATHER_FRICTION_MULT: f64 = 1.04;

/// Heat dissipation multiplier under freeze weather.
pub const FREEZE_WEATHER_HEAT_MULT: f64 = 0.7;

pub const ION_STORM_VISIBILITY: f64 = 0.75;
pub const THUNDERSTORM_VISIBILITY: f64 = 0.85;

/// Radar position jitter amplitude during ion storms (px).
pub const ION_STORM_RADAR_JITTER: f64 = 80.0;

// --- Physics ---

/// Acceleration = base speed × modifiers × this factor (per second).
pub const ACCEL_FACTOR: f64 = 6.0;

pub const FRICTION: f64 = 0.92;
pub const ICE_FRICTION: f64 = 0.98;
pub const RAIN_FRICTION: f64 = 0.6;
pub const WATER_FRICTION: f64 = 0.85;
pub const SNOW_FRICTION: f64 = 0.88;

/// Upper bound on any friction coefficient after weather scaling.
pub const MAX_FRICTION: f64 = 0.99;

pub const SPEED_MOD_TURBO: f64 = 1.15;
pub const SPEED_MOD_RAGE: f64 = 1.3;
pub const SPEED_MOD_PERM_SPEED: f64 = 1.5;
pub const SPEED_MOD_BUFF_BLUE: f64 = 1.5;
pub const SPEED_MOD_ICE_PLATE: f64 = 1.25;
pub const SPEED_MOD_SNOW_DRIFT: f64 = 0.85;
pub const SPEED_MOD_FOREST: f64 = 1.3;
pub const SPEED_MOD_WATER: f64 = 0.7;

/// Speed multiplier while frozen.
pub const FREEZER_SLOW: f64 = 0.5;

/// Turn rate for hull and turret (rad/s).
pub const ROTATION_SPEED: f64 = 4.0;

// --- Hit points ---

pub const HP_BASE: f64 = 3750.0;
pub const HP_OVERLORD: f64 = 10_000.0;
pub const HP_BOSS: f64 = 1875.0;
pub const HP_GUARDIAN: f64 = 3750.0;
pub const HP_PLAYER: f64 = 1250.0;
pub const HP_MOB: f64 = 125.0;
pub const HP_ELITE: f64 = 170.0;

pub const TANK_RADIUS: f64 = 18.0;
pub const HEAVY_RADIUS: f64 = 26.0;
pub const OVERLORD_RADIUS: f64 = 34.0;

/// Base structure collision radius (3×3 tiles).
pub const BASE_RADIUS: f64 = 60.0;

// --- Weapons ---

/// Cannon splash radius (base 60 increased by 25%).
pub const CANNON_SPLASH_RADIUS: f64 = 60.0 * 1.25;

/// Delay between shots within a burst (seconds).
pub const BURST_INTERVAL: f64 = 0.05;

pub const PROJECTILE_RADIUS: f64 = 5.0;

pub const MISSILE_DAMAGE: f64 = 135.0;
pub const MISSILE_SPEED: f64 = 300.0;
pub const MISSILE_MAX_AMMO: u32 = 3;
pub const MISSILE_RELOAD_TIME: f64 = 5.0;
pub const MISSILE_LIFE: f64 = 4.0;
pub const MISSILE_TURN_RATE: f64 = 3.0;
pub const MISSILE_SEEK_RANGE: f64 = 600.0;

pub const MINE_LIFE: f64 = 20.0;
pub const MINE_TRIGGER_RADIUS: f64 = 40.0;

// --- Heat ---

pub const HEAT_MAX: f64 = 100.0;

/// Heat dissipated per second.
pub const HEAT_DISSIPATION: f64 = 30.0;

/// Dissipation multiplier while frozen.
pub const HEAT_DISSIPATION_FREEZE_MOD: f64 = 0.7;

/// Heat added by a machine-gun trigger pull while overheated.
pub const MG_LOCK_PENALTY: f64 = 3.0;

/// Overheat clears once heat drops below HEAT_MAX minus this margin.
pub const OVERHEAT_HYSTERESIS: f64 = 15.0;

// --- Skills ---

pub const DASH_CD: f64 = 10.0;
pub const DASH_IMPULSE: f64 = 900.0;
pub const EMP_CD: f64 = 15.0;
pub const EMP_RADIUS: f64 = 300.0;
pub const EMP_SILENCE: f64 = 3.0;
pub const RAGE_CD: f64 = 180.0;
pub const RAGE_DURATION: f64 = 10.0;
pub const RAGE_DAMAGE_MULT: f64 = 1.5;
pub const TURBO_CD: f64 = 3.0;
pub const TURBO_DURATION: f64 = 10.0;
pub const SHIELD_CD: f64 = 8.0;
pub const SHIELD_DURATION: f64 = 2.0;

// --- Status effects ---

pub const BURN_DURATION: f64 = 3.0;
pub const BURN_DPS: f64 = 15.0;
pub const FREEZE_AURA_DURATION: f64 = 1.0;
pub const BLIND_DURATION: f64 = 2.0;
pub const CC_IMMUNITY_DURATION: f64 = 1.5;

// --- Class specials ---

pub const AURA_RADIUS: f64 = 250.0;
pub const FLASHER_CD: f64 = 8.0;

/// Seconds between frost decals left by a FREEZER aura.
pub const FROST_DECAL_INTERVAL: f64 = 1.0;

pub const SMOKE_CD: f64 = 6.0;
pub const SMOKE_CLOUD_RADIUS: f64 = 90.0;
pub const SMOKE_CLOUD_LIFE: f64 = 4.0;
/// Smoke damage per hazard pulse.
pub const SMOKE_DAMAGE: f64 = 2.0;
/// Seconds between smoke hazard pulses.
pub const SMOKE_PULSE: f64 = 0.1;
pub const STEALTH_DURATION: f64 = 3.0;

pub const BOMBER_TRIGGER_RANGE: f64 = 90.0;
pub const BOMBER_DAMAGE: f64 = 120.0;
pub const BOMBER_SPLASH_RADIUS: f64 = 110.0;
pub const BOMBER_CD: f64 = 4.0;

pub const AGGRO_DURATION: f64 = 5.0;

// --- Hub ---

pub const HUB_RADIUS: f64 = 150.0;
pub const HUB_CAPTURE_RATE: f64 = 10.0;
pub const HUB_DECAY_RATE: f64 = 5.0;
pub const HUB_BUFF_REPAIR: f64 = 50.0;
pub const HUB_BUFF_REPAIR_INTERVAL: f64 = 10.0;
pub const HUB_BUFF_RELOAD_MOD: f64 = 0.75;
pub const HUB_MAX_PROGRESS: f64 = 100.0;

// --- Guardians and lockdown zones ---

pub const GUARDIAN_SPAWN_INITIAL: f64 = 60.0;
pub const GUARDIAN_RESPAWN_DELAY: f64 = 120.0;

pub const ZONE_ELITE_TIME: f64 = 60.0;
pub const ZONE_BOSS_TIME: f64 = 200.0;

/// Guardian class per spawn point, alternating red/blue around the map.
pub const GUARDIAN_CLASSES: [TankClass; 4] = [
    TankClass::GuardianRed,
    TankClass::GuardianBlue,
    TankClass::GuardianBlue,
    TankClass::GuardianRed,
];

/// Guardian leash radius (px).
pub const GUARDIAN_LEASH: f64 = 6.0 * TILE_SIZE;

/// Elite buff zones: (tile, class, leash radius px).
pub const ELITE_ZONES: [((i32, i32), TankClass, f64); 4] = [
    ((50, 20), TankClass::Smoke, 6.0 * TILE_SIZE),
    ((70, 60), TankClass::Bomber, 6.0 * TILE_SIZE),
    ((30, 40), TankClass::Freezer, 6.0 * TILE_SIZE),
    ((90, 40), TankClass::Flasher, 6.0 * TILE_SIZE),
];

/// Boss zones: (tile, class, leash radius px).
pub const BOSS_ZONES: [((i32, i32), TankClass, f64); 5] = [
    ((20, 20), TankClass::BossRed, 8.0 * TILE_SIZE),
    ((100, 20), TankClass::BossBlue, 8.0 * TILE_SIZE),
    ((20, 60), TankClass::BossBlue, 8.0 * TILE_SIZE),
    ((100, 60), TankClass::BossRed, 8.0 * TILE_SIZE),
    ((60, 40), TankClass::BossOverlord, 10.0 * TILE_SIZE),
];

// --- Bases ---

pub const BASE_TURRET_RANGE: f64 = 520.0;
pub const BASE_TURRET_CD: f64 = 1.2;
pub const BASE_TURRET_DAMAGE: f64 = 30.0;

// --- Health packs ---

pub const HEALTH_PACK_VALUE: f64 = 250.0;
pub const HEALTH_PACK_RADIUS: f64 = 25.0;
pub const HEALTH_PACK_SPAWN_GLOBAL: f64 = 45.0;
pub const HEALTH_PACK_SPAWN_BASE: f64 = 60.0;
pub const HEALTH_PACK_MAX_GLOBAL: usize = 5;

// --- Player ---

/// Seconds without damage before regeneration starts.
pub const PLAYER_REGEN_DELAY: f64 = 3.0;

/// Regeneration per second.
pub const PLAYER_REGEN_AMOUNT: f64 = 50.0;

/// Window in which a player hit counts toward an assist (seconds).
pub const ASSIST_WINDOW: f64 = 5.0;

// --- Reinforcements ---

pub const REINFORCEMENT_DELAY: f64 = 8.0;

// --- AI ---

pub const AI_DETECTION_RANGE: f64 = 700.0;
pub const AI_LOW_HEALTH: f64 = 0.3;
pub const AI_SURVIVAL_EXIT: f64 = 0.6;
pub const AI_HEAL_SEARCH_RADIUS: f64 = 450.0;
pub const AI_MEMORY_DECAY: f64 = 5.0;
pub const AI_STUCK_CHECK_INTERVAL: f64 = 1.0;
pub const AI_STUCK_EPSILON: f64 = 6.0;
pub const AI_STUCK_RECOVERY: f64 = 1.2;
pub const AI_EXPLORATION_TIMEOUT: f64 = 15.0;
pub const AI_ARRIVAL_RADIUS: f64 = 80.0;
pub const AI_STRAFE_MIN: f64 = 1.5;
pub const AI_STRAFE_MAX: f64 = 3.0;
pub const AI_AIM_TOLERANCE: f64 = 0.3;

// --- Respawn sequence (seconds) ---

pub const RESPAWN_DEATH_CAM: f64 = 1.5;
pub const RESPAWN_FADE_OUT: f64 = 0.3;
pub const RESPAWN_OMEN: f64 = 0.8;
pub const RESPAWN_MATERIALIZE: f64 = 1.2;
pub const RESPAWN_ACTIVATION: f64 = 0.5;
pub const RESPAWN_READY: f64 = 0.5;

// --- Game-over sequence (seconds) ---

pub const GAME_OVER_SLOW_MOTION: f64 = 2.0;
pub const GAME_OVER_ANIMATION: f64 = 1.5;
pub const GAME_OVER_TEXT_REVEAL: f64 = 1.5;
pub const GAME_OVER_STATS: f64 = 2.0;

// --- Feed and alerts ---

pub const KILL_FEED_CAPACITY: usize = 6;
pub const KILL_FEED_DISPLAY: f64 = 5.0;
pub const ALERT_DISPLAY: f64 = 4.0;

// --- Visual entities ---

pub const MAX_PARTICLES: usize = 400;
pub const MAX_DECALS: usize = 120;
pub const DECAL_LIFE: f64 = 20.0;
