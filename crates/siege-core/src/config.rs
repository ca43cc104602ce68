//! Static class and weapon tables plus match configuration.
//!
//! Tank classes and weapons are data: systems look up these tables and
//! branch on the enum where behavior differs. Roster entries arrive as
//! string/numeric ids and are validated once, before a match starts.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{Faction, TankClass, WeaponType};

/// Per-class physical and combat parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStats {
    /// Base top speed (px/s) before modifiers.
    pub base_speed: f64,
    pub max_hp: f64,
    pub radius: f64,
    /// Default primary weapon.
    pub weapon: WeaponType,
    /// Ignores freeze, silence and blind.
    pub cc_immune: bool,
    /// Fires missiles when it has ammo.
    pub uses_missiles: bool,
}

/// Per-weapon firing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub damage: f64,
    /// Seconds between trigger pulls.
    pub fire_delay: f64,
    /// Heat added per shot.
    pub heat: f64,
    /// Projectile speed (px/s). Zero for instant or stationary weapons.
    pub speed: f64,
    /// Effective range (px).
    pub range: f64,
    /// Shots per trigger pull.
    pub burst: u32,
    /// Splash radius, zero for single-target weapons.
    pub splash_radius: f64,
    /// Resolved as an instant ray rather than a projectile.
    pub instant: bool,
}

/// Look up the class table.
pub fn class_stats(class: TankClass) -> ClassStats {
    let base = ClassStats {
        base_speed: 910.0,
        max_hp: HP_MOB,
        radius: TANK_RADIUS,
        weapon: WeaponType::Cannon,
        cc_immune: false,
        uses_missiles: false,
    };
    match class {
        TankClass::Normal => base,
        TankClass::Flasher => ClassStats {
            base_speed: 975.0,
            max_hp: HP_ELITE,
            weapon: WeaponType::Laser,
            ..base
        },
        TankClass::Freezer => ClassStats {
            base_speed: 845.0,
            max_hp: HP_ELITE,
            weapon: WeaponType::MachineGun,
            ..base
        },
        TankClass::Smoke => ClassStats {
            base_speed: 780.0,
            max_hp: HP_ELITE,
            ..base
        },
        TankClass::Bomber => ClassStats {
            base_speed: 650.0,
            max_hp: HP_ELITE,
            ..base
        },
        TankClass::BossOverlord => ClassStats {
            base_speed: 715.0,
            max_hp: HP_OVERLORD,
            radius: OVERLORD_RADIUS,
            cc_immune: true,
            uses_missiles: true,
            ..base
        },
        TankClass::BossRed => ClassStats {
            base_speed: 585.0,
            max_hp: HP_BOSS,
            radius: HEAVY_RADIUS,
            cc_immune: true,
            uses_missiles: true,
            ..base
        },
        TankClass::BossBlue => ClassStats {
            base_speed: 1040.0,
            max_hp: HP_BOSS,
            radius: HEAVY_RADIUS,
            weapon: WeaponType::MachineGun,
            cc_immune: true,
            uses_missiles: true,
            ..base
        },
        TankClass::GuardianRed => ClassStats {
            base_speed: 650.0,
            max_hp: HP_GUARDIAN,
            radius: HEAVY_RADIUS,
            cc_immune: true,
            ..base
        },
        TankClass::GuardianBlue => ClassStats {
            base_speed: 650.0,
            max_hp: HP_GUARDIAN,
            radius: HEAVY_RADIUS,
            weapon: WeaponType::Laser,
            cc_immune: true,
            ..base
        },
    }
}

/// Look up the weapon table.
pub fn weapon_stats(weapon: WeaponType) -> WeaponStats {
    match weapon {
        WeaponType::Cannon => WeaponStats {
            damage: 42.0,
            fire_delay: 0.21,
            heat: 13.5,
            speed: 600.0,
            range: 800.0,
            burst: 1,
            splash_radius: CANNON_SPLASH_RADIUS,
            instant: false,
        },
        WeaponType::Laser => WeaponStats {
            damage: 40.0,
            fire_delay: 0.273,
            heat: 13.5,
            speed: 0.0,
            range: 880.0,
            burst: 1,
            splash_radius: 0.0,
            instant: true,
        },
        WeaponType::MachineGun => WeaponStats {
            damage: 18.75,
            fire_delay: 0.069,
            heat: 9.0,
            speed: 900.0,
            range: 480.0,
            burst: 3,
            splash_radius: 0.0,
            instant: false,
        },
        WeaponType::Missile => WeaponStats {
            damage: MISSILE_DAMAGE,
            fire_delay: 0.5,
            heat: 0.0,
            speed: MISSILE_SPEED,
            range: MISSILE_SPEED * MISSILE_LIFE,
            burst: 1,
            splash_radius: 0.0,
            instant: false,
        },
        WeaponType::Mine => WeaponStats {
            damage: 135.0,
            fire_delay: 3.15,
            heat: 0.0,
            speed: 0.0,
            range: 0.0,
            burst: 1,
            splash_radius: 0.0,
            instant: false,
        },
    }
}

/// One roster line: `count` tanks of `class` for `faction`.
/// Class and weapon are ids, resolved by [`MatchConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub faction: Faction,
    pub class: String,
    /// Weapon id override; `None` uses the class default.
    pub weapon: Option<u8>,
    pub count: u32,
}

/// A roster line after id resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRosterEntry {
    pub faction: Faction,
    pub class: TankClass,
    pub weapon: WeaponType,
    pub count: u32,
}

/// Configuration for starting a new match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed + same inputs = same match.
    pub seed: u64,
    /// Initial time scale (1.0 = normal), used by the real-time runner.
    pub time_scale: f64,
    /// AI tanks spawned at match start. The player is always added.
    pub roster: Vec<RosterEntry>,
    /// Camera viewport for radar (width, height in px).
    pub viewport: (f64, f64),
    /// Player weapon id at spawn.
    pub player_weapon: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let entry = |faction, class: &str, count| RosterEntry {
            faction,
            class: class.to_string(),
            weapon: None,
            count,
        };
        Self {
            seed: 42,
            time_scale: 1.0,
            roster: vec![
                entry(Faction::Blue, "NORMAL", 2),
                entry(Faction::Blue, "FREEZER", 1),
                entry(Faction::Red, "NORMAL", 2),
                entry(Faction::Red, "BOMBER", 1),
                entry(Faction::Red, "FLASHER", 1),
                entry(Faction::Green, "NORMAL", 3),
                entry(Faction::Green, "SMOKE", 1),
                entry(Faction::Purple, "NORMAL", 2),
                entry(Faction::Purple, "FREEZER", 1),
                entry(Faction::Purple, "FLASHER", 1),
            ],
            viewport: DEFAULT_VIEWPORT,
            player_weapon: WeaponType::Cannon.id(),
        }
    }
}

/// Validated match configuration.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub seed: u64,
    pub time_scale: f64,
    pub roster: Vec<ResolvedRosterEntry>,
    pub viewport: (f64, f64),
    pub player_weapon: WeaponType,
}

impl MatchConfig {
    /// Resolve ids and check numeric ranges. Any failure here is fatal:
    /// the simulation never performs table lookups that can miss.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        if !(self.viewport.0 > 0.0 && self.viewport.1 > 0.0) {
            return Err(ConfigError::InvalidViewport);
        }
        let player_weapon = WeaponType::from_id(self.player_weapon)
            .ok_or(ConfigError::UnknownWeapon(self.player_weapon))?;
        if !player_weapon.is_primary() {
            return Err(ConfigError::NotAPrimaryWeapon(self.player_weapon));
        }

        let mut roster = Vec::with_capacity(self.roster.len());
        for entry in &self.roster {
            let class = TankClass::from_name(&entry.class)
                .ok_or_else(|| ConfigError::UnknownClass(entry.class.clone()))?;
            if entry.faction == Faction::Neutral {
                return Err(ConfigError::NeutralRoster(entry.class.clone()));
            }
            if class.is_objective_defender() {
                return Err(ConfigError::ReservedClass(entry.class.clone()));
            }
            if entry.count == 0 {
                return Err(ConfigError::EmptyRosterEntry(entry.class.clone()));
            }
            let weapon = match entry.weapon {
                Some(id) => WeaponType::from_id(id).ok_or(ConfigError::UnknownWeapon(id))?,
                None => class_stats(class).weapon,
            };
            if !weapon.is_primary() {
                return Err(ConfigError::NotAPrimaryWeapon(weapon.id()));
            }
            roster.push(ResolvedRosterEntry {
                faction: entry.faction,
                class,
                weapon,
                count: entry.count,
            });
        }

        validate_tables()?;

        Ok(ValidatedConfig {
            seed: self.seed,
            time_scale: self.time_scale,
            roster,
            viewport: self.viewport,
            player_weapon,
        })
    }
}

/// Sanity-check the static tables.
pub fn validate_tables() -> Result<(), ConfigError> {
    for class in TankClass::ALL {
        let stats = class_stats(class);
        if stats.base_speed <= 0.0 || stats.max_hp <= 0.0 || stats.radius <= 0.0 {
            return Err(ConfigError::InvalidClassStats(class.name()));
        }
    }
    for id in 0..=4u8 {
        let weapon = WeaponType::from_id(id).ok_or(ConfigError::UnknownWeapon(id))?;
        let stats = weapon_stats(weapon);
        if stats.fire_delay <= 0.0 || stats.burst == 0 || stats.damage <= 0.0 {
            return Err(ConfigError::InvalidWeaponStats(id));
        }
    }
    let durations = [
        RESPAWN_DEATH_CAM,
        RESPAWN_FADE_OUT,
        RESPAWN_OMEN,
        RESPAWN_MATERIALIZE,
        RESPAWN_ACTIVATION,
        RESPAWN_READY,
        GAME_OVER_SLOW_MOTION,
        GAME_OVER_ANIMATION,
        GAME_OVER_TEXT_REVEAL,
        GAME_OVER_STATS,
        WEATHER_DURATION,
    ];
    if durations.iter().any(|d| *d <= 0.0) {
        return Err(ConfigError::InvalidDuration);
    }
    Ok(())
}

/// Configuration errors, raised only at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown tank class id: {0}")]
    UnknownClass(String),

    #[error("unknown weapon id: {0}")]
    UnknownWeapon(u8),

    #[error("weapon id {0} is not a primary weapon")]
    NotAPrimaryWeapon(u8),

    #[error("class {0} is spawned by match events and cannot be rostered")]
    ReservedClass(String),

    #[error("roster entry for class {0} has a count of zero")]
    EmptyRosterEntry(String),

    #[error("roster entry for class {0} uses the neutral faction")]
    NeutralRoster(String),

    #[error("time scale must be finite and non-negative, got {0}")]
    InvalidTimeScale(f64),

    #[error("viewport dimensions must be positive")]
    InvalidViewport,

    #[error("invalid stats for class {0}")]
    InvalidClassStats(&'static str),

    #[error("invalid stats for weapon id {0}")]
    InvalidWeaponStats(u8),

    #[error("phase and weather durations must be positive")]
    InvalidDuration,
}
