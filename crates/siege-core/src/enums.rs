//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Team allegiance. Neutral covers guardians, bosses and zone elites,
/// which are hostile to every other faction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Blue,
    Red,
    Green,
    Purple,
    #[default]
    Neutral,
}

impl Faction {
    /// The four base-owning factions, in base table order.
    pub const PLAYABLE: [Faction; 4] = [Faction::Red, Faction::Blue, Faction::Green, Faction::Purple];

    /// Whether tanks of these two factions fight each other.
    /// Units of one faction never fight each other, neutrals included.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }

    pub fn name(self) -> &'static str {
        match self {
            Faction::Blue => "BLUE",
            Faction::Red => "RED",
            Faction::Green => "GREEN",
            Faction::Purple => "PURPLE",
            Faction::Neutral => "NEUTRAL",
        }
    }

    /// Faction palette color (hex), used for alerts and radar.
    pub fn color(self) -> &'static str {
        match self {
            Faction::Blue => "#00ccff",
            Faction::Red => "#ff3333",
            Faction::Green => "#33ff33",
            Faction::Purple => "#cc00ff",
            Faction::Neutral => "#fff700",
        }
    }
}

/// Map tile type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Empty,
    /// Destructible energy barrier.
    Wall,
    /// Indestructible obsidian.
    Steel,
    /// Plasma stream: passable, slippery; ice plate under freeze weather.
    Water,
    /// Holo crystals: passable, speed boost; snow drift under freeze weather.
    Forest,
    /// Faction base structure.
    Base,
}

impl TileType {
    /// Whether this tile blocks tanks, projectiles and line of sight.
    pub fn is_solid(self) -> bool {
        matches!(self, TileType::Wall | TileType::Steel | TileType::Base)
    }
}

/// Global weather state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherType {
    #[default]
    Clear,
    IonStorm,
    Thunderstorm,
    Freeze,
}

impl WeatherType {
    /// Next weather in the fixed cycle.
    pub fn next(self) -> WeatherType {
        match self {
            WeatherType::Clear => WeatherType::IonStorm,
            WeatherType::IonStorm => WeatherType::Thunderstorm,
            WeatherType::Thunderstorm => WeatherType::Freeze,
            WeatherType::Freeze => WeatherType::Clear,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeatherType::Clear => "CLEAR",
            WeatherType::IonStorm => "ION STORM",
            WeatherType::Thunderstorm => "THUNDERSTORM",
            WeatherType::Freeze => "FREEZE",
        }
    }
}

/// Weapon type. Numeric ids match the static weapon table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    Cannon,
    Laser,
    MachineGun,
    Missile,
    Mine,
}

impl WeaponType {
    /// Primary weapons the player can cycle through.
    pub const PRIMARY: [WeaponType; 3] = [WeaponType::Cannon, WeaponType::Laser, WeaponType::MachineGun];

    pub fn id(self) -> u8 {
        match self {
            WeaponType::Cannon => 0,
            WeaponType::Laser => 1,
            WeaponType::MachineGun => 2,
            WeaponType::Missile => 3,
            WeaponType::Mine => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<WeaponType> {
        match id {
            0 => Some(WeaponType::Cannon),
            1 => Some(WeaponType::Laser),
            2 => Some(WeaponType::MachineGun),
            3 => Some(WeaponType::Missile),
            4 => Some(WeaponType::Mine),
            _ => None,
        }
    }

    pub fn is_primary(self) -> bool {
        Self::PRIMARY.contains(&self)
    }
}

/// Tank class. Behavior differences are selected by explicit branches
/// on this value plus the static class table, never by trait objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankClass {
    #[default]
    Normal,
    Smoke,
    Bomber,
    Freezer,
    Flasher,
    BossRed,
    BossBlue,
    BossOverlord,
    GuardianRed,
    GuardianBlue,
}

impl TankClass {
    pub const ALL: [TankClass; 10] = [
        TankClass::Normal,
        TankClass::Smoke,
        TankClass::Bomber,
        TankClass::Freezer,
        TankClass::Flasher,
        TankClass::BossRed,
        TankClass::BossBlue,
        TankClass::BossOverlord,
        TankClass::GuardianRed,
        TankClass::GuardianBlue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TankClass::Normal => "NORMAL",
            TankClass::Smoke => "SMOKE",
            TankClass::Bomber => "BOMBER",
            TankClass::Freezer => "FREEZER",
            TankClass::Flasher => "FLASHER",
            TankClass::BossRed => "BOSS_RED",
            TankClass::BossBlue => "BOSS_BLUE",
            TankClass::BossOverlord => "BOSS_OVERLORD",
            TankClass::GuardianRed => "GUARDIAN_RED",
            TankClass::GuardianBlue => "GUARDIAN_BLUE",
        }
    }

    /// Parse a class id as used by roster configuration.
    pub fn from_name(name: &str) -> Option<TankClass> {
        TankClass::ALL.iter().copied().find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn is_boss(self) -> bool {
        matches!(self, TankClass::BossRed | TankClass::BossBlue | TankClass::BossOverlord)
    }

    pub fn is_guardian(self) -> bool {
        matches!(self, TankClass::GuardianRed | TankClass::GuardianBlue)
    }

    /// Bosses and guardians: no flee, no stuck recovery, defend in place.
    pub fn is_objective_defender(self) -> bool {
        self.is_boss() || self.is_guardian()
    }
}

/// AI behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    Aggressive,
    Tactical,
    Survival,
    Support,
    Stuck,
    #[default]
    Exploring,
}

/// Timed status debuffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Freeze,
    Silence,
    Blind,
}

impl StatusKind {
    /// Crowd-control effects respect cc immunity and boss immunity.
    pub fn is_crowd_control(self) -> bool {
        !matches!(self, StatusKind::Burn)
    }
}

/// Player skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    Dash,
    Emp,
    Rage,
    Turbo,
    Shield,
}

/// Hub control state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubState {
    #[default]
    Neutral,
    Capturing,
    Contested,
    Secured,
}

/// Player respawn phase chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RespawnPhase {
    #[default]
    Idle,
    DeathCam,
    FadeOut,
    Omen,
    Materialize,
    Activation,
    Ready,
}

/// Match conclusion phase chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameOverPhase {
    #[default]
    None,
    SlowMotion,
    Animation,
    TextReveal,
    Stats,
    Waiting,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// Radar blip category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadarCategory {
    Tank,
    Boss,
    Base,
    Hub,
    Item,
    Guardian,
}

/// Visual particle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Smoke,
    Fire,
    Shockwave,
    Debris,
    Snowflake,
    Heal,
    Electric,
    Muzzle,
}

/// Ground decal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecalKind {
    Scorch,
    Frost,
    Acid,
    Crater,
}

/// Match rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    S,
    A,
    B,
    C,
}
