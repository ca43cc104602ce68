//! Events emitted by the simulation for presentation feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// One-shot events produced during a tick. Drained into the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    Kill {
        killer: String,
        victim: String,
        killer_faction: Faction,
        victim_faction: Faction,
        by_player: bool,
    },
    PlayerDied,
    PlayerRespawned,
    BaseDestroyed { faction: Faction },
    HubCaptured { faction: Faction },
    WeatherChanged { weather: WeatherType },
    GuardianSpawned { class: TankClass, position: Position },
    GuardianBuff { faction: Faction, class: TankClass },
    ZoneEvent { bosses: bool },
    Explosion { position: Position, radius: f64 },
    WallDestroyed { tile: (i32, i32) },
    GameOver { winner: Faction },
}

/// Kill feed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillFeedEntry {
    /// Monotonic insertion id.
    pub id: u64,
    pub killer: String,
    pub victim: String,
    pub killer_faction: Faction,
    pub victim_faction: Faction,
    /// Match time of insertion.
    pub time: f64,
}

/// Single-slot tactical alert banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalAlert {
    pub text: String,
    pub subtext: String,
    /// Hex color.
    pub color: String,
    pub expires_at: f64,
}
