//! Player commands sent from the outer loop to the simulation.
//!
//! Commands are queued and latched at the next tick boundary. Repeating a
//! command within one tick has the same effect as sending it once.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Continuous intent ---
    /// Desired movement direction; (0, 0) stops accelerating.
    SetMove { x: f64, y: f64 },
    /// Turret aim angle (radians).
    SetAim { angle: f64 },
    /// Hold or release the trigger.
    SetFire { firing: bool },

    // --- Edge-triggered actions ---
    FireMissile,
    DropMine,
    /// Switch primary weapon by numeric id.
    SelectWeapon { weapon_id: u8 },
    Dash,
    Emp,
    Rage,
    Turbo,
    Shield,

    // --- Match control ---
    TogglePause,
    /// Leave the READY respawn phase.
    Respawn,
    /// Leave the WAITING game-over phase and start a fresh match.
    Restart,
}
