//! Class-specific behavioral profiles.
//!
//! Consolidates per-class parameters for the tank AI state machine.

use siege_core::config::class_stats;
use siege_core::enums::TankClass;

/// Behavioral profile for a tank class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorProfile {
    /// Distance the tank tries to hold from its target (px).
    pub preferred_range: f64,
    /// Whether the tank falls back to SURVIVAL when hurt.
    pub retreats: bool,
    /// Whether stuck detection applies.
    pub unsticks: bool,
    /// Holds an objective anchor instead of roaming (SUPPORT state).
    pub defends_objective: bool,
    /// Fires missiles at targets in seek range.
    pub uses_missiles: bool,
}

/// Get the behavioral profile for a given class.
pub fn get_profile(class: TankClass) -> BehaviorProfile {
    let defender = class.is_objective_defender();
    let base = BehaviorProfile {
        preferred_range: 300.0,
        retreats: !defender,
        unsticks: !defender,
        defends_objective: defender,
        uses_missiles: class_stats(class).uses_missiles,
    };

    match class {
        TankClass::Normal => base,
        // Blind pulse and freeze aura both need to stay inside aura radius.
        TankClass::Flasher => BehaviorProfile {
            preferred_range: 220.0,
            ..base
        },
        TankClass::Freezer => BehaviorProfile {
            preferred_range: 180.0,
            ..base
        },
        TankClass::Smoke => BehaviorProfile {
            preferred_range: 260.0,
            ..base
        },
        TankClass::Bomber => BehaviorProfile {
            preferred_range: 60.0,
            ..base
        },
        TankClass::BossRed | TankClass::BossBlue => BehaviorProfile {
            preferred_range: 350.0,
            ..base
        },
        TankClass::BossOverlord => BehaviorProfile {
            preferred_range: 420.0,
            ..base
        },
        TankClass::GuardianRed | TankClass::GuardianBlue => base,
    }
}
