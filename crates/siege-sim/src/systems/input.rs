//! Player input latch.
//!
//! Commands arriving between ticks are folded into the latch; the tick then
//! copies it into the player's `Intent`. Continuous controls (move, aim,
//! trigger) persist until changed; one-shot requests fire once and clear.

use hecs::{Entity, World};

use siege_core::commands::PlayerCommand;
use siege_core::components::Intent;
use siege_core::enums::WeaponType;

/// Latched player controls.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    pub move_x: f64,
    pub move_y: f64,
    pub aim: f64,
    pub firing: bool,
    pub fire_missile: bool,
    pub drop_mine: bool,
    pub dash: bool,
    pub emp: bool,
    pub rage: bool,
    pub turbo: bool,
    pub shield: bool,
    pub switch_weapon: Option<WeaponType>,
}

impl InputLatch {
    /// Fold a control command into the latch. Returns false for commands
    /// the latch does not own (pause, respawn, restart).
    pub fn apply(&mut self, command: &PlayerCommand) -> bool {
        match *command {
            PlayerCommand::SetMove { x, y } => {
                self.move_x = if x.is_finite() { x.clamp(-1.0, 1.0) } else { 0.0 };
                self.move_y = if y.is_finite() { y.clamp(-1.0, 1.0) } else { 0.0 };
            }
            PlayerCommand::SetAim { angle } => {
                if angle.is_finite() {
                    self.aim = angle;
                }
            }
            PlayerCommand::SetFire { firing } => self.firing = firing,
            PlayerCommand::FireMissile => self.fire_missile = true,
            PlayerCommand::DropMine => self.drop_mine = true,
            PlayerCommand::SelectWeapon { weapon_id } => {
                // Unknown ids are dropped; validation only happens at startup.
                if let Some(w) = WeaponType::from_id(weapon_id).filter(|w| w.is_primary()) {
                    self.switch_weapon = Some(w);
                }
            }
            PlayerCommand::Dash => self.dash = true,
            PlayerCommand::Emp => self.emp = true,
            PlayerCommand::Rage => self.rage = true,
            PlayerCommand::Turbo => self.turbo = true,
            PlayerCommand::Shield => self.shield = true,
            PlayerCommand::TogglePause | PlayerCommand::Respawn | PlayerCommand::Restart => return false,
        }
        true
    }

    /// Produce this tick's intent and clear the one-shot requests.
    pub fn take_intent(&mut self) -> Intent {
        let intent = Intent {
            move_x: self.move_x,
            move_y: self.move_y,
            aim: self.aim,
            fire: self.firing,
            fire_missile: self.fire_missile,
            drop_mine: self.drop_mine,
            dash: self.dash,
            emp: self.emp,
            rage: self.rage,
            turbo: self.turbo,
            shield: self.shield,
            switch_weapon: self.switch_weapon,
        };
        self.fire_missile = false;
        self.drop_mine = false;
        self.dash = false;
        self.emp = false;
        self.rage = false;
        self.turbo = false;
        self.shield = false;
        self.switch_weapon = None;
        intent
    }
}

/// Write the latched controls into the player's intent.
pub fn run(world: &mut World, player: Option<Entity>, latch: &mut InputLatch) {
    let intent = latch.take_intent();
    if let Some(mut slot) = player.and_then(|p| world.get::<&mut Intent>(p).ok()) {
        *slot = intent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_requests_clear_after_one_tick() {
        let mut latch = InputLatch::default();
        latch.apply(&PlayerCommand::Dash);
        latch.apply(&PlayerCommand::Dash);
        latch.apply(&PlayerCommand::SetFire { firing: true });
        let first = latch.take_intent();
        assert!(first.dash && first.fire);
        let second = latch.take_intent();
        assert!(!second.dash, "duplicate requests within a tick count once");
        assert!(second.fire, "trigger stays held");
    }

    #[test]
    fn test_non_primary_weapon_select_ignored() {
        let mut latch = InputLatch::default();
        latch.apply(&PlayerCommand::SelectWeapon { weapon_id: 3 });
        latch.apply(&PlayerCommand::SelectWeapon { weapon_id: 99 });
        assert_eq!(latch.take_intent().switch_weapon, None);
        latch.apply(&PlayerCommand::SelectWeapon { weapon_id: 2 });
        assert_eq!(latch.take_intent().switch_weapon, Some(WeaponType::MachineGun));
    }

    #[test]
    fn test_move_clamped_and_non_finite_dropped() {
        let mut latch = InputLatch::default();
        latch.apply(&PlayerCommand::SetMove { x: 5.0, y: f64::NAN });
        let intent = latch.take_intent();
        assert_eq!(intent.move_x, 1.0);
        assert_eq!(intent.move_y, 0.0);
    }

    #[test]
    fn test_engine_commands_not_latched() {
        let mut latch = InputLatch::default();
        assert!(!latch.apply(&PlayerCommand::TogglePause));
        assert!(!latch.apply(&PlayerCommand::Restart));
    }
}
