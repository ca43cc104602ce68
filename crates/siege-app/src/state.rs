//! State shared between the input side and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use siege_core::commands::PlayerCommand;
use siege_core::state::GameStateSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop after each tick.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Handles held by the runner while the loop is alive.
///
/// `mpsc::Sender` is `Send` but not `Sync`, so it sits behind a `Mutex`
/// like the snapshot does.
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    /// `None` until the loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: SharedSnapshot,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a command to the loop. Returns false once the loop is gone.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        guard.as_ref().is_some_and(|tx| tx.send(command).is_ok())
    }

    /// Clone of the latest snapshot, if one has been produced.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}

/// Parse one line of JSON input into a player command.
pub fn parse_command(line: &str) -> Result<PlayerCommand, serde_json::Error> {
    serde_json::from_str(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.snapshot().is_none());
        assert!(!state.send(GameLoopCommand::Shutdown), "no loop to send to");
    }

    #[test]
    fn test_send_reaches_receiver() {
        let state = AppState::new();
        let (tx, rx) = mpsc::channel();
        *state.command_tx.lock().unwrap() = Some(tx);
        assert!(state.send(GameLoopCommand::PlayerCommand(PlayerCommand::Dash)));
        assert!(matches!(
            rx.try_recv().unwrap(),
            GameLoopCommand::PlayerCommand(PlayerCommand::Dash)
        ));
        drop(rx);
        assert!(!state.send(GameLoopCommand::Shutdown), "receiver dropped");
    }

    #[test]
    fn test_parse_command_lines() {
        assert_eq!(
            parse_command(r#"{"type":"SetMove","x":1.0,"y":-0.5}"#).unwrap(),
            PlayerCommand::SetMove { x: 1.0, y: -0.5 }
        );
        assert_eq!(parse_command(" {\"type\":\"TogglePause\"}\n").unwrap(), PlayerCommand::TogglePause);
        assert!(parse_command(r#"{"type":"Launch"}"#).is_err());
    }
}
