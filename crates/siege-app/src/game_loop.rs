//! Game loop thread: runs the simulation engine at 60Hz and publishes snapshots.
//!
//! The engine moves into this thread, which owns it from then on.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for polling.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use siege_core::constants::TICK_RATE;
use siege_core::enums::GamePhase;
use siege_sim::engine::SimulationEngine;

use crate::state::{GameLoopCommand, SharedSnapshot};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// How the loop is paced and when it stops.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Sleep to hold the tick rate; otherwise run flat out.
    pub realtime: bool,
    pub max_ticks: Option<u64>,
}

/// Final numbers reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub match_time: f64,
    pub game_over: bool,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the input side to use and the handle to
/// join for the summary.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: SharedSnapshot,
    options: LoopOptions,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<LoopSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("siege-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &latest_snapshot, options))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command, channel disconnect or the
/// tick limit.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
    options: LoopOptions,
) -> LoopSummary {
    let mut summary = LoopSummary::default();
    let mut next_tick_time = Instant::now();

    loop {
        if options.max_ticks.is_some_and(|max| summary.ticks >= max) {
            tracing::info!(ticks = summary.ticks, "tick limit reached");
            return summary;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return summary,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return summary,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        summary.ticks += 1;
        summary.match_time = snapshot.match_time;
        summary.game_over = snapshot.phase == GamePhase::GameOver;

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if !options.realtime {
            continue;
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use siege_core::commands::PlayerCommand;
    use siege_core::config::MatchConfig;

    fn flat_out(max_ticks: u64) -> LoopOptions {
        LoopOptions {
            realtime: false,
            max_ticks: Some(max_ticks),
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Dash)).unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::TogglePause)).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], GameLoopCommand::PlayerCommand(PlayerCommand::Dash)));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::TogglePause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_stops_at_tick_limit_and_publishes() {
        let engine = SimulationEngine::new(MatchConfig::default()).unwrap();
        let shared: SharedSnapshot = Arc::new(Mutex::new(None));
        let (_tx, handle) = spawn_game_loop(engine, shared.clone(), flat_out(120)).unwrap();

        let summary = handle.join().unwrap();
        assert_eq!(summary.ticks, 120);
        assert!(!summary.game_over);
        let snap = shared.lock().unwrap().clone().expect("snapshot published");
        assert_eq!(snap.time.tick, 120);
    }

    #[test]
    fn test_shutdown_before_first_tick() {
        let engine = SimulationEngine::new(MatchConfig::default()).unwrap();
        let shared: SharedSnapshot = Arc::new(Mutex::new(None));
        let (tx, rx) = mpsc::channel();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let summary = run_game_loop(engine, rx, &shared, flat_out(1_000));
        assert_eq!(summary.ticks, 0);
        assert!(shared.lock().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = SimulationEngine::new(MatchConfig::default()).unwrap();

        // Run enough ticks to populate entities
        for _ in 0..120 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.667ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
