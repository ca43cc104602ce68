//! NEON SIEGE headless runner.
//!
//! Reads player commands as JSON lines on stdin, runs the match on the
//! game-loop thread and logs a status line every second of wall time.

use std::io::BufRead;
use std::time::Duration;

use tracing::{info, warn};

use siege_app::config::AppConfig;
use siege_app::game_loop::{self, LoopOptions};
use siege_app::state::{parse_command, AppState, GameLoopCommand};
use siege_core::config::MatchConfig;
use siege_sim::engine::SimulationEngine;

const STATUS_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level);

    let engine = SimulationEngine::new(MatchConfig {
        seed: config.seed,
        ..Default::default()
    })?;
    info!(seed = config.seed, realtime = config.realtime, max_ticks = ?config.max_ticks, "starting NEON SIEGE");

    let state = AppState::new();
    let (tx, handle) = game_loop::spawn_game_loop(
        engine,
        state.latest_snapshot.clone(),
        LoopOptions {
            realtime: config.realtime,
            max_ticks: config.max_ticks,
        },
    )?;
    *state
        .command_tx
        .lock()
        .map_err(|_| anyhow::anyhow!("command channel lock poisoned"))? = Some(tx.clone());

    let stop_on_eof = config.max_ticks.is_none();
    std::thread::Builder::new()
        .name("siege-input".into())
        .spawn(move || read_commands(tx, stop_on_eof))?;

    while !handle.is_finished() {
        std::thread::sleep(STATUS_INTERVAL);
        if let Some(snap) = state.snapshot() {
            info!(
                tick = snap.time.tick,
                phase = ?snap.phase,
                remaining = snap.remaining.round(),
                hp = snap.player.hp.round(),
                kills = snap.player.kills,
                deaths = snap.player.deaths,
                hub_owner = snap.hub.as_ref().map(|h| h.owner.name()),
                "status"
            );
        }
    }

    let summary = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;
    if let Some(result) = state.snapshot().and_then(|s| s.result) {
        info!(
            winner = result.winner.name(),
            victory = result.victory,
            rating = ?result.rating,
            kills = result.kills,
            deaths = result.deaths,
            assists = result.assists,
            "match result"
        );
    }
    info!(ticks = summary.ticks, match_time = summary.match_time, "shutdown complete");
    Ok(())
}

/// Forward stdin JSON lines to the game loop. Malformed lines are skipped.
fn read_commands(tx: std::sync::mpsc::Sender<GameLoopCommand>, stop_on_eof: bool) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if tx.send(GameLoopCommand::PlayerCommand(command)).is_err() {
                    return;
                }
            }
            Err(err) => warn!(%err, line = %line.trim(), "ignoring malformed command"),
        }
    }
    if stop_on_eof {
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
