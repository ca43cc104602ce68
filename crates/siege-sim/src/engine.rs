//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use siege_core::commands::PlayerCommand;
use siege_core::config::{ConfigError, MatchConfig, ValidatedConfig};
use siege_core::constants::DT;
use siege_core::enums::GamePhase;
use siege_core::events::SimEvent;
use siege_core::state::GameStateSnapshot;
use siege_core::types::SimTime;
use siege_map::TileMap;

use crate::match_state::MatchState;
use crate::systems;
use crate::systems::combat::{CombatCtx, KillRecord};
use crate::systems::input::InputLatch;
use crate::world_setup;

/// Salt mixed into the seed of the snapshot-side radar RNG.
const RADAR_SEED_SALT: u64 = 0x5EED_0F_AD4A;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    map: TileMap,
    time: SimTime,
    phase: GamePhase,
    config: ValidatedConfig,
    time_scale: f64,
    rng: ChaCha8Rng,
    radar_rng: ChaCha8Rng,
    restarts: u64,
    command_queue: VecDeque<PlayerCommand>,
    latch: InputLatch,
    despawn_buffer: Vec<hecs::Entity>,
    kills: Vec<KillRecord>,
    events: Vec<SimEvent>,
    state: MatchState,
}

impl SimulationEngine {
    /// Validate the config and start a match. Configuration errors are the
    /// only fatal errors; nothing after this point can fail.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let validated = config.validate()?;
        Ok(Self::from_validated(validated, 0))
    }

    /// Start a match from an already validated config. Each restart reseeds
    /// the simulation stream so rematches play out differently.
    pub fn from_validated(config: ValidatedConfig, restarts: u64) -> Self {
        let seed = config.seed.wrapping_add(restarts);
        let mut world = World::new();
        let mut state = MatchState::new(&config);
        world_setup::setup_match(&mut world, &mut state, &config);
        tracing::info!(seed, restarts, tanks = world.len(), "match started");

        Self {
            world,
            map: siege_map::layout::standard(),
            time: SimTime::default(),
            phase: GamePhase::Playing,
            time_scale: config.time_scale,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            radar_rng: ChaCha8Rng::seed_from_u64(seed ^ RADAR_SEED_SALT),
            restarts,
            command_queue: VecDeque::new(),
            latch: InputLatch::default(),
            despawn_buffer: Vec::new(),
            kills: Vec::new(),
            events: Vec::new(),
            state,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    /// While paused no time passes but a snapshot is still produced.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase != GamePhase::Paused {
            self.run_systems();
            self.phase = if self.state.is_over() {
                GamePhase::GameOver
            } else {
                GamePhase::Playing
            };
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build(
            &self.world,
            &self.state,
            &self.time,
            self.phase,
            events,
            &mut self.radar_rng,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Number of restarts since the engine was created.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    /// Process all queued commands. A pause toggle takes effect at most once
    /// per tick however many times it was sent.
    fn process_commands(&mut self) {
        let mut toggled = false;
        let mut restart = false;
        while let Some(command) = self.command_queue.pop_front() {
            match command {
                PlayerCommand::TogglePause => {
                    if !toggled {
                        toggled = true;
                        self.toggle_pause();
                    }
                }
                PlayerCommand::Respawn => {
                    if self.phase == GamePhase::Playing && systems::respawn::acknowledge(&mut self.state.respawn) {
                        self.state.player_killer = None;
                        tracing::debug!("respawn acknowledged");
                    }
                }
                PlayerCommand::Restart => {
                    restart |= systems::game_over::can_restart(&self.state.game_over);
                }
                other => {
                    self.latch.apply(&other);
                }
            }
        }
        if restart {
            self.restart();
        }
    }

    fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
        tracing::debug!(phase = ?self.phase, "pause toggled");
    }

    /// Replace the whole match with a fresh one.
    fn restart(&mut self) {
        *self = Self::from_validated(self.config.clone(), self.restarts + 1);
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_secs;

        if self.state.is_over() {
            // The arena is frozen; only the sequencer and visuals move.
            systems::game_over::advance(&mut self.state.game_over, DT);
        } else {
            self.state.match_time += DT;

            // 1. Weather
            systems::weather::run(&mut self.state.weather, &mut self.state.alert, &mut self.events, now);
            let mods = self.state.weather.modifiers();
            // 2. Player input → intent
            systems::input::run(&mut self.world, self.state.player, &mut self.latch);
            // 3. AI → intent
            systems::ai::run(&mut self.world, &self.map, &self.state, mods.visibility, &mut self.rng);
            // 4. Skills
            systems::skills::run(&mut self.world);
            // 5. Movement, collision, pickups
            systems::movement::run(
                &mut self.world,
                &self.map,
                self.state.weather.current,
                &mods,
                &mut self.despawn_buffer,
            );
            // 6. Base turrets
            systems::turrets::run(&mut self.world, &mut self.state);
            // 7. Weapons, projectiles and class specials
            {
                let mut ctx = CombatCtx {
                    map: &mut self.map,
                    state: &mut self.state,
                    kills: &mut self.kills,
                    events: &mut self.events,
                    now,
                };
                systems::combat::run(&mut self.world, &mut ctx, &mut self.despawn_buffer);
                systems::specials::run(&mut self.world, &mut ctx);
            }
            // 8. Deaths from this tick's hits
            systems::kills::run(&mut self.world, &mut self.state, &mut self.kills, &mut self.events, now);
            // 9. Hub control
            systems::hub::run(&mut self.world, &mut self.state, &mut self.events, now);
            // 10. Status and buff timers, burn damage
            systems::status::run(&mut self.world, &mut self.state, &mods, &mut self.kills, now);
            systems::kills::run(&mut self.world, &mut self.state, &mut self.kills, &mut self.events, now);
            // 11. Scheduled spawns
            systems::spawner::run(
                &mut self.world,
                &self.map,
                &mut self.state,
                &mut self.rng,
                &mut self.events,
                now,
            );
            // 12. Respawn sequencer
            systems::respawn::run(&mut self.world, &mut self.state, &mut self.events);
            // 13. Outcome
            if let Some(winner) = systems::game_over::check_outcome(&self.state) {
                systems::game_over::begin(&self.world, &mut self.state, winner, &mut self.events, now);
            }
        }

        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        systems::effects::run(&mut self.world, &mut self.despawn_buffer);
        self.state.feed.expire(now);
        self.state.alert.expire(now);
    }
}
