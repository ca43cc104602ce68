//! Match outcome and the game-over sequencer.
//!
//! The outcome is checked once per playing tick. When it is decided the
//! result is frozen and the sequencer runs SLOW_MOTION → ANIMATION →
//! TEXT_REVEAL → STATS → WAITING, holding WAITING until restart.

use hecs::World;

use siege_core::components::Scorecard;
use siege_core::constants::*;
use siege_core::enums::{Faction, GameOverPhase, Rating};
use siege_core::events::SimEvent;
use siege_core::state::{BaseStats, GameOverState, GameResult};

use crate::match_state::MatchState;
use crate::systems::EPSILON;

/// Winner of the match if it is over, else `None`.
///
/// Losing the player's base is a defeat; the strongest surviving enemy
/// base takes the win. Destroying every enemy base is a victory. At the
/// time limit the healthiest active base wins, the player's faction
/// winning ties.
pub fn check_outcome(state: &MatchState) -> Option<Faction> {
    let own_active = state.base(PLAYER_FACTION).is_some_and(|b| b.active);
    let enemies: Vec<&BaseStats> = state
        .bases
        .iter()
        .filter(|b| b.faction != PLAYER_FACTION && b.active)
        .collect();

    if !own_active {
        let winner = enemies
            .iter()
            .copied()
            .fold(None::<&BaseStats>, |best, b| match best {
                Some(top) if top.hp >= b.hp => Some(top),
                _ => Some(b),
            })
            .map_or(Faction::Neutral, |b| b.faction);
        return Some(winner);
    }
    if enemies.is_empty() {
        return Some(PLAYER_FACTION);
    }
    if state.match_time + EPSILON < MATCH_DURATION {
        return None;
    }

    let fraction = |b: &BaseStats| b.hp / b.max_hp;
    let mut winner = PLAYER_FACTION;
    let mut best = state.base(PLAYER_FACTION).map_or(0.0, fraction);
    for base in enemies {
        if fraction(base) > best {
            best = fraction(base);
            winner = base.faction;
        }
    }
    Some(winner)
}

/// Score → rating: 2·kills − deaths + 5·bases destroyed + 10 on victory.
pub fn rating(kills: u32, deaths: u32, bases_destroyed: u32, victory: bool) -> Rating {
    let score = 2 * kills as i64 - deaths as i64 + 5 * bases_destroyed as i64 + if victory { 10 } else { 0 };
    match score {
        s if s >= 30 => Rating::S,
        s if s >= 18 => Rating::A,
        s if s >= 8 => Rating::B,
        _ => Rating::C,
    }
}

/// Final result from the player's point of view.
pub fn build_result(world: &World, state: &MatchState, winner: Faction) -> GameResult {
    let card = state
        .player
        .and_then(|p| world.get::<&Scorecard>(p).ok().map(|c| (*c).clone()))
        .unwrap_or_default();
    let bases_destroyed = state
        .bases
        .iter()
        .filter(|b| b.faction != PLAYER_FACTION && !b.active)
        .count() as u32;
    let victory = winner == PLAYER_FACTION;
    GameResult {
        winner,
        victory,
        kills: card.kills,
        deaths: card.deaths,
        assists: card.assists,
        time_survived: state.match_time,
        bases_destroyed,
        rating: rating(card.kills, card.deaths, bases_destroyed, victory),
    }
}

/// Freeze the result and start the sequence.
pub fn begin(world: &World, state: &mut MatchState, winner: Faction, events: &mut Vec<SimEvent>, now: f64) {
    let result = build_result(world, state, winner);
    tracing::info!(
        winner = winner.name(),
        victory = result.victory,
        kills = result.kills,
        deaths = result.deaths,
        rating = ?result.rating,
        match_time = state.match_time,
        "game over"
    );
    let headline = if result.victory { "VICTORY" } else { "DEFEAT" };
    state.alert.raise(headline, &format!("{} wins the arena", winner.name()), winner.color(), now);
    state.result = Some(result);
    state.game_over = GameOverState {
        phase: GameOverPhase::SlowMotion,
        elapsed: 0.0,
    };
    events.push(SimEvent::GameOver { winner });
}

fn duration(phase: GameOverPhase) -> Option<f64> {
    match phase {
        GameOverPhase::None | GameOverPhase::Waiting => None,
        GameOverPhase::SlowMotion => Some(GAME_OVER_SLOW_MOTION),
        GameOverPhase::Animation => Some(GAME_OVER_ANIMATION),
        GameOverPhase::TextReveal => Some(GAME_OVER_TEXT_REVEAL),
        GameOverPhase::Stats => Some(GAME_OVER_STATS),
    }
}

fn next(phase: GameOverPhase) -> GameOverPhase {
    match phase {
        GameOverPhase::None => GameOverPhase::None,
        GameOverPhase::SlowMotion => GameOverPhase::Animation,
        GameOverPhase::Animation => GameOverPhase::TextReveal,
        GameOverPhase::TextReveal => GameOverPhase::Stats,
        GameOverPhase::Stats | GameOverPhase::Waiting => GameOverPhase::Waiting,
    }
}

/// Advance the sequence by `dt`. Returns the phase entered, if any.
pub fn advance(state: &mut GameOverState, dt: f64) -> Option<GameOverPhase> {
    let limit = duration(state.phase)?;
    state.elapsed += dt;
    if state.elapsed + EPSILON < limit {
        return None;
    }
    state.elapsed = (state.elapsed - limit).max(0.0);
    state.phase = next(state.phase);
    tracing::debug!(phase = ?state.phase, "game over phase");
    Some(state.phase)
}

/// Whether the restart input is accepted.
pub fn can_restart(state: &GameOverState) -> bool {
    state.phase == GameOverPhase::Waiting
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_core::config::MatchConfig;

    fn state() -> MatchState {
        MatchState::new(&MatchConfig::default().validate().unwrap())
    }

    fn destroy(state: &mut MatchState, faction: Faction) {
        let base = state.base_mut(faction).unwrap();
        base.hp = 0.0;
        base.active = false;
    }

    #[test]
    fn test_match_runs_while_undecided() {
        let mut s = state();
        s.match_time = MATCH_DURATION - 1.0;
        destroy(&mut s, Faction::Red);
        assert_eq!(check_outcome(&s), None);
    }

    #[test]
    fn test_losing_own_base_is_defeat() {
        let mut s = state();
        destroy(&mut s, PLAYER_FACTION);
        s.base_mut(Faction::Green).unwrap().hp = 3000.0;
        s.base_mut(Faction::Purple).unwrap().hp = 1000.0;
        assert_eq!(check_outcome(&s), Some(Faction::Red), "red base untouched at full hp");
    }

    #[test]
    fn test_all_enemy_bases_down_is_victory() {
        let mut s = state();
        for f in [Faction::Red, Faction::Green, Faction::Purple] {
            destroy(&mut s, f);
        }
        assert_eq!(check_outcome(&s), Some(PLAYER_FACTION));
    }

    #[test]
    fn test_timeout_picks_healthiest_base_player_wins_ties() {
        let mut s = state();
        s.match_time = MATCH_DURATION;
        assert_eq!(check_outcome(&s), Some(PLAYER_FACTION), "all tied at full hp");
        s.base_mut(PLAYER_FACTION).unwrap().hp = 2000.0;
        s.base_mut(Faction::Red).unwrap().hp = 2500.0;
        s.base_mut(Faction::Green).unwrap().hp = 1000.0;
        s.base_mut(Faction::Purple).unwrap().hp = 1000.0;
        assert_eq!(check_outcome(&s), Some(Faction::Red));
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(rating(0, 0, 0, false), Rating::C);
        assert_eq!(rating(4, 0, 0, false), Rating::B);
        assert_eq!(rating(4, 0, 0, true), Rating::A);
        assert_eq!(rating(5, 0, 3, true), Rating::S);
        assert_eq!(rating(0, 20, 0, false), Rating::C, "negative scores floor at C");
    }

    #[test]
    fn test_sequence_holds_waiting() {
        let mut go = GameOverState {
            phase: GameOverPhase::SlowMotion,
            elapsed: 0.0,
        };
        let total = GAME_OVER_SLOW_MOTION + GAME_OVER_ANIMATION + GAME_OVER_TEXT_REVEAL + GAME_OVER_STATS;
        let mut ticks = 0u32;
        while !can_restart(&go) {
            advance(&mut go, DT);
            ticks += 1;
        }
        assert!((ticks as f64 * DT - total).abs() <= DT + 1e-9);
        assert_eq!(advance(&mut go, 100.0), None);
        assert_eq!(go.phase, GameOverPhase::Waiting);
    }

    #[test]
    fn test_none_phase_is_inert() {
        let mut go = GameOverState::default();
        assert_eq!(advance(&mut go, 5.0), None);
        assert!(!can_restart(&go));
    }
}
