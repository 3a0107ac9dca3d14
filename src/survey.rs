//! Headless play and batch surveys of autonomous games.
//!
//! A survey plays many games where every country, the controlled one
//! included, is driven by the autopilot, over consecutive seeds in parallel.
//! Counting which starting quality rank wins is how the simulation
//! coefficients get balanced.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::mapgen::MapRequest;
use crate::game::{survivors, GameState, Outcome, PlayerId, MAX_PLAYERS};

/// Final state of one game, as reported by the headless modes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    /// Seed the game was generated from.
    pub seed: u64,
    /// Resolved map parameters.
    pub map: MapRequest,
    /// Timer ticks counted.
    pub ticks: u64,
    /// Simulation steps run.
    pub steps: u64,
    /// Result from the controlled player's point of view.
    pub outcome: Outcome,
    /// Citizens of every player in the game, indexed by player.
    pub populations: Vec<u64>,
    /// Players with citizens left.
    pub survivors: Vec<PlayerId>,
    /// Starting quality rank of the last player standing, if there is one.
    pub winner_rank: Option<usize>,
}

impl GameSummary {
    /// Summarize a game after `ticks` timer ticks.
    #[must_use]
    pub fn of(state: &GameState, ticks: u64) -> Self {
        let alive = survivors(&state.grid);
        let winner_rank = match alive.as_slice() {
            [only] => state.starts.get(usize::from(*only)).map(|s| s.rank),
            _ => None,
        };
        Self {
            seed: state.map_seed,
            map: state.request,
            ticks,
            steps: state.tick,
            outcome: state.outcome,
            populations: state.populations()[..state.countries.len()].to_vec(),
            survivors: alive,
            winner_rank,
        }
    }
}

/// Count up to `ticks` timer ticks on `state` without input, stopping early
/// once the game is decided.
///
/// Returns the ticks actually counted.
pub fn run_headless(state: &mut GameState, ticks: u64) -> u64 {
    let mut counted = 0;
    while counted < ticks && !state.outcome.is_decided() {
        state.timer_tick();
        counted += 1;
    }
    counted
}

/// Play a game with every country on autopilot until one country is left or
/// `max_steps` simulation steps have run.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn play_autonomous(config: &GameConfig, max_steps: u64) -> Result<GameSummary, ConfigError> {
    let config = GameConfig {
        autopilot_controlled: true,
        ..*config
    };
    let mut state = GameState::new(&config)?;
    while state.tick < max_steps && survivors(&state.grid).len() > 1 {
        state.advance();
        state.evaluate();
    }
    debug!(seed = config.seed, steps = state.tick, "autonomous game finished");
    Ok(GameSummary::of(&state, 0))
}

/// Aggregated results of a survey.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurveyStats {
    /// Games played to completion or to the step limit.
    pub games: u64,
    /// Games that ended with a single country left.
    pub decided: u64,
    /// Wins per starting quality rank; index 0 is rank 1.
    pub wins_by_rank: Vec<u64>,
    /// Games whose configuration was rejected.
    pub rejected: u64,
    total_steps: u64,
}

impl SurveyStats {
    /// Empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wins_by_rank: vec![0; MAX_PLAYERS],
            ..Self::default()
        }
    }

    /// Add one game.
    pub fn add_result(&mut self, summary: &GameSummary) {
        self.games += 1;
        self.total_steps += summary.steps;
        if let Some(rank) = summary.winner_rank {
            self.decided += 1;
            if let Some(wins) = self.wins_by_rank.get_mut(rank.saturating_sub(1)) {
                *wins += 1;
            }
        }
    }

    /// Merge statistics gathered on another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games += other.games;
        self.decided += other.decided;
        self.rejected += other.rejected;
        self.total_steps += other.total_steps;
        for (a, b) in self.wins_by_rank.iter_mut().zip(&other.wins_by_rank) {
            *a += b;
        }
    }

    /// Mean simulation steps per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_steps(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.games as f64
        }
    }
}

/// Play `games` autonomous games on consecutive seeds starting at the
/// configured seed.
#[must_use]
pub fn run_survey(config: &GameConfig, games: u64, max_steps: u64) -> SurveyStats {
    (0..games)
        .into_par_iter()
        .fold(SurveyStats::new, |mut local, i| {
            let game = GameConfig {
                seed: config.seed.wrapping_add(i),
                ..*config
            };
            match play_autonomous(&game, max_steps) {
                Ok(summary) => local.add_result(&summary),
                Err(e) => {
                    warn!(seed = game.seed, error = %e, "survey game rejected");
                    local.rejected += 1;
                }
            }
            local
        })
        .reduce(SurveyStats::new, |mut a, b| {
            a.merge(&b);
            a
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            seed: 5,
            players: Some(2),
            quality_rank: Some(1),
            inequality: Some(0),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_headless_counts_ticks() {
        let mut state = GameState::new(&config()).unwrap();
        let ticks = run_headless(&mut state, 200);
        let summary = GameSummary::of(&state, ticks);
        assert_eq!(summary.ticks, 200);
        // Normal speed steps every 20 timer ticks.
        assert_eq!(summary.steps, 10);
        assert_eq!(summary.populations.len(), 2);
        assert_eq!(summary.outcome, Outcome::Ongoing);
    }

    #[test]
    fn test_headless_stops_when_decided() {
        let mut state = GameState::new(&config()).unwrap();
        for tile in state.grid.tiles_mut() {
            tile.set_citizens(1, 0);
        }
        state.evaluate();
        assert_eq!(run_headless(&mut state, 500), 0);
    }

    #[test]
    fn test_autonomous_game_respects_step_limit() {
        let summary = play_autonomous(&config(), 30).unwrap();
        assert!(summary.steps <= 30);
        assert!(!summary.survivors.is_empty());
    }

    #[test]
    fn test_stats_merge() {
        let mut a = SurveyStats::new();
        let mut summary = play_autonomous(&config(), 5).unwrap();
        summary.winner_rank = Some(2);
        a.add_result(&summary);
        let mut b = SurveyStats::new();
        b.add_result(&summary);
        b.rejected = 1;
        a.merge(&b);
        assert_eq!(a.games, 2);
        assert_eq!(a.decided, 2);
        assert_eq!(a.wins_by_rank[1], 2);
        assert_eq!(a.rejected, 1);
        assert!((a.average_steps() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_survey_is_reproducible() {
        let a = run_survey(&config(), 3, 40);
        let b = run_survey(&config(), 3, 40);
        assert_eq!(a, b);
        assert_eq!(a.games + a.rejected, 3);
    }
}
