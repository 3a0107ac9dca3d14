//! Game configuration and its validation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::mapgen::{MapRequest, MAX_INEQUALITY};
use crate::game::{Difficulty, Rules, Shape, Speed, MAX_DIM, MIN_DIM};

/// `ChaCha` stream used to draw configuration values left to chance.
pub(crate) const SETUP_STREAM: u64 = 1;

/// `ChaCha` stream used by the running game.
pub(crate) const RUNTIME_STREAM: u64 = 2;

/// Everything needed to start a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed of the map and of every random choice in the game.
    pub seed: u64,
    /// Requested map width.
    pub width: i32,
    /// Map height.
    pub height: i32,
    /// Map shape.
    pub shape: Shape,
    /// Draw players, quality rank and inequality from the seed, ignoring the
    /// requested values.
    pub random: bool,
    /// Number of players; every available location when `None`.
    pub players: Option<usize>,
    /// Quality rank of the controlled player's start; drawn when `None`.
    pub quality_rank: Option<usize>,
    /// Inequality level; drawn when `None`.
    pub inequality: Option<u8>,
    /// Initial speed.
    pub speed: Speed,
    /// Difficulty of every autonomous country.
    pub difficulty: Difficulty,
    /// Put the controlled player on autopilot as well.
    pub autopilot_controlled: bool,
    /// Simulation coefficients.
    pub rules: Rules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 21,
            height: 21,
            shape: Shape::Rhombus,
            random: false,
            players: None,
            quality_rank: None,
            inequality: None,
            speed: Speed::Normal,
            difficulty: Difficulty::Normal,
            autopilot_controlled: false,
            rules: Rules::default(),
        }
    }
}

impl GameConfig {
    /// Width of the storage grid for the requested width.
    #[must_use]
    pub fn storage_width(&self) -> i32 {
        self.shape.storage_width(self.width, self.height)
    }

    /// Starting locations the configured map offers.
    #[must_use]
    pub fn available_locations(&self) -> usize {
        self.shape
            .available_locations(self.storage_width(), self.height)
    }

    /// Check the configuration without drawing anything.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIM..=MAX_DIM).contains(&value) {
                return Err(ConfigError::Dimension { axis, value });
            }
        }

        let available = self.available_locations();
        let players = self.players.unwrap_or(available);
        if !(2..=available).contains(&players) {
            return Err(ConfigError::PlayerCount {
                requested: players,
                available,
            });
        }
        if let Some(rank) = self.quality_rank.filter(|r| !(1..=players).contains(r)) {
            return Err(ConfigError::QualityRank {
                requested: rank,
                players,
            });
        }
        if let Some(level) = self.inequality.filter(|&l| l > MAX_INEQUALITY) {
            return Err(ConfigError::Inequality {
                requested: level,
                max: MAX_INEQUALITY,
            });
        }
        Ok(())
    }

    /// Validate and fill in every value left to chance.
    ///
    /// Draws come from a stream of the game seed, so the reported seed alone
    /// reproduces the map.
    ///
    /// # Errors
    ///
    /// Returns an error if [`GameConfig::validate`] fails.
    pub fn resolve(&self) -> Result<MapRequest, ConfigError> {
        self.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(SETUP_STREAM);

        let available = self.available_locations();
        let (players, quality_rank, inequality) = if self.random {
            let players = rng.gen_range(2..=available);
            let rank = rng.gen_range(1..=players);
            let level = rng.gen_range(0..=MAX_INEQUALITY);
            (players, rank, level)
        } else {
            let players = self.players.unwrap_or(available);
            let rank = match self.quality_rank {
                Some(rank) => rank,
                None => rng.gen_range(1..=players),
            };
            let level = match self.inequality {
                Some(level) => level,
                None => rng.gen_range(0..=MAX_INEQUALITY),
            };
            (players, rank, level)
        };

        Ok(MapRequest {
            seed: self.seed,
            width: self.storage_width(),
            height: self.height,
            shape: self.shape,
            players,
            quality_rank,
            inequality,
        })
    }
}
