//! CLI command implementations for Tilewar.

pub(crate) mod headless;
pub(crate) mod play;
pub(crate) mod survey;

mod output;

use clap::{Args, ValueEnum};
use std::error::Error;
use std::fmt;
use tilewar::{ConfigError, Difficulty, GameConfig, Shape, Speed};

/// Output format for the `survey` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SurveyFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Options describing the game to set up.
#[derive(Args, Debug, Clone)]
pub(crate) struct GameArgs {
    /// Map width (14 to 80)
    #[arg(short = 'W', long, default_value_t = 21)]
    pub(crate) width: i32,

    /// Map height (14 to 80)
    #[arg(short = 'H', long, default_value_t = 21)]
    pub(crate) height: i32,

    /// Map shape: rhombus, rect or hex
    #[arg(short = 'S', long, default_value = "rhombus")]
    pub(crate) shape: Shape,

    /// Number of players (0 uses every available location)
    #[arg(short = 'l', long, default_value_t = 0)]
    pub(crate) locations: usize,

    /// Inequality between starting populations (0 to 4, default: random)
    #[arg(short = 'i', long)]
    pub(crate) inequality: Option<u8>,

    /// Quality rank of your starting location (1 is best, default: random)
    #[arg(short = 'q', long)]
    pub(crate) quality: Option<usize>,

    /// Draw players, quality rank and inequality from the seed
    #[arg(short = 'r', long)]
    pub(crate) random: bool,

    /// Difficulty of the other countries: ee, e, n, h or hh
    #[arg(short = 'd', long, default_value = "n")]
    pub(crate) difficulty: Difficulty,

    /// Initial speed: p, sss, ss, s, n, f, ff or fff
    #[arg(short = 's', long, default_value = "n")]
    pub(crate) speed: Speed,

    /// Map seed (default: random)
    #[arg(short = 'R', long)]
    pub(crate) seed: Option<u64>,
}

impl GameArgs {
    /// Build the game configuration, drawing a seed if none was given.
    pub(crate) fn into_config(self) -> GameConfig {
        let seed = self.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
                .unwrap_or(42)
        });
        GameConfig {
            seed,
            width: self.width,
            height: self.height,
            shape: self.shape,
            random: self.random,
            players: (self.locations != 0).then_some(self.locations),
            quality_rank: self.quality,
            inequality: self.inequality,
            speed: self.speed,
            difficulty: self.difficulty,
            ..GameConfig::default()
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}
