//! Players, countries and the difficulty table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier for a player, in `[0, MAX_PLAYERS)`.
pub type PlayerId = u8;

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 8;

/// The player steered by the human at the keyboard.
pub const CONTROLLED_PLAYER: PlayerId = 0;

/// Skill level of an autonomous country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Slow to react, barely expands.
    Easiest,
    /// Reacts occasionally.
    Easy,
    /// Default opponent.
    Normal,
    /// Frequent, far-sighted decisions.
    Hard,
    /// Near-constant decisions with long lookahead.
    Hardest,
}

/// Tuning for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    /// Simulation ticks between two decisions.
    pub decision_interval: u64,
    /// Weight on own nearby strength when judging an attack.
    pub aggression: f64,
    /// Stencil radius the country looks around a tile.
    pub lookahead: i32,
    /// Flags kept at once.
    pub max_flags: usize,
    /// Settlements attempted per decision.
    pub builds_per_decision: usize,
}

const PROFILES: [Profile; 5] = [
    Profile {
        decision_interval: 40,
        aggression: 0.5,
        lookahead: 1,
        max_flags: 1,
        builds_per_decision: 0,
    },
    Profile {
        decision_interval: 24,
        aggression: 0.8,
        lookahead: 1,
        max_flags: 2,
        builds_per_decision: 1,
    },
    Profile {
        decision_interval: 12,
        aggression: 1.0,
        lookahead: 2,
        max_flags: 3,
        builds_per_decision: 1,
    },
    Profile {
        decision_interval: 6,
        aggression: 1.3,
        lookahead: 3,
        max_flags: 4,
        builds_per_decision: 1,
    },
    Profile {
        decision_interval: 3,
        aggression: 1.6,
        lookahead: 4,
        max_flags: 6,
        builds_per_decision: 2,
    },
];

impl Difficulty {
    /// All levels from easiest to hardest.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easiest,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Hardest,
    ];

    /// Tuning for this level.
    #[must_use]
    pub const fn profile(self) -> Profile {
        PROFILES[self as usize]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Difficulty::Easiest => "ee",
            Difficulty::Easy => "e",
            Difficulty::Normal => "n",
            Difficulty::Hard => "h",
            Difficulty::Hardest => "hh",
        };
        f.write_str(code)
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ee" | "e2" => Ok(Difficulty::Easiest),
            "e" | "e1" => Ok(Difficulty::Easy),
            "n" => Ok(Difficulty::Normal),
            "h" | "h1" => Ok(Difficulty::Hard),
            "hh" | "h2" => Ok(Difficulty::Hardest),
            other => Err(ConfigError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// A player's aggregate strategic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Country {
    /// Player this country belongs to.
    pub id: PlayerId,
    /// Skill of the automatic player, or `None` when nobody decides for it.
    pub autopilot: Option<Difficulty>,
    /// Settlements this country has founded.
    pub builds: u32,
    /// Simulation tick of the last autopilot decision.
    pub last_decision: Option<u64>,
}

impl Country {
    /// A country steered by a person.
    #[must_use]
    pub const fn human(id: PlayerId) -> Self {
        Self {
            id,
            autopilot: None,
            builds: 0,
            last_decision: None,
        }
    }

    /// A country steered by the autopilot at the given difficulty.
    #[must_use]
    pub const fn autonomous(id: PlayerId, difficulty: Difficulty) -> Self {
        Self {
            id,
            autopilot: Some(difficulty),
            builds: 0,
            last_decision: None,
        }
    }

    /// Whether the autopilot decides for this country.
    #[must_use]
    pub const fn is_autonomous(&self) -> bool {
        self.autopilot.is_some()
    }
}
