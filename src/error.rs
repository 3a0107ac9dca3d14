//! Error types for configuration and map generation.
//!
//! Simulation operations never fail: invalid commands are ignored and
//! out-of-grid coordinates are clamped by the caller. Errors only arise while
//! a game is being set up.

use crate::game::{MAX_DIM, MIN_DIM};

/// Invalid game configuration, reported before any game starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Width or height outside the accepted range.
    #[error("{axis} must be between {} and {}, got {value}", MIN_DIM, MAX_DIM)]
    Dimension {
        /// Which dimension was rejected.
        axis: &'static str,
        /// Value that was requested.
        value: i32,
    },
    /// Player count outside `[2, available]`.
    #[error("the number of players must be between 2 and {available} for this map, got {requested}")]
    PlayerCount {
        /// Players requested.
        requested: usize,
        /// Starting locations the map offers.
        available: usize,
    },
    /// Quality rank outside `[1, players]`.
    #[error("the quality rank must be between 1 and {players}, got {requested}")]
    QualityRank {
        /// Rank requested.
        requested: usize,
        /// Players in the game.
        players: usize,
    },
    /// Inequality level above the highest level.
    #[error("the inequality level must be between 0 and {max}, got {requested}")]
    Inequality {
        /// Level requested.
        requested: u8,
        /// Highest accepted level.
        max: u8,
    },
    /// Unknown map shape name.
    #[error("unknown map shape '{0}' (expected rhombus, rect or hex)")]
    UnknownShape(String),
    /// Unknown difficulty code.
    #[error("unknown difficulty '{0}' (expected ee, e, n, h or hh)")]
    UnknownDifficulty(String),
    /// Unknown speed code.
    #[error("unknown speed '{0}' (expected p, sss, ss, s, n, f, ff or fff)")]
    UnknownSpeed(String),
    /// The generator could not place the starting territories.
    #[error(transparent)]
    MapGen(#[from] MapGenError),
}

/// Preconditions of the map generator that did not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapGenError {
    /// The grid could not be allocated.
    #[error("cannot build a {width}x{height} grid")]
    EmptyGrid {
        /// Storage width.
        width: i32,
        /// Height.
        height: i32,
    },
    /// Fewer starting anchors fit than players were requested.
    #[error("only {found} starting locations fit on this map, {needed} needed")]
    NotEnoughLocations {
        /// Anchors found.
        found: usize,
        /// Players requested.
        needed: usize,
    },
    /// Requested quality rank is not among the chosen starts.
    #[error("quality rank {rank} does not exist among {players} starts")]
    RankOutOfRange {
        /// Rank requested.
        rank: usize,
        /// Starts chosen.
        players: usize,
    },
}
