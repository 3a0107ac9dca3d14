// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tilewar: a real-time territorial strategy simulation on a tile grid.
//!
//! Countries grow citizens on their settlements, spread into the land
//! around them, march towards flags and fight wherever two populations
//! share a tile. The last country with citizens wins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Terminal host / headless survey   │
//! ├─────────────────────────────────────┤
//! │   GameState (timer, commands)       │
//! ├─────────────────────────────────────┤
//! │   Rules: march, combat, growth      │
//! ├─────────────────────────────────────┤
//! │   Grid, stencils, map generation    │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod survey;

pub use config::GameConfig;
pub use error::{ConfigError, MapGenError};

// Re-export key game types at crate root for convenience
pub use game::{
    Command, Control, Coord, Country, Difficulty, Direction, GameState, Grid, GridView, Outcome,
    PlayerId, Rules, Shape, Speed, TerrainClass, Tile,
};
