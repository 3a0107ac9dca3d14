//! Game layer for Tilewar.
//!
//! Implements the rules of the simulation:
//! - Grid of tiles on a rhombus, rectangle or hexagon stencil
//! - Countries with per-tile citizens, flags and settlements
//! - Local phase (combat, growth, spread) and marching towards flags
//! - Autopilot decisions for autonomous countries
//! - Timer, speed and win/loss evaluation

mod autopilot;
mod combat;
mod command;
mod economy;
mod flags;
pub mod invariants;
mod map;
pub mod mapgen;
mod march;
mod migration;
mod outcome;
mod player;
mod rules;
mod speed;
mod state;
mod stencil;
mod view;

pub use autopilot::{decide, is_decision_tick, is_losing, run_autopilots};
pub use combat::{attrition_loss, resolve_combat, resolve_tile_combat, CombatResult};
pub use command::{step_cursor, Command, Control, Direction};
pub use economy::{
    apply_growth, build, growth, simulate, spread_transfers, update_ownership, EconomyResult,
};
pub use flags::{add_flag, remove_flag, remove_flags_with_prob, toggle_flag, FlagKind, FlagSet};
pub use map::{Coord, Grid, TerrainClass, Tile, UnitKind, UNIT_KINDS};
pub use march::{flag_field, kings_move, march_transfers, UNREACHED};
pub use migration::{apply_transfers, Transfer};
pub use outcome::{evaluate, survivors, Outcome};
pub use player::{Country, Difficulty, PlayerId, Profile, CONTROLLED_PLAYER, MAX_PLAYERS};
pub use rules::{Rules, TIMER_INTERVAL_MS, TIMER_PERIOD};
pub use speed::Speed;
pub use state::{GameState, TickReport};
pub use stencil::{Shape, MAX_DIM, MIN_DIM};
pub use view::{
    density_cell, density_glyph, dominant_player, render_text, tile_cell, GridView,
};
