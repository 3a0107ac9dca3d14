//! Headless command implementation - play without a terminal.

use super::CliError;
use tilewar::game::render_text;
use tilewar::survey::{run_headless, GameSummary};
use tilewar::{GameConfig, GameState};
use tracing::debug;

/// Execute a headless game of `ticks` timer ticks and print its summary as
/// JSON.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
pub(crate) fn execute(config: &GameConfig, ticks: u64) -> Result<(), CliError> {
    let mut state = GameState::new(config)?;
    let counted = run_headless(&mut state, ticks);
    debug!("final grid:\n{}", render_text(&state.view()));

    let summary = GameSummary::of(&state, counted);
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}
