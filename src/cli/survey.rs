//! Survey command implementation.

// Throughput is reported as floating point
#![allow(clippy::cast_precision_loss)]

use super::output::{format_survey_text, JsonSurveyResult};
use super::{CliError, SurveyFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tilewar::survey::run_survey;
use tilewar::GameConfig;

/// Execute the survey command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
pub(crate) fn execute(
    config: &GameConfig,
    games: u64,
    max_steps: u64,
    threads: Option<usize>,
    format: SurveyFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Fail fast instead of rejecting every game
    config.validate()?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .map_err(|e| CliError::new(e.to_string()))?,
        );
        pb.set_message(format!("playing {games} games"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_survey(config, games, max_steps);
    let duration = start.elapsed();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let players = match config.players {
        Some(players) if !config.random => players,
        _ => config.available_locations(),
    };

    match format {
        SurveyFormat::Text => {
            let games_per_sec = if duration.as_secs_f64() > 0.0 {
                stats.games as f64 / duration.as_secs_f64()
            } else {
                0.0
            };
            println!();
            print!("{}", format_survey_text(&stats, players));
            println!();
            println!(
                "Duration: {:.2}s ({:.1} games/sec)",
                duration.as_secs_f64(),
                games_per_sec
            );
        }
        SurveyFormat::Json => {
            let json_result = JsonSurveyResult::from_stats(&stats, players);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
