//! Output formatting utilities for CLI.

// Rates are reported as floating point
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use tilewar::survey::SurveyStats;

/// JSON-serializable survey result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSurveyResult {
    /// Games played.
    games: u64,
    /// Games that ended with one country left.
    decided: u64,
    /// Games whose configuration was rejected.
    rejected: u64,
    /// Average game length in simulation steps.
    avg_steps: f64,
    /// Wins per starting quality rank.
    ranks: Vec<JsonRankWins>,
}

/// JSON-serializable wins of one quality rank.
#[derive(Debug, Serialize)]
pub(super) struct JsonRankWins {
    /// Quality rank (1 is best).
    rank: usize,
    /// Games won from this rank.
    wins: u64,
    /// Share of decided games won from this rank (0.0-1.0).
    win_rate: f64,
}

impl JsonSurveyResult {
    /// Create from survey stats, listing ranks up to `players`.
    pub(super) fn from_stats(stats: &SurveyStats, players: usize) -> Self {
        let ranks = (0..players)
            .map(|i| JsonRankWins {
                rank: i + 1,
                wins: stats.wins_by_rank.get(i).copied().unwrap_or(0),
                win_rate: win_rate(stats, i),
            })
            .collect();

        Self {
            games: stats.games,
            decided: stats.decided,
            rejected: stats.rejected,
            avg_steps: stats.average_steps(),
            ranks,
        }
    }
}

/// Share of decided games won from rank index `idx` (0.0-1.0).
fn win_rate(stats: &SurveyStats, idx: usize) -> f64 {
    if stats.decided == 0 {
        return 0.0;
    }
    stats.wins_by_rank.get(idx).copied().unwrap_or(0) as f64 / stats.decided as f64
}

/// Format survey stats as human-readable text.
pub(super) fn format_survey_text(stats: &SurveyStats, players: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Survey Results ({} games)\n", stats.games));
    output.push_str("========================================\n\n");

    output.push_str("Wins by starting quality rank:\n");
    for i in 0..players {
        let wins = stats.wins_by_rank.get(i).copied().unwrap_or(0);
        output.push_str(&format!(
            "  Rank {}: {:.1}% ({} wins)\n",
            i + 1,
            win_rate(stats, i) * 100.0,
            wins
        ));
    }
    output.push_str(&format!(
        "  Undecided: {}\n",
        stats.games.saturating_sub(stats.decided)
    ));
    if stats.rejected > 0 {
        output.push_str(&format!("  Rejected: {}\n", stats.rejected));
    }

    output.push_str(&format!(
        "\nAverage Game Length: {:.0} steps\n",
        stats.average_steps()
    ));

    output
}
