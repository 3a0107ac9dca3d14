//! Tilewar CLI - play the game in a terminal, headless, or as a survey.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Tilewar - real-time territorial strategy on a tile grid
#[derive(Parser, Debug)]
#[command(name = "tilewar")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    game: cli::GameArgs,

    /// Play TICKS timer ticks without a terminal and print a JSON summary
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log debug events
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play many autonomous games and count wins by starting quality rank
    Survey {
        /// Number of games to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Simulation steps before a game counts as undecided
        #[arg(short = 't', long, default_value = "5000")]
        max_steps: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SurveyFormat,

        /// Show progress spinner
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let interactive = args.command.is_none() && args.headless.is_none();

    if let Err(e) = init_logging(args.log_file.as_deref(), args.verbose, interactive) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let config = args.game.into_config();
    let result = match (args.command, args.headless) {
        (Some(Commands::Survey {
            games,
            max_steps,
            threads,
            format,
            progress,
        }), _) => cli::survey::execute(&config, games, max_steps, threads, format, progress),
        (None, Some(ticks)) => cli::headless::execute(&config, ticks),
        (None, None) => cli::play::execute(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Install the log subscriber.
///
/// The interactive game owns the terminal, so it only logs when a log file
/// is given.
fn init_logging(
    log_file: Option<&Path>,
    verbose: bool,
    interactive: bool,
) -> Result<(), cli::CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "tilewar=debug" } else { "tilewar=info" })
    });
    let builder = fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if interactive => {}
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
