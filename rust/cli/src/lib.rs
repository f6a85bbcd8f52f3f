//! # Sequence CLI Library
//!
//! Command-line driver for the Sequence engine: batch simulations, single
//! transcribed games, statistics over recorded batches and configuration
//! inspection.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments, dispatches to a subcommand and returns the
//! process exit code.
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let code = sequence_cli::run(
//!     ["sequence", "sim", "--games", "2", "--seed", "1"],
//!     &mut out,
//!     &mut err,
//! );
//! assert_eq!(code, 0);
//! assert!(String::from_utf8_lossy(&out).contains("Simulated: 2 games"));
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Run N games in parallel, summarize and optionally record them,
//!   or compare every pairing of the heuristic presets
//! - `game`: Play one game and print its move log and final board
//! - `stats`: Aggregate a JSONL game-record file
//! - `cfg`: Display the resolved configuration and value sources

use clap::Parser;
use std::io::Write;

pub mod analytics;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod io_utils;
pub mod logging;
pub mod records;
pub mod ui;

use cli::{Commands, SequenceCli};
use commands::sim::SimOptions;
use commands::{
    handle_cfg_command, handle_game_command, handle_sim_command, handle_stats_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["sim", "game", "stats", "cfg"];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match SequenceCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Sim {
            games,
            game,
            threads,
            output,
            moves,
            summary,
            compare,
        } => {
            let opts = SimOptions {
                games,
                threads,
                output,
                moves,
                summary,
                compare,
            };
            handle_sim_command(&opts, &game, out)
        }
        Commands::Game { game, explain } => handle_game_command(&game, explain, out),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            2
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return if write!(out, "{}", e).is_err() { 2 } else { 0 };
    }
    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: sequence <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: sequence --help");
    2
}
