//! Command handler modules for the `sequence` CLI.
//!
//! Each command lives in its own module with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers specific to that command
//! - Output streams (`&mut dyn Write`) passed as parameters
//! - Errors propagated via the `CliError` enum

pub mod cfg;
pub mod game;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use game::handle_game_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;
