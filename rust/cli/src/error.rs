//! Error types for the CLI application.
//!
//! Every command handler returns [`CliError`]; [`crate::run`] prints it as
//! `Error: ...` and maps it to exit code 2.

use sequence_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or command-line arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A game rule invariant failed while simulating
    #[error("Engine error: {0}")]
    Engine(#[from] GameError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
