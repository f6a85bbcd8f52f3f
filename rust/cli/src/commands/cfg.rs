//! Configuration command handler.
//!
//! Prints every setting as `{"value": ..., "source": "default|file|env"}`.

use std::io::Write;

use crate::config;
use crate::error::CliError;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "seed": { "value": config.seed, "source": sources.seed },
        "hand_size": { "value": config.hand_size, "source": sources.hand_size },
        "sequences_to_win": {
            "value": config.sequences_to_win,
            "source": sources.sequences_to_win,
        },
        "max_turns": { "value": config.max_turns, "source": sources.max_turns },
        "p1": { "value": config.p1, "source": sources.p1 },
        "p2": { "value": config.p2, "source": sources.p2 },
        "p1_weights": { "value": config.p1_weights, "source": sources.p1_weights },
        "p2_weights": { "value": config.p2_weights, "source": sources.p2_weights },
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&display)?)?;
    Ok(())
}
