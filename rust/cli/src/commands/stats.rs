//! Statistics aggregation over JSONL game-record files.

use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::records::{BatchSummary, GameRecord};
use crate::ui;

#[derive(Debug, Default)]
struct StatsState {
    records: Vec<GameRecord>,
    /// Lines that did not parse
    corrupted: u64,
    /// Unterminated final lines, typically from an interrupted writer
    incomplete: u64,
}

impl StatsState {
    fn consume(&mut self, content: &str) {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            match serde_json::from_str::<GameRecord>(line) {
                Ok(rec) => self.records.push(rec),
                Err(e) => {
                    if i == lines.len() - 1 && !has_trailing_nl {
                        self.incomplete += 1;
                    } else {
                        warn!(line = i + 1, error = %e, "skipping corrupted game record");
                        self.corrupted += 1;
                    }
                }
            }
        }
    }
}

/// Aggregates game records from a JSONL file (plain or .zst) or a directory
/// of them, printing the [`BatchSummary`] as JSON.
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState::default();

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let Ok(rd) = std::fs::read_dir(&d) else {
                continue;
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                } else if let Some(fname) = p.file_name().and_then(|f| f.to_str())
                    && (fname.ends_with(".jsonl") || fname.ends_with(".jsonl.zst"))
                {
                    match read_text_auto(&p.to_string_lossy()) {
                        Ok(content) => state.consume(&content),
                        Err(e) => {
                            warn!(file = %p.display(), error = %e, "unreadable record file");
                            state.corrupted += 1;
                        }
                    }
                }
            }
        }
    } else {
        let content = read_text_auto(&input)
            .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", input, e)))?;
        state.consume(&content);
    }

    if state.corrupted > 0 {
        ui::display_warning(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.incomplete > 0 {
        ui::display_warning(
            err,
            &format!("Discarded {} incomplete final line(s)", state.incomplete),
        )?;
    }
    if state.records.is_empty() && (state.corrupted > 0 || state.incomplete > 0) {
        return Err(CliError::InvalidInput("no valid game records".to_string()));
    }

    let summary = BatchSummary::from_records(&state.records);
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_last_line_counts_as_incomplete() {
        let mut state = StatsState::default();
        state.consume("not json\n{\"game_id\":");
        assert_eq!(state.corrupted, 1);
        assert_eq!(state.incomplete, 1);
        assert!(state.records.is_empty());
    }
}
