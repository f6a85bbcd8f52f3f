//! Command-line surface of the `sequence` binary.

use clap::{Args, Parser, Subcommand};
use sequence_ai::Strategy;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "sequence",
    version,
    about = "Bot-vs-bot simulator for the Sequence board game"
)]
pub struct SequenceCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Options shared by every command that plays games. Unset flags fall back to
/// the config file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct GameArgs {
    /// Base seed; game i of a batch uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,
    /// Strategy for player one (balanced, aggressive, defensive, random)
    #[arg(long)]
    pub p1: Option<Strategy>,
    /// Strategy for player two
    #[arg(long)]
    pub p2: Option<Strategy>,
    #[arg(long)]
    pub hand_size: Option<usize>,
    #[arg(long)]
    pub sequences_to_win: Option<usize>,
    /// Turn cap after which the game is a draw
    #[arg(long)]
    pub max_turns: Option<u32>,
}

impl GameArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            hand_size: self.hand_size,
            sequences_to_win: self.sequences_to_win,
            max_turns: self.max_turns,
            p1: self.p1,
            p2: self.p2,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run many games in parallel and summarize them
    Sim {
        #[arg(long)]
        games: u64,
        #[command(flatten)]
        game: GameArgs,
        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        threads: Option<usize>,
        /// JSONL file receiving one game record per line (.zst compresses)
        #[arg(long)]
        output: Option<String>,
        /// JSONL file receiving every move of every game, with its scores
        #[arg(long)]
        moves: Option<String>,
        /// JSON file receiving the summary, heatmaps and card frequencies
        #[arg(long)]
        summary: Option<String>,
        /// Play every pairing of the heuristic presets instead of p1 vs p2
        #[arg(long, conflicts_with_all = ["moves", "summary"])]
        compare: bool,
    },
    /// Play one game and print its move log and final board
    Game {
        #[command(flatten)]
        game: GameArgs,
        /// Show the score breakdown behind each heuristic move
        #[arg(long)]
        explain: bool,
    },
    /// Aggregate a JSONL game-record file
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        SequenceCli::command().debug_assert();
    }

    #[test]
    fn strategies_parse_from_flags() {
        let cli = SequenceCli::try_parse_from([
            "sequence", "sim", "--games", "3", "--p1", "aggressive", "--p2", "random",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Sim { games, game, .. } => {
                assert_eq!(games, 3);
                assert_eq!(game.p1, Some(Strategy::Aggressive));
                assert_eq!(game.p2, Some(Strategy::Random));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(SequenceCli::try_parse_from(["sequence", "game", "--p1", "greedy"]).is_err());
    }

    #[test]
    fn compare_excludes_per_game_outputs() {
        let ok = SequenceCli::try_parse_from([
            "sequence", "sim", "--games", "2", "--compare", "--output", "rows.jsonl",
        ]);
        assert!(ok.is_ok());
        let clash = SequenceCli::try_parse_from([
            "sequence", "sim", "--games", "2", "--compare", "--moves", "m.jsonl",
        ]);
        assert!(clash.is_err());
    }
}
