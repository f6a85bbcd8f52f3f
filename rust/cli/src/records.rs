//! Records written by `sim` and read back by `stats`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sequence_ai::Strategy;
use sequence_engine::player::Player;
use sequence_engine::record::{GameSummary, MoveRecord, Outcome, PlayerTally};
use sequence_engine::sequence::Direction;

use crate::analytics::{BoardAnalytics, GameTally, MoveInsight};

/// One line of the game-record JSONL file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: u64,
    pub seed: u64,
    pub p1: Strategy,
    pub p2: Strategy,
    pub outcome: Option<Outcome>,
    pub winner: Option<Player>,
    pub turns: u32,
    pub players: [PlayerTally; 2],
    pub first_sequence_turn: Option<u32>,
    pub first_sequence_player: Option<Player>,
    pub first_sequence_direction: Option<Direction>,
    pub reshuffles: u32,
    /// Moves flagged as blocking an opponent line, per player
    #[serde(default)]
    pub blocking_moves: [u32; 2],
    #[serde(default)]
    pub average_offense: [f64; 2],
    #[serde(default)]
    pub average_defense: [f64; 2],
    /// Wall-clock time the game took
    #[serde(default)]
    pub duration_ms: u64,
    /// RFC 3339 completion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

impl GameRecord {
    pub fn new(game_id: u64, strategies: [Strategy; 2], summary: GameSummary) -> Self {
        Self {
            game_id,
            seed: summary.seed,
            p1: strategies[0],
            p2: strategies[1],
            outcome: summary.outcome,
            winner: summary.winner,
            turns: summary.turns,
            players: summary.players,
            first_sequence_turn: summary.first_sequence_turn,
            first_sequence_player: summary.first_sequence_player,
            first_sequence_direction: summary.first_sequence_direction,
            reshuffles: summary.reshuffles,
            blocking_moves: [0; 2],
            average_offense: [0.0; 2],
            average_defense: [0.0; 2],
            duration_ms: 0,
            ts: None,
        }
    }

    pub fn with_tally(mut self, tally: &GameTally) -> Self {
        self.blocking_moves = tally.blocking_moves();
        self.average_offense = tally.average_offense();
        self.average_defense = tally.average_defense();
        self
    }
}

/// One line of the move JSONL file: the engine record plus what the
/// evaluator saw.
#[derive(Debug, Serialize)]
pub struct MoveLine<'a> {
    pub game_id: u64,
    #[serde(flatten)]
    pub record: &'a MoveRecord,
    #[serde(flatten)]
    pub insight: &'a MoveInsight,
}

/// Aggregate over a batch of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub games: u64,
    pub p1_wins: u64,
    pub p2_wins: u64,
    pub draws: u64,
    pub p1_win_rate: f64,
    pub p2_win_rate: f64,
    pub draw_rate: f64,
    pub average_length: f64,
    pub min_length: u32,
    pub max_length: u32,
    pub average_first_sequence_turn: Option<f64>,
    pub jacks_used: [u64; 2],
    pub removals: [u64; 2],
    pub blocking_moves: [u64; 2],
    /// Direction of each game's first sequence
    pub sequence_directions: BTreeMap<String, u64>,
}

impl BatchSummary {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut s = BatchSummary {
            games: records.len() as u64,
            min_length: records.iter().map(|r| r.turns).min().unwrap_or(0),
            max_length: records.iter().map(|r| r.turns).max().unwrap_or(0),
            ..Default::default()
        };
        let mut total_turns = 0u64;
        let mut first_turns = Vec::new();
        for r in records {
            match r.winner {
                Some(Player::One) => s.p1_wins += 1,
                Some(Player::Two) => s.p2_wins += 1,
                None => s.draws += 1,
            }
            total_turns += u64::from(r.turns);
            if let Some(t) = r.first_sequence_turn {
                first_turns.push(f64::from(t));
            }
            if let Some(d) = r.first_sequence_direction {
                *s.sequence_directions.entry(d.as_str().to_string()).or_default() += 1;
            }
            for (i, tally) in r.players.iter().enumerate() {
                s.jacks_used[i] += u64::from(tally.jacks_used);
                s.removals[i] += u64::from(tally.removals);
                s.blocking_moves[i] += u64::from(r.blocking_moves[i]);
            }
        }
        s.p1_win_rate = crate::ui::percent(s.p1_wins, s.games);
        s.p2_win_rate = crate::ui::percent(s.p2_wins, s.games);
        s.draw_rate = crate::ui::percent(s.draws, s.games);
        if s.games > 0 {
            s.average_length = total_turns as f64 / s.games as f64;
        }
        if !first_turns.is_empty() {
            s.average_first_sequence_turn =
                Some(first_turns.iter().sum::<f64>() / first_turns.len() as f64);
        }
        s
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Player 1 wins: {} ({:.1}%)\n",
            self.p1_wins, self.p1_win_rate
        ));
        out.push_str(&format!(
            "Player 2 wins: {} ({:.1}%)\n",
            self.p2_wins, self.p2_win_rate
        ));
        out.push_str(&format!("Draws: {} ({:.1}%)\n", self.draws, self.draw_rate));
        out.push_str(&format!(
            "Game length: avg {:.1}, min {}, max {}\n",
            self.average_length, self.min_length, self.max_length
        ));
        match self.average_first_sequence_turn {
            Some(t) => out.push_str(&format!("Average first sequence turn: {t:.1}\n")),
            None => out.push_str("Average first sequence turn: n/a\n"),
        }
        if !self.sequence_directions.is_empty() {
            out.push_str("First sequence directions:\n");
            for (dir, n) in &self.sequence_directions {
                out.push_str(&format!("  {dir}: {n}\n"));
            }
        }
        out
    }
}

/// Summary file written by `sim --summary`.
#[derive(Debug, Serialize)]
pub struct SimReport<'a> {
    pub base_seed: u64,
    pub p1: Strategy,
    pub p2: Strategy,
    #[serde(flatten)]
    pub summary: &'a BatchSummary,
    #[serde(flatten)]
    pub analytics: &'a BoardAnalytics,
}

/// One pairing of a strategy comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub p1: Strategy,
    pub p2: Strategy,
    pub games: u64,
    pub p1_win_rate: f64,
    pub p2_win_rate: f64,
    pub draw_rate: f64,
    pub average_length: f64,
}

impl ComparisonRow {
    pub fn new(p1: Strategy, p2: Strategy, summary: &BatchSummary) -> Self {
        Self {
            p1,
            p2,
            games: summary.games,
            p1_win_rate: summary.p1_win_rate,
            p2_win_rate: summary.p2_win_rate,
            draw_rate: summary.draw_rate,
            average_length: summary.average_length,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{} vs {}: P1 {:.1}%  P2 {:.1}%  Draws {:.1}%  avg {:.1} turns",
            self.p1, self.p2, self.p1_win_rate, self.p2_win_rate, self.draw_rate, self.average_length
        )
    }
}
