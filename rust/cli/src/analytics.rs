//! Move-level and board-level analytics gathered during `sim`.
//!
//! [`MoveInsight`] is captured before each move is applied, so chip, sequence
//! and deck counts describe the position the mover saw. [`GameTally`] folds
//! insights into per-game numbers for the [`GameRecord`](crate::records::GameRecord),
//! and [`BoardAnalytics`] accumulates heatmaps and card frequencies across a
//! batch.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sequence_ai::Weights;
use sequence_ai::evaluator;
use sequence_engine::board::{Board, Pos, SIZE};
use sequence_engine::game::GameState;
use sequence_engine::player::Player;
use sequence_engine::record::{ActionKind, MoveRecord};
use sequence_engine::rules::Move;

/// Evaluator scores of a move plus the position it was played from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveInsight {
    pub offense: f64,
    pub defense: f64,
    pub total: f64,
    pub creates_sequence: bool,
    pub blocks_opponent: bool,
    pub player_chips: usize,
    pub opponent_chips: usize,
    pub player_sequences: usize,
    pub opponent_sequences: usize,
    /// Draw pile size before the move
    pub cards_in_deck: usize,
}

impl MoveInsight {
    /// Scores `mv` for the active player with `weights`. Random bots are
    /// scored too, so their lines stay comparable with heuristic ones.
    pub fn capture(state: &GameState, mv: Move, weights: &Weights) -> Self {
        let player = state.active_player();
        let opponent = player.opponent();
        let eval = evaluator::evaluate(state, mv, weights);
        Self {
            offense: eval.breakdown.offense,
            defense: eval.breakdown.defense,
            total: eval.total,
            creates_sequence: eval.creates_sequence,
            blocks_opponent: eval.blocks_opponent,
            player_chips: state.board().chips(player),
            opponent_chips: state.board().chips(opponent),
            player_sequences: state.sequence_count(player),
            opponent_sequences: state.sequence_count(opponent),
            cards_in_deck: state.deck().remaining(),
        }
    }
}

/// Per-player running totals for one game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTally {
    moves: [u32; 2],
    blocking: [u32; 2],
    offense: [f64; 2],
    defense: [f64; 2],
}

impl GameTally {
    pub fn add(&mut self, player: Player, insight: &MoveInsight) {
        let i = player.index();
        self.moves[i] += 1;
        if insight.blocks_opponent {
            self.blocking[i] += 1;
        }
        self.offense[i] += insight.offense;
        self.defense[i] += insight.defense;
    }

    pub fn blocking_moves(&self) -> [u32; 2] {
        self.blocking
    }

    pub fn average_offense(&self) -> [f64; 2] {
        [0, 1].map(|i| mean(self.offense[i], self.moves[i]))
    }

    pub fn average_defense(&self) -> [f64; 2] {
        [0, 1].map(|i| mean(self.defense[i], self.moves[i]))
    }
}

fn mean(sum: f64, n: u32) -> f64 {
    if n == 0 { 0.0 } else { sum / f64::from(n) }
}

/// Where chips land and which cards get played, over a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardAnalytics {
    pub moves: u64,
    /// Placements per cell, `[row][col]`
    pub position_heatmap: [[u64; SIZE]; SIZE],
    /// Winner's chips on the final board, `[row][col]`
    pub winning_position_heatmap: [[u64; SIZE]; SIZE],
    /// Placements per card
    pub card_play_frequency: BTreeMap<String, u64>,
    /// Every card the eventual winner played
    pub winning_card_frequency: BTreeMap<String, u64>,
    /// Cells of opening placements, keyed `"row,col"`
    pub first_move_positions: BTreeMap<String, u64>,
}

impl BoardAnalytics {
    pub fn record_move(&mut self, rec: &MoveRecord) {
        self.moves += 1;
        if rec.action != ActionKind::Place {
            return;
        }
        let Some(pos) = rec.target else {
            return;
        };
        self.position_heatmap[pos.row][pos.col] += 1;
        *self.card_play_frequency.entry(rec.card.to_string()).or_default() += 1;
        if rec.turn == 0 {
            *self
                .first_move_positions
                .entry(format!("{},{}", pos.row, pos.col))
                .or_default() += 1;
        }
    }

    /// Credits the final board and the winner's cards of one finished game.
    pub fn record_winner(&mut self, board: &Board, winner: Player, log: &[MoveRecord]) {
        for pos in Pos::all().filter(|&p| board.owner(p) == Some(winner)) {
            self.winning_position_heatmap[pos.row][pos.col] += 1;
        }
        for rec in log.iter().filter(|r| r.player == winner) {
            *self.winning_card_frequency.entry(rec.card.to_string()).or_default() += 1;
        }
    }

    pub fn merge(&mut self, other: &BoardAnalytics) {
        self.moves += other.moves;
        for row in 0..SIZE {
            for col in 0..SIZE {
                self.position_heatmap[row][col] += other.position_heatmap[row][col];
                self.winning_position_heatmap[row][col] +=
                    other.winning_position_heatmap[row][col];
            }
        }
        for (mine, theirs) in [
            (&mut self.card_play_frequency, &other.card_play_frequency),
            (&mut self.winning_card_frequency, &other.winning_card_frequency),
            (&mut self.first_move_positions, &other.first_move_positions),
        ] {
            for (k, v) in theirs {
                *mine.entry(k.clone()).or_default() += v;
            }
        }
    }

    /// The `n` most played cells, ties in scan order.
    pub fn hottest_cells(&self, n: usize) -> Vec<(Pos, u64)> {
        let mut cells: Vec<(Pos, u64)> = Pos::all()
            .map(|p| (p, self.position_heatmap[p.row][p.col]))
            .filter(|&(_, count)| count > 0)
            .collect();
        cells.sort_by_key(|&(p, count)| (Reverse(count), p.scan_index()));
        cells.truncate(n);
        cells
    }

    /// Most played card, ties to the smaller name.
    pub fn top_card(&self) -> Option<(&str, u64)> {
        self.card_play_frequency
            .iter()
            .max_by_key(|&(card, &n)| (n, Reverse(card)))
            .map(|(card, &n)| (card.as_str(), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequence_engine::cards::Card;

    fn placed(turn: u32, player: Player, card: &str, row: usize, col: usize) -> MoveRecord {
        MoveRecord {
            turn,
            player,
            card: card.parse::<Card>().unwrap(),
            action: ActionKind::Place,
            target: Some(Pos::new(row, col)),
            sequences: Vec::new(),
            retracted: Vec::new(),
        }
    }

    fn insight(offense: f64, defense: f64, blocks: bool) -> MoveInsight {
        MoveInsight {
            offense,
            defense,
            total: offense + defense,
            creates_sequence: false,
            blocks_opponent: blocks,
            player_chips: 0,
            opponent_chips: 0,
            player_sequences: 0,
            opponent_sequences: 0,
            cards_in_deck: 90,
        }
    }

    #[test]
    fn tally_averages_per_player() {
        let mut t = GameTally::default();
        t.add(Player::One, &insight(10.0, 0.0, false));
        t.add(Player::One, &insight(30.0, 20.0, true));
        t.add(Player::Two, &insight(0.0, 80.0, true));
        assert_eq!(t.blocking_moves(), [1, 1]);
        assert_eq!(t.average_offense(), [20.0, 0.0]);
        assert_eq!(t.average_defense(), [10.0, 80.0]);
        assert_eq!(GameTally::default().average_offense(), [0.0, 0.0]);
    }

    #[test]
    fn placements_feed_heatmap_and_card_counts() {
        let mut a = BoardAnalytics::default();
        a.record_move(&placed(0, Player::One, "5H", 4, 4));
        a.record_move(&placed(1, Player::Two, "5H", 6, 8));
        a.record_move(&placed(2, Player::One, "2S", 0, 1));
        a.record_move(&MoveRecord {
            action: ActionKind::Discard,
            target: None,
            ..placed(3, Player::Two, "3S", 0, 0)
        });
        assert_eq!(a.moves, 4);
        assert_eq!(a.position_heatmap[4][4], 1);
        assert_eq!(a.card_play_frequency["5H"], 2);
        assert!(!a.card_play_frequency.contains_key("3S"));
        assert_eq!(a.first_move_positions["4,4"], 1);
        assert_eq!(a.first_move_positions.len(), 1);
        assert_eq!(a.top_card(), Some(("5H", 2)));
    }

    #[test]
    fn winner_credits_final_chips_and_cards() {
        let board = Board::new()
            .with_chip(Pos::new(2, 2), Player::Two)
            .with_chip(Pos::new(3, 3), Player::One);
        let log = vec![
            placed(0, Player::One, "6C", 3, 3),
            placed(1, Player::Two, "2D", 2, 2),
        ];
        let mut a = BoardAnalytics::default();
        a.record_winner(&board, Player::Two, &log);
        assert_eq!(a.winning_position_heatmap[2][2], 1);
        assert_eq!(a.winning_position_heatmap[3][3], 0);
        assert_eq!(a.winning_card_frequency.get("2D"), Some(&1));
        assert_eq!(a.winning_card_frequency.get("6C"), None);
    }

    #[test]
    fn merge_adds_everything() {
        let mut a = BoardAnalytics::default();
        a.record_move(&placed(0, Player::One, "5H", 4, 4));
        let mut b = BoardAnalytics::default();
        b.record_move(&placed(0, Player::One, "5H", 4, 4));
        b.record_move(&placed(1, Player::Two, "2S", 0, 1));
        a.merge(&b);
        assert_eq!(a.moves, 3);
        assert_eq!(a.position_heatmap[4][4], 2);
        assert_eq!(a.first_move_positions["4,4"], 2);
        assert_eq!(a.hottest_cells(1), vec![(Pos::new(4, 4), 2)]);
        assert_eq!(a.hottest_cells(5).len(), 2);
    }
}
