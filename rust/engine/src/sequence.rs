//! Five-in-a-row detection and the sequence ledger.
//!
//! Detection only ever looks at the lines through the cell that just changed.
//! For every direction the maximal run of cells counting for the player (own
//! chips plus wild corners) is collected and each 5-cell window along it is a
//! candidate. A candidate becomes a counted sequence only when at most one of
//! its cells already belongs to one of that player's counted sequences, which
//! is what stops a run of six from scoring twice while still letting two
//! sequences cross or touch at a single shared cell.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{is_corner, Board, Pos};
use crate::player::Player;

/// Cells in a sequence.
pub const SEQUENCE_LEN: usize = 5;

/// Line directions, in the order sequences are reported.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right (↘).
    DiagonalDown,
    /// Bottom-left to top-right (↗).
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// `(row, col)` step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (-1, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::DiagonalDown => "diagonal_down",
            Direction::DiagonalUp => "diagonal_up",
        }
    }
}

/// A counted five-in-a-row.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub player: Player,
    pub direction: Direction,
    /// Cells in line order.
    pub cells: [Pos; SEQUENCE_LEN],
}

impl Sequence {
    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn shared_cells(&self, other: &Sequence) -> usize {
        self.cells.iter().filter(|&&p| other.contains(p)).count()
    }
}

/// Maximal run through `pos` of cells counting for `player` along `dir`, in
/// line order. Empty if `pos` itself does not count.
pub fn run_through(board: &Board, pos: Pos, player: Player, dir: Direction) -> Vec<Pos> {
    if !board.counts_for(pos, player) {
        return Vec::new();
    }
    let (dr, dc) = dir.delta();
    let mut back = 0;
    while let Some(p) = pos.offset(dr, dc, -(back + 1)) {
        if !board.counts_for(p, player) {
            break;
        }
        back += 1;
    }
    let mut run = Vec::new();
    let mut step = -back;
    while let Some(p) = pos.offset(dr, dc, step) {
        if !board.counts_for(p, player) {
            break;
        }
        run.push(p);
        step += 1;
    }
    run
}

pub fn run_length(board: &Board, pos: Pos, player: Player, dir: Direction) -> usize {
    run_through(board, pos, player, dir).len()
}

/// Every counted sequence, per player, in the order they were completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceLedger {
    sequences: [Vec<Sequence>; 2],
}

impl SequenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, player: Player) -> usize {
        self.sequences[player.index()].len()
    }

    pub fn sequences(&self, player: Player) -> &[Sequence] {
        &self.sequences[player.index()]
    }

    /// True if `pos` belongs to one of `player`'s counted sequences.
    pub fn covers(&self, player: Player, pos: Pos) -> bool {
        self.sequences(player).iter().any(|s| s.contains(pos))
    }

    fn covered_by_any(&self, pos: Pos) -> bool {
        Player::BOTH.iter().any(|&p| self.covers(p, pos))
    }

    /// Add already-validated sequences and lock their cells.
    pub fn record(&mut self, board: &mut Board, found: &[Sequence]) {
        for seq in found {
            for &cell in &seq.cells {
                board.set_locked(cell, true);
            }
            debug!(
                player = %seq.player,
                direction = seq.direction.as_str(),
                start = %seq.cells[0],
                "sequence completed"
            );
            self.sequences[seq.player.index()].push(seq.clone());
        }
    }

    /// Drop every sequence whose cells no longer all count for its owner and
    /// unlock the cells nothing else covers. Returns the retracted sequences.
    pub fn retract_broken(&mut self, board: &mut Board) -> Vec<Sequence> {
        let mut retracted = Vec::new();
        for player in Player::BOTH {
            let list = &mut self.sequences[player.index()];
            let (keep, broken): (Vec<_>, Vec<_>) = list
                .drain(..)
                .partition(|s| s.cells.iter().all(|&p| board.counts_for(p, player)));
            *list = keep;
            retracted.extend(broken);
        }
        for seq in &retracted {
            debug!(player = %seq.player, start = %seq.cells[0], "sequence retracted");
            for &cell in &seq.cells {
                if !is_corner(cell) && !self.covered_by_any(cell) {
                    board.set_locked(cell, false);
                }
            }
        }
        retracted
    }
}

/// Sequences that a chip of `player` on `pos` completes (or has just
/// completed, when the chip is already on `board`). Never mutates.
///
/// Results follow [`Direction::ALL`] order, windows in line order within a
/// direction.
pub fn find_new_sequences(
    board: &Board,
    ledger: &SequenceLedger,
    pos: Pos,
    player: Player,
) -> Vec<Sequence> {
    let board = if board.counts_for(pos, player) {
        std::borrow::Cow::Borrowed(board)
    } else {
        std::borrow::Cow::Owned(board.with_chip(pos, player))
    };
    let mut found: Vec<Sequence> = Vec::new();
    for dir in Direction::ALL {
        let run = run_through(&board, pos, player, dir);
        if run.len() < SEQUENCE_LEN {
            continue;
        }
        for window in run.windows(SEQUENCE_LEN) {
            let already_counted = window
                .iter()
                .filter(|&&p| ledger.covers(player, p) || found.iter().any(|s| s.contains(p)))
                .count();
            if already_counted > 1 {
                continue;
            }
            let mut cells = [window[0]; SEQUENCE_LEN];
            cells.copy_from_slice(window);
            found.push(Sequence {
                player,
                direction: dir,
                cells,
            });
        }
    }
    found
}

/// Detector entry point after a placement: finds, records and locks.
pub fn detect_after_placement(
    board: &mut Board,
    ledger: &mut SequenceLedger,
    pos: Pos,
    player: Player,
) -> Vec<Sequence> {
    let found = find_new_sequences(board, ledger, pos, player);
    ledger.record(board, &found);
    found
}

/// Detector entry point after a removal. Removal never creates sequences; it
/// can only break ones that relied on the removed chip.
pub fn detect_after_removal(board: &mut Board, ledger: &mut SequenceLedger) -> Vec<Sequence> {
    ledger.retract_broken(board)
}
