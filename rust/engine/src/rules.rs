use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{cells_for_card, Board, Pos};
use crate::cards::{Card, JackKind};
use crate::player::{Hand, Player};
use crate::sequence::SequenceLedger;

/// What a move does with its card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    /// Put a chip on an empty cell.
    Place(Pos),
    /// Take an opponent chip off a non-locked cell (one-eyed Jack).
    Remove(Pos),
    /// Discard the card and draw a replacement without placing.
    Discard,
}

/// A card played together with what it does.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub card: Card,
    pub action: MoveAction,
}

impl Move {
    pub fn place(card: Card, pos: Pos) -> Self {
        Self {
            card,
            action: MoveAction::Place(pos),
        }
    }

    pub fn remove(card: Card, pos: Pos) -> Self {
        Self {
            card,
            action: MoveAction::Remove(pos),
        }
    }

    pub fn discard(card: Card) -> Self {
        Self {
            card,
            action: MoveAction::Discard,
        }
    }

    pub fn target(&self) -> Option<Pos> {
        match self.action {
            MoveAction::Place(p) | MoveAction::Remove(p) => Some(p),
            MoveAction::Discard => None,
        }
    }

    pub fn uses_jack(&self) -> bool {
        self.card.is_jack()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            MoveAction::Place(p) => write!(f, "place {} at {}", self.card, p),
            MoveAction::Remove(p) => write!(f, "remove with {} at {}", self.card, p),
            MoveAction::Discard => write!(f, "discard {}", self.card),
        }
    }
}

/// A non-Jack card whose two cells are both taken.
pub fn is_dead(board: &Board, card: Card) -> bool {
    !card.is_jack() && cells_for_card(card).iter().all(|&p| !board.is_empty(p))
}

/// Enumerates every legal move for `player` holding `hand`.
///
/// Distinct cards are visited in hand order and targets in board scan order,
/// so the result is deterministic. Each dead card contributes one discard. If
/// nothing at all is playable, discarding any card in hand is the forced
/// move.
pub fn legal_moves(
    board: &Board,
    ledger: &SequenceLedger,
    hand: &Hand,
    player: Player,
) -> Vec<Move> {
    let opponent = player.opponent();
    let mut moves = Vec::new();
    for card in hand.distinct() {
        match card.jack_kind() {
            Some(JackKind::TwoEyed) => {
                moves.extend(board.empty_cells().map(|p| Move::place(card, p)));
            }
            Some(JackKind::OneEyed) => {
                moves.extend(
                    Pos::all()
                        .filter(|&p| board.owner(p) == Some(opponent))
                        .filter(|&p| !board.is_locked(p) && !ledger.covers(opponent, p))
                        .map(|p| Move::remove(card, p)),
                );
            }
            None if is_dead(board, card) => moves.push(Move::discard(card)),
            None => {
                moves.extend(
                    cells_for_card(card)
                        .iter()
                        .filter(|&&p| board.is_empty(p))
                        .map(|&p| Move::place(card, p)),
                );
            }
        }
    }
    if moves.is_empty() {
        moves.extend(hand.distinct().into_iter().map(Move::discard));
    }
    moves
}
