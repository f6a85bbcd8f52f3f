use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::cards::Card;
use crate::player::Player;
use crate::rules::{Move, MoveAction};
use crate::sequence::{Direction, Sequence};

/// Kind of action recorded in the move log.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Place,
    Remove,
    Discard,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Place => "place",
            ActionKind::Remove => "remove",
            ActionKind::Discard => "discard",
        }
    }
}

impl From<MoveAction> for ActionKind {
    fn from(action: MoveAction) -> Self {
        match action {
            MoveAction::Place(_) => ActionKind::Place,
            MoveAction::Remove(_) => ActionKind::Remove,
            MoveAction::Discard => ActionKind::Discard,
        }
    }
}

/// One entry of the append-only move log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Zero-based turn index
    pub turn: u32,
    /// Player who moved
    pub player: Player,
    /// Card played or discarded
    pub card: Card,
    pub action: ActionKind,
    /// `None` for discards
    pub target: Option<Pos>,
    /// Sequences this move completed, in direction order
    pub sequences: Vec<Sequence>,
    /// Sequences retracted because of this move (removals only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retracted: Vec<Sequence>,
}

impl MoveRecord {
    pub(crate) fn new(turn: u32, player: Player, mv: Move) -> Self {
        Self {
            turn,
            player,
            card: mv.card,
            action: mv.action.into(),
            target: mv.target(),
            sequences: Vec::new(),
            retracted: Vec::new(),
        }
    }

    pub fn sequences_completed(&self) -> usize {
        self.sequences.len()
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win(Player),
    /// Turn cap reached with no winner.
    Draw,
}

/// Per-player tallies in a [`GameSummary`].
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub sequences: usize,
    pub chips_on_board: usize,
    pub chips_placed: u32,
    pub removals: u32,
    pub discards: u32,
    pub jacks_used: u32,
}

/// Result object extracted once a game is over.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Seed that shuffled the shoe; replaying it reproduces the game
    pub seed: u64,
    pub outcome: Option<Outcome>,
    pub winner: Option<Player>,
    pub turns: u32,
    pub players: [PlayerTally; 2],
    pub first_sequence_turn: Option<u32>,
    pub first_sequence_player: Option<Player>,
    pub first_sequence_direction: Option<Direction>,
    pub reshuffles: u32,
}

impl GameSummary {
    pub(crate) fn from_log(
        seed: u64,
        outcome: Option<Outcome>,
        log: &[MoveRecord],
        sequences: [usize; 2],
        chips: [usize; 2],
        reshuffles: u32,
    ) -> Self {
        let mut players: [PlayerTally; 2] = Default::default();
        for (i, tally) in players.iter_mut().enumerate() {
            tally.sequences = sequences[i];
            tally.chips_on_board = chips[i];
        }
        let mut first: Option<(u32, Player, Direction)> = None;
        for rec in log {
            let tally = &mut players[rec.player.index()];
            match rec.action {
                ActionKind::Place => tally.chips_placed += 1,
                ActionKind::Remove => tally.removals += 1,
                ActionKind::Discard => tally.discards += 1,
            }
            if rec.card.is_jack() && rec.action != ActionKind::Discard {
                tally.jacks_used += 1;
            }
            if first.is_none() {
                if let Some(seq) = rec.sequences.first() {
                    first = Some((rec.turn, rec.player, seq.direction));
                }
            }
        }
        let winner = match outcome {
            Some(Outcome::Win(p)) => Some(p),
            _ => None,
        };
        Self {
            seed,
            outcome,
            winner,
            turns: log.len() as u32,
            players,
            first_sequence_turn: first.map(|f| f.0),
            first_sequence_player: first.map(|f| f.1),
            first_sequence_direction: first.map(|f| f.2),
            reshuffles,
        }
    }
}
