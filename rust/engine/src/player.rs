use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// One of the two players (teams). Player one always moves first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based index for per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// A player's ordered hand. Refilled after every turn, so its length only
/// dips below the configured size between playing a card and drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn give_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes the first copy of `card`, keeping the order of the rest.
    pub fn take(&mut self, card: Card) -> Option<Card> {
        let idx = self.cards.iter().position(|&c| c == card)?;
        Some(self.cards.remove(idx))
    }

    /// Distinct card identities in hand order.
    pub fn distinct(&self) -> Vec<Card> {
        let mut seen = Vec::with_capacity(self.cards.len());
        for &c in &self.cards {
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        seen
    }
}
