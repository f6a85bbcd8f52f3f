use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::cards::{full_shoe, Card};
use crate::errors::GameError;

/// The 104-card shoe split into a draw pile and a discard pile.
///
/// Cards are drawn from the back of the draw pile. When the draw pile runs
/// dry the discard pile is shuffled (with the same seeded RNG) and becomes the
/// new draw pile.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    rng: ChaCha20Rng,
    reshuffles: u32,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            draw_pile: full_shoe(),
            discard_pile: Vec::new(),
            rng,
            reshuffles: 0,
        }
    }

    /// Deck built from an explicit draw pile, top card last. Used to stage
    /// positions in tests.
    pub fn from_cards(draw_pile: Vec<Card>, seed: u64) -> Self {
        Self {
            draw_pile,
            discard_pile: Vec::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            reshuffles: 0,
        }
    }

    /// Restore the full shoe and shuffle it.
    pub fn shuffle(&mut self) {
        self.draw_pile = full_shoe();
        self.discard_pile.clear();
        self.draw_pile.shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        if self.draw_pile.is_empty() {
            if self.discard_pile.is_empty() {
                return Err(GameError::EmptyDeck);
            }
            self.draw_pile.append(&mut self.discard_pile);
            self.draw_pile.shuffle(&mut self.rng);
            self.reshuffles += 1;
            debug!(cards = self.draw_pile.len(), "discard pile reshuffled into draw pile");
        }
        self.draw_pile.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn remaining(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }
}
