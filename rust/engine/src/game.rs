use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos};
use crate::cards::{Card, SHOE_SIZE};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::player::{Hand, Player};
use crate::record::{GameSummary, MoveRecord, Outcome};
use crate::rules::{self, Move};
use crate::sequence::{find_new_sequences, Sequence, SequenceLedger};

/// Cards per hand in a two-player game
pub const DEFAULT_HAND_SIZE: usize = 7;
/// Sequences needed to win a two-player game
pub const DEFAULT_SEQUENCES_TO_WIN: usize = 2;
/// Turn cap guarding against endless forced-discard loops
pub const DEFAULT_MAX_TURNS: u32 = 500;

/// Largest hand that still leaves a playable draw pile.
pub const MAX_HAND_SIZE: usize = 20;

/// Options for a new game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Shoe shuffle seed. `None` picks a random seed, which is still recorded.
    pub deck_seed: Option<u64>,
    pub hand_size: usize,
    pub sequences_to_win: usize,
    pub max_turns: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_seed: None,
            hand_size: DEFAULT_HAND_SIZE,
            sequences_to_win: DEFAULT_SEQUENCES_TO_WIN,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            deck_seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.hand_size == 0 || self.hand_size > MAX_HAND_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "hand_size must be in 1..={MAX_HAND_SIZE}, got {}",
                self.hand_size
            )));
        }
        if self.sequences_to_win == 0 {
            return Err(GameError::InvalidConfig(
                "sequences_to_win must be >= 1".into(),
            ));
        }
        if self.max_turns == 0 {
            return Err(GameError::InvalidConfig("max_turns must be >= 1".into()));
        }
        Ok(())
    }
}

/// Turn state machine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingMove,
    SequenceCheck,
    TurnEnd,
    GameOver,
}

/// Everything one simulated game owns.
///
/// Created by [`GameState::new`], advanced by [`GameState::apply_move`] (see
/// `engine.rs`), and read through the accessors below. Nothing is shared
/// between games, so independent games can run on separate threads.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) seed: u64,
    pub(crate) board: Board,
    pub(crate) deck: Deck,
    pub(crate) hands: [Hand; 2],
    pub(crate) ledger: SequenceLedger,
    pub(crate) active: Player,
    pub(crate) turn: u32,
    pub(crate) phase: Phase,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) log: Vec<MoveRecord>,
}

impl GameState {
    /// Shuffles the shoe and deals both hands, player one first.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.deck_seed.unwrap_or_else(rand::random);
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        let mut hands = [Hand::default(), Hand::default()];
        for _ in 0..config.hand_size {
            for hand in &mut hands {
                hand.give_card(deck.draw()?);
            }
        }
        Ok(Self::from_parts(config, seed, Board::new(), deck, hands))
    }

    /// Assembles a state from explicit parts, e.g. a staged mid-game
    /// position. Player one is to move.
    pub fn from_parts(
        config: GameConfig,
        seed: u64,
        board: Board,
        deck: Deck,
        hands: [Hand; 2],
    ) -> Self {
        Self {
            config,
            seed,
            board,
            deck,
            hands,
            ledger: SequenceLedger::new(),
            active: Player::One,
            turn: 0,
            phase: Phase::AwaitingMove,
            outcome: None,
            log: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn active_player(&self) -> Player {
        self.active
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(Outcome::Win(p)) => Some(p),
            _ => None,
        }
    }

    pub fn sequence_count(&self, player: Player) -> usize {
        self.ledger.count(player)
    }

    pub fn sequences(&self, player: Player) -> &[Sequence] {
        self.ledger.sequences(player)
    }

    pub fn ledger(&self) -> &SequenceLedger {
        &self.ledger
    }

    /// Ordered move log; a plain slice, so it can be read any number of times.
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.log
    }

    /// Legal moves for the active player. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        rules::legal_moves(&self.board, &self.ledger, self.hand(self.active), self.active)
    }

    pub fn is_dead(&self, card: Card) -> bool {
        rules::is_dead(&self.board, card)
    }

    /// Number of new sequences a chip of `player` on `pos` would complete.
    /// Zero for occupied cells and corners.
    pub fn would_complete(&self, pos: Pos, player: Player) -> usize {
        if !self.board.is_empty(pos) {
            return 0;
        }
        find_new_sequences(&self.board, &self.ledger, pos, player).len()
    }

    /// True if `pos` is part of a counted sequence (or a corner).
    pub fn is_locked(&self, pos: Pos) -> bool {
        self.board.is_locked(pos)
    }

    /// Cards in draw pile, discard pile and both hands. Always [`SHOE_SIZE`].
    pub fn card_count(&self) -> usize {
        self.deck.remaining()
            + self.deck.discarded().len()
            + self.hands.iter().map(Hand::len).sum::<usize>()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::from_log(
            self.seed,
            self.outcome,
            &self.log,
            [self.ledger.count(Player::One), self.ledger.count(Player::Two)],
            [self.board.chips(Player::One), self.board.chips(Player::Two)],
            self.deck.reshuffles(),
        )
    }

    /// Every card currently accounted for, for consistency checks.
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(SHOE_SIZE);
        cards.extend_from_slice(self.deck.draw_pile());
        cards.extend_from_slice(self.deck.discarded());
        for hand in &self.hands {
            cards.extend_from_slice(hand.cards());
        }
        cards
    }
}
