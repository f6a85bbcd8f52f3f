//! # sequence-ai: Bots for the Sequence Board Game
//!
//! Provides the move evaluator, its named weight presets, and the bots that
//! drive [`GameState`] turn by turn.
//!
//! ## Core Components
//!
//! - [`Bot`] - Trait defining the interface for move selection
//! - [`evaluator`] - Pure sub-score functions and deterministic selection
//! - [`weights`] - Weight presets and the [`Strategy`] names
//! - [`heuristic`] - Evaluator-driven bot
//! - [`random`] - Seeded uniform bot for baselines
//! - [`step`], [`step_with`], [`play_out`] - Advance a game with bots
//!
//! ## Quick Start
//!
//! ```rust
//! use sequence_ai::{create_bot, play_out, Strategy};
//! use sequence_engine::game::{GameConfig, GameState};
//!
//! let p1 = create_bot(Strategy::Aggressive);
//! let p2 = create_bot(Strategy::Defensive);
//! let mut game = GameState::new(GameConfig::with_seed(42)).expect("valid config");
//! let summary = play_out(&mut game, [p1.as_ref(), p2.as_ref()]).expect("game runs");
//! println!("winner: {:?} in {} turns", summary.winner, summary.turns);
//! ```

use sequence_engine::errors::GameError;
use sequence_engine::game::GameState;
use sequence_engine::record::{GameSummary, MoveRecord};
use sequence_engine::rules::Move;

pub mod evaluator;
pub mod heuristic;
pub mod random;
pub mod weights;

pub use weights::{ParseStrategyError, Strategy, Weights};

/// Trait defining the interface for Sequence bots.
///
/// # Required Methods
///
/// - [`choose_move`](Bot::choose_move) - Pick one move from the active
///   player's legal set
/// - [`name`](Bot::name) - Return the bot's identifier
///
/// # Example Implementation
///
/// ```rust
/// use sequence_ai::Bot;
/// use sequence_engine::game::GameState;
/// use sequence_engine::rules::Move;
///
/// struct FirstMove;
///
/// impl Bot for FirstMove {
///     fn choose_move(&self, state: &GameState) -> Option<Move> {
///         state.legal_moves().first().copied()
///     }
///
///     fn name(&self) -> &str {
///         "first"
///     }
/// }
/// ```
pub trait Bot: Send + Sync {
    /// Choose a move for the active player.
    ///
    /// Must return a member of [`GameState::legal_moves`], or `None` when
    /// that set is empty. Never mutates the state.
    fn choose_move(&self, state: &GameState) -> Option<Move>;

    /// Return the name/identifier of this bot.
    fn name(&self) -> &str;
}

/// Factory function to create bots by strategy.
///
/// # Example
///
/// ```rust
/// use sequence_ai::{create_bot, Strategy};
///
/// let bot = create_bot(Strategy::Random);
/// assert_eq!(bot.name(), "random");
/// ```
pub fn create_bot(strategy: Strategy) -> Box<dyn Bot> {
    match strategy {
        Strategy::Random => Box::new(random::RandomBot::new()),
        other => Box::new(heuristic::HeuristicBot::new(other)),
    }
}

/// Advance one turn with the balanced heuristic bot.
pub fn step(state: &mut GameState) -> Result<MoveRecord, GameError> {
    step_with(state, &heuristic::HeuristicBot::default())
}

/// Advance one turn with `bot` choosing for the active player.
pub fn step_with(state: &mut GameState, bot: &dyn Bot) -> Result<MoveRecord, GameError> {
    if state.is_terminal() {
        return Err(GameError::GameOver);
    }
    let mv = bot.choose_move(state).ok_or(GameError::NoLegalMoves)?;
    state.apply_move(mv)
}

/// Run the game to a terminal state, `bots[0]` playing player one.
pub fn play_out(state: &mut GameState, bots: [&dyn Bot; 2]) -> Result<GameSummary, GameError> {
    while !state.is_terminal() {
        let bot = bots[state.active_player().index()];
        step_with(state, bot)?;
    }
    Ok(state.summary())
}
