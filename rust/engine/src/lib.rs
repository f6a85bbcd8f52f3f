//! # sequence-engine: Sequence Board Game Engine Core
//!
//! A deterministic engine for the two-player Sequence board game. Provides
//! board state, legal-move generation, sequence detection with the overlap
//! rule, and turn/deck management with a seeded shoe so that every game can be
//! replayed from its seed.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and the Jack table
//! - [`deck`] - Deterministic 104-card shoe with ChaCha20 RNG
//! - [`board`] - Fixed 10x10 layout, wild corners, chip occupancy
//! - [`sequence`] - Five-in-a-row detection and the sequence ledger
//! - [`rules`] - Legal-move enumeration and dead cards
//! - [`player`] - Player identity and hands
//! - [`game`] - Game configuration and state
//! - [`engine`] - Move application and the turn state machine
//! - [`record`] - Move log entries and game summaries
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use sequence_engine::game::{GameConfig, GameState};
//!
//! let mut game = GameState::new(GameConfig::with_seed(42)).expect("valid config");
//! while !game.is_terminal() {
//!     let mv = game.legal_moves()[0];
//!     game.apply_move(mv).expect("legal move");
//! }
//! println!("winner: {:?} after {} turns", game.winner(), game.turn());
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use sequence_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.draw_pile(), b.draw_pile());
//! ```

pub mod board;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod player;
pub mod record;
pub mod rules;
pub mod sequence;
