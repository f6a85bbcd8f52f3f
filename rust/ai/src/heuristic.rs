//! Weighted-heuristic bot.

use sequence_engine::game::GameState;
use sequence_engine::rules::Move;
use tracing::trace;

use crate::Bot;
use crate::evaluator::{self, Evaluation};
use crate::weights::{Strategy, Weights};

/// Picks the legal move with the highest evaluator score.
///
/// Selection is fully deterministic: equal scores are resolved by board scan
/// order of the target cell, so two games from the same seed always agree.
///
/// # Example
///
/// ```rust
/// use sequence_ai::Bot;
/// use sequence_ai::heuristic::HeuristicBot;
/// use sequence_ai::weights::Strategy;
/// use sequence_engine::game::{GameConfig, GameState};
///
/// let bot = HeuristicBot::new(Strategy::Balanced);
/// let game = GameState::new(GameConfig::with_seed(42)).expect("valid config");
/// let mv = bot.choose_move(&game).expect("live game has a legal move");
/// assert!(game.legal_moves().contains(&mv));
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicBot {
    name: String,
    weights: Weights,
}

impl HeuristicBot {
    /// Bot using the preset of `strategy`. [`Strategy::Random`] has no preset
    /// and falls back to the balanced weights.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            name: format!("heuristic-{strategy}"),
            weights: strategy.weights().unwrap_or_default(),
        }
    }

    pub fn with_weights(name: impl Into<String>, weights: Weights) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// The chosen move together with its score breakdown.
    pub fn analyze(&self, state: &GameState) -> Option<Evaluation> {
        let moves = state.legal_moves();
        evaluator::best_move(state, &moves, &self.weights)
    }
}

impl Default for HeuristicBot {
    fn default() -> Self {
        Self::new(Strategy::Balanced)
    }
}

impl Bot for HeuristicBot {
    fn choose_move(&self, state: &GameState) -> Option<Move> {
        let best = self.analyze(state)?;
        trace!(turn = state.turn(), mv = %best.mv, score = best.total, "heuristic choice");
        Some(best.mv)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_reflects_strategy() {
        assert_eq!(HeuristicBot::new(Strategy::Defensive).name(), "heuristic-defensive");
        assert_eq!(HeuristicBot::default().weights(), &Weights::BALANCED);
        assert_eq!(HeuristicBot::new(Strategy::Random).weights(), &Weights::BALANCED);
    }

    #[test]
    fn no_moves_once_game_is_over() {
        use sequence_engine::game::GameConfig;
        let mut game = GameState::new(GameConfig {
            max_turns: 1,
            ..GameConfig::with_seed(8)
        })
        .unwrap();
        let bot = HeuristicBot::default();
        let mv = bot.choose_move(&game).unwrap();
        game.apply_move(mv).unwrap();
        assert!(game.is_terminal());
        assert_eq!(bot.choose_move(&game), None);
    }
}
