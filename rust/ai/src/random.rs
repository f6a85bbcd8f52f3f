//! Uniformly random bot, reproducible per game seed and turn.

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use sequence_engine::game::GameState;
use sequence_engine::rules::Move;

use crate::Bot;

#[derive(Debug, Clone, Default)]
pub struct RandomBot;

impl RandomBot {
    pub fn new() -> Self {
        Self
    }

    fn rng_for(state: &GameState) -> ChaCha8Rng {
        let turn = u64::from(state.turn()).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        ChaCha8Rng::seed_from_u64(state.seed() ^ turn)
    }
}

impl Bot for RandomBot {
    fn choose_move(&self, state: &GameState) -> Option<Move> {
        let moves = state.legal_moves();
        moves.choose(&mut Self::rng_for(state)).copied()
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequence_engine::game::GameConfig;

    #[test]
    fn same_state_same_choice() {
        let game = GameState::new(GameConfig::with_seed(21)).unwrap();
        let bot = RandomBot::new();
        let a = bot.choose_move(&game).unwrap();
        let b = bot.choose_move(&game.clone()).unwrap();
        assert_eq!(a, b);
        assert!(game.legal_moves().contains(&a));
    }
}
