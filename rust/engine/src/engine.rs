use tracing::{debug, info};

use crate::errors::GameError;
use crate::game::{GameState, Phase};
use crate::player::Player;
use crate::record::{MoveRecord, Outcome};
use crate::rules::{Move, MoveAction};
use crate::sequence::{detect_after_placement, detect_after_removal};

/// Turn execution.
///
/// # Examples
///
/// ```
/// use sequence_engine::game::{GameConfig, GameState};
///
/// let mut game = GameState::new(GameConfig::with_seed(7)).expect("valid config");
/// let first = game.legal_moves()[0];
/// let record = game.apply_move(first).expect("legal move");
/// assert_eq!(record.turn, 0);
/// assert_eq!(game.move_log().len(), 1);
/// ```
impl GameState {
    /// Applies one move for the active player and runs the turn to its end:
    /// sequence check, win check, hand refill and hand-over.
    ///
    /// Anything outside [`GameState::legal_moves`] is rejected with
    /// [`GameError::IllegalMove`] and leaves the state untouched.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveRecord, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        let player = self.active;
        if !self.hand(player).contains(mv.card) {
            return Err(GameError::illegal(format!(
                "{} is not in {}'s hand",
                mv.card, player
            )));
        }
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::illegal(format!("{mv} is not allowed for {player}")));
        }

        let mut record = MoveRecord::new(self.turn, player, mv);
        if let Some(card) = self.hands[player.index()].take(mv.card) {
            self.deck.discard(card);
        }
        match mv.action {
            MoveAction::Place(pos) => {
                self.board.place(pos, player);
                self.phase = Phase::SequenceCheck;
                record.sequences =
                    detect_after_placement(&mut self.board, &mut self.ledger, pos, player);
            }
            MoveAction::Remove(pos) => {
                self.board.remove(pos);
                self.phase = Phase::SequenceCheck;
                record.retracted = detect_after_removal(&mut self.board, &mut self.ledger);
            }
            MoveAction::Discard => {
                self.phase = Phase::SequenceCheck;
            }
        }
        self.turn += 1;

        if self.ledger.count(player) >= self.config.sequences_to_win {
            self.finish(Outcome::Win(player));
        } else {
            self.phase = Phase::TurnEnd;
            self.refill(player)?;
            if self.turn >= self.config.max_turns {
                self.finish(Outcome::Draw);
            } else {
                self.active = player.opponent();
                self.phase = Phase::AwaitingMove;
            }
        }

        debug!(turn = record.turn, player = %player, card = %mv.card, "move applied");
        self.log.push(record.clone());
        Ok(record)
    }

    fn refill(&mut self, player: Player) -> Result<(), GameError> {
        while self.hands[player.index()].len() < self.config.hand_size {
            let card = self.deck.draw()?;
            self.hands[player.index()].give_card(card);
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = Phase::GameOver;
        self.outcome = Some(outcome);
        info!(seed = self.seed, turns = self.turn, ?outcome, "game over");
    }
}
