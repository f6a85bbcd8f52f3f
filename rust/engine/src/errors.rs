use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell ({row}, {col}) is outside the 10x10 board")]
    OutOfRange { row: usize, col: usize },
    #[error("Draw and discard piles are both empty")]
    EmptyDeck,
    #[error("Illegal move: {reason}")]
    IllegalMove { reason: String },
    #[error("Game already over")]
    GameOver,
    #[error("No legal moves in a live game (rule invariant violated)")]
    NoLegalMoves,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        GameError::IllegalMove {
            reason: reason.into(),
        }
    }
}
