//! Error types for the board and turn engine

use crate::game::GameStatus;

/// Errors raised by the board, the rules bookkeeping and the turn engine.
///
/// None of these are recoverable game conditions: they signal a bug in the
/// caller (an AI or a parser) or in the board bookkeeping, and the game that
/// raised them should be abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HiveError {
    #[error("illegal command {command}: {reason}")]
    IllegalCommand { command: String, reason: &'static str },

    #[error("board invariant violated: {0}")]
    Invariant(String),

    #[error("game is not running (status {0:?})")]
    NotRunning(GameStatus),

    #[error("game log cannot be extended while replaying")]
    ReplayActive,

    #[error("replay navigation requires replay mode")]
    NotReplaying,

    #[error("unknown token id: {0}")]
    UnknownToken(String),
}

impl HiveError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        HiveError::Invariant(msg.into())
    }
}
