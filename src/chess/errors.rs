use thiserror::Error;

use super::engine::{EngineRejection, Side};
use crate::reply::mention_name;
use crate::session_store::SessionError;

/// Errors returned by chess operations, rendered straight into chat replies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(
        "❌ It is not your turn!\n\n{} to move: @{}",
        .side.label(),
        mention_name(.expected)
    )]
    NotYourTurn { side: Side, expected: String },

    #[error("❌ Invalid move: {0}\n\n💡 Examples: `e2e4`, `Nf3`, `O-O`")]
    IllegalMove(String),

    #[error("❌ You are not playing this game!")]
    NotAParticipant,

    #[error("⚠️ You need an opponent other than yourself to start a game.")]
    SamePlayer,
}

impl From<EngineRejection> for ChessError {
    fn from(rejection: EngineRejection) -> Self {
        ChessError::IllegalMove(rejection.to_string())
    }
}
