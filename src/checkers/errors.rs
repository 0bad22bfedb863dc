use thiserror::Error;

use crate::reply::mention_name;
use crate::session_store::SessionError;

/// Reasons a move is refused by the rules, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("There is no piece on the origin square!")]
    EmptyOrigin,
    #[error("That piece is not yours!")]
    NotYourPiece,
    #[error("The destination square is already occupied!")]
    DestinationOccupied,
    #[error("Pieces may only move on dark squares!")]
    LightSquareMove,
    #[error("Capture is mandatory! You must capture an opposing piece.")]
    CaptureMandatory,
    #[error("Men only move and capture forward!")]
    WrongDirection,
    #[error("There is no piece to capture!")]
    NoPieceToCapture,
    #[error("You can only capture opposing pieces!")]
    CannotCaptureOwnPiece,
    #[error("Invalid move! Use one-square diagonal steps or two-square captures.")]
    InvalidMovementShape,
}

/// Errors returned by checkers operations, rendered straight into chat replies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckersError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("⚠️ It is not your turn! Wait for @{} to play.", mention_name(.expected))]
    NotYourTurn { expected: String },

    #[error("❌ Invalid coordinates! Use the a1-h8 format, e.g. c3 d4.")]
    InvalidCoordinate,

    #[error("❌ {0}")]
    Rejected(#[from] MoveRejection),

    #[error("⚠️ You need an opponent other than yourself to start a game.")]
    SamePlayer,
}
