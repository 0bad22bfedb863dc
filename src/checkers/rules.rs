//! Move validation, execution and win detection.
//!
//! Validation is a pure function of the board, the mover's color and the two squares.
//! The executor trusts its input: only a [MoveValidation::Valid] result may reach it.
//!
//! A capture always ends the turn; chained multi-jumps are not part of this rule set.

use super::board::{Board, Color, Piece, PieceKind, Position};
use super::errors::MoveRejection;

const JUMPS: [(i32, i32); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveValidation {
    Valid {
        capture: bool,
        captured: Option<Position>,
        /// Set once the move is executed; [validate_move] always reports `false`.
        promoted: bool,
    },
    Invalid(MoveRejection),
}

impl MoveValidation {
    fn simple() -> Self {
        MoveValidation::Valid {
            capture: false,
            captured: None,
            promoted: false,
        }
    }

    fn jump(over: Position) -> Self {
        MoveValidation::Valid {
            capture: true,
            captured: Some(over),
            promoted: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, MoveValidation::Valid { .. })
    }

    pub fn into_result(self) -> Result<Self, MoveRejection> {
        match self {
            MoveValidation::Invalid(reason) => Err(reason),
            valid => Ok(valid),
        }
    }
}

/// A jump currently open to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOption {
    pub from: Position,
    pub over: Position,
    pub to: Position,
}

/// Every jump available to `color`: an own piece, an opposing piece on the diagonal
/// neighbour, and an empty in-bounds square right behind it.
///
/// Direction is not filtered here, so a man with an opposing piece behind it counts as
/// having a capture for the mandatory-capture rule.
pub fn available_captures(board: &Board, color: Color) -> Vec<CaptureOption> {
    let mut captures = Vec::new();
    for (from, _) in board.pieces().filter(|(_, p)| p.color == color) {
        for (d_row, d_col) in JUMPS {
            let Some(to) = from.offset(d_row, d_col) else {
                continue;
            };
            let Some(over) = from.offset(d_row / 2, d_col / 2) else {
                continue;
            };
            let opposing = board.get(over).is_some_and(|p| p.color != color);
            if opposing && board.is_empty_at(to) {
                captures.push(CaptureOption { from, over, to });
            }
        }
    }
    captures
}

pub fn capture_available(board: &Board, color: Color) -> bool {
    !available_captures(board, color).is_empty()
}

fn direction_allowed(piece: Piece, d_row: i32) -> bool {
    piece.is_king() || d_row.signum() == piece.color.forward()
}

/// Check a move for `mover` from `from` to `to` against the full rule list.
pub fn validate_move(board: &Board, mover: Color, from: Position, to: Position) -> MoveValidation {
    let Some(piece) = board.get(from) else {
        return MoveValidation::Invalid(MoveRejection::EmptyOrigin);
    };
    if piece.color != mover {
        return MoveValidation::Invalid(MoveRejection::NotYourPiece);
    }
    if !board.is_empty_at(to) {
        return MoveValidation::Invalid(MoveRejection::DestinationOccupied);
    }
    if !from.is_dark() || !to.is_dark() {
        return MoveValidation::Invalid(MoveRejection::LightSquareMove);
    }

    let (d_row, d_col) = from.delta(to);
    match (d_row.abs(), d_col.abs()) {
        (1, 1) => {
            if capture_available(board, mover) {
                return MoveValidation::Invalid(MoveRejection::CaptureMandatory);
            }
            if !direction_allowed(piece, d_row) {
                return MoveValidation::Invalid(MoveRejection::WrongDirection);
            }
            MoveValidation::simple()
        }
        (2, 2) => {
            let Some(over) = from.offset(d_row / 2, d_col / 2) else {
                return MoveValidation::Invalid(MoveRejection::InvalidMovementShape);
            };
            let Some(victim) = board.get(over) else {
                return MoveValidation::Invalid(MoveRejection::NoPieceToCapture);
            };
            if victim.color == mover {
                return MoveValidation::Invalid(MoveRejection::CannotCaptureOwnPiece);
            }
            if !direction_allowed(piece, d_row) {
                return MoveValidation::Invalid(MoveRejection::WrongDirection);
            }
            MoveValidation::jump(over)
        }
        _ => MoveValidation::Invalid(MoveRejection::InvalidMovementShape),
    }
}

/// What a committed move did to the board. `outcome` is always
/// [MoveValidation::Valid], with `promoted` reflecting the crowning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutedMove {
    pub from: Position,
    pub to: Position,
    pub outcome: MoveValidation,
}

impl ExecutedMove {
    pub fn captured(&self) -> Option<Position> {
        match self.outcome {
            MoveValidation::Valid { captured, .. } => captured,
            MoveValidation::Invalid(_) => None,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }

    pub fn promoted(&self) -> bool {
        matches!(self.outcome, MoveValidation::Valid { promoted: true, .. })
    }
}

/// Apply an already validated move. Crowns a man that lands on its crowning row and
/// returns the validation with `promoted` filled in.
///
/// Returns `None` (and leaves the board untouched) for an invalid validation or an
/// empty origin.
pub fn execute_move(
    board: &mut Board,
    from: Position,
    to: Position,
    validation: MoveValidation,
) -> Option<ExecutedMove> {
    let MoveValidation::Valid {
        capture, captured, ..
    } = validation
    else {
        return None;
    };
    let mut piece = board.take(from)?;
    if let Some(over) = captured {
        board.set(over, None);
    }
    let promoted = piece.kind == PieceKind::Man && to.row == piece.color.crowning_row();
    if promoted {
        piece = Piece::king(piece.color);
    }
    board.set(to, Some(piece));
    Some(ExecutedMove {
        from,
        to,
        outcome: MoveValidation::Valid {
            capture,
            captured,
            promoted,
        },
    })
}

/// The side left with pieces when the other has none.
pub fn detect_winner(board: &Board) -> Option<Color> {
    let white = board.count(Color::White);
    let black = board.count(Color::Black);
    if black == 0 {
        Some(Color::White)
    } else if white == 0 {
        Some(Color::Black)
    } else {
        None
    }
}
