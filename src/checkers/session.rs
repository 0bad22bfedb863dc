//! Per-chat checkers game state and the turn state machine.

use chrono::{DateTime, Utc};

use super::board::{Board, Color, Position};
use super::errors::{CheckersError, MoveRejection};
use super::rules::{self, ExecutedMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    WhiteToMove,
    BlackToMove,
    Finished,
}

impl TurnState {
    pub fn for_color(color: Color) -> Self {
        match color {
            Color::White => TurnState::WhiteToMove,
            Color::Black => TurnState::BlackToMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub from: Position,
    pub to: Position,
}

/// Outcome of one accepted move, handed to the reply formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub executed: ExecutedMove,
    /// Counter value after this move.
    pub move_number: u32,
    /// Set when this move removed the opponent's last piece.
    pub winner: Option<Color>,
    /// Color and player id due to move next; meaningless once `winner` is set.
    pub next_color: Color,
    pub next_player: String,
}

#[derive(Debug, Clone)]
pub struct CheckersSession {
    pub board: Board,
    pub white: String,
    pub black: String,
    pub to_move_id: String,
    pub turn: TurnState,
    pub moves: u32,
    pub started_at: DateTime<Utc>,
    pub last_move: Option<LastMove>,
    pub winner: Option<Color>,
}

impl CheckersSession {
    /// Fresh game; the challenger plays white and moves first.
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self::with_board(white, black, Board::initial(), Color::White)
    }

    /// Game starting from an arbitrary board with `to_move` on turn.
    pub fn with_board(
        white: impl Into<String>,
        black: impl Into<String>,
        board: Board,
        to_move: Color,
    ) -> Self {
        let white = white.into();
        let black = black.into();
        let to_move_id = match to_move {
            Color::White => white.clone(),
            Color::Black => black.clone(),
        };
        CheckersSession {
            board,
            white,
            black,
            to_move_id,
            turn: TurnState::for_color(to_move),
            moves: 0,
            started_at: Utc::now(),
            last_move: None,
            winner: None,
        }
    }

    /// Color on turn, `None` once the game is over.
    pub fn color_to_move(&self) -> Option<Color> {
        match self.turn {
            TurnState::WhiteToMove => Some(Color::White),
            TurnState::BlackToMove => Some(Color::Black),
            TurnState::Finished => None,
        }
    }

    pub fn player(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.turn == TurnState::Finished
    }

    pub fn elapsed_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }

    /// Validate and apply a move by `player` given as two algebraic squares.
    ///
    /// Turn order is checked before the coordinates are parsed. Any error leaves the
    /// session exactly as it was.
    pub fn play(
        &mut self,
        player: &str,
        origin: &str,
        dest: &str,
    ) -> Result<MoveReport, CheckersError> {
        let mover = match self.color_to_move() {
            Some(color) if self.to_move_id == player => color,
            _ => {
                return Err(CheckersError::NotYourTurn {
                    expected: self.to_move_id.clone(),
                })
            }
        };

        let (from, to) = match (Position::parse(origin), Position::parse(dest)) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(CheckersError::InvalidCoordinate),
        };

        let validation = rules::validate_move(&self.board, mover, from, to).into_result()?;
        let executed = rules::execute_move(&mut self.board, from, to, validation)
            .ok_or(MoveRejection::EmptyOrigin)?;

        self.last_move = Some(LastMove { from, to });
        self.moves += 1;

        if let Some(winner) = rules::detect_winner(&self.board) {
            self.winner = Some(winner);
            self.turn = TurnState::Finished;
            return Ok(MoveReport {
                executed,
                move_number: self.moves,
                winner: Some(winner),
                next_color: winner.opponent(),
                next_player: self.player(winner.opponent()).to_string(),
            });
        }

        let next = mover.opponent();
        self.turn = TurnState::for_color(next);
        self.to_move_id = self.player(next).to_string();
        Ok(MoveReport {
            executed,
            move_number: self.moves,
            winner: None,
            next_color: next,
            next_player: self.to_move_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::board::Piece;

    const W: &str = "111@s.whatsapp.net";
    const B: &str = "222@s.whatsapp.net";

    fn rc(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn opening_move_passes_turn_to_black() {
        let mut s = CheckersSession::new(W, B);
        let report = s.play(W, "c3", "d4").unwrap();
        assert_eq!(report.move_number, 1);
        assert_eq!(report.next_color, Color::Black);
        assert_eq!(report.next_player, B);
        assert_eq!(s.turn, TurnState::BlackToMove);
        assert_eq!(s.to_move_id, B);
        assert_eq!(s.board.get(rc(4, 3)), Some(Piece::man(Color::White)));
        assert_eq!(
            s.last_move,
            Some(LastMove {
                from: rc(5, 2),
                to: rc(4, 3)
            })
        );
    }

    #[test]
    fn wrong_player_is_told_whose_turn_it_is() {
        let mut s = CheckersSession::new(W, B);
        let err = s.play(B, "f6", "e5").unwrap_err();
        assert_eq!(
            err,
            CheckersError::NotYourTurn {
                expected: W.to_string()
            }
        );
        assert!(err.to_string().contains("@111"));
    }

    #[test]
    fn turn_is_checked_before_coordinates() {
        let mut s = CheckersSession::new(W, B);
        assert!(matches!(
            s.play(B, "zz", "??"),
            Err(CheckersError::NotYourTurn { .. })
        ));
        assert_eq!(
            s.play(W, "zz", "d4"),
            Err(CheckersError::InvalidCoordinate)
        );
    }

    #[test]
    fn rejected_moves_leave_session_untouched() {
        let mut s = CheckersSession::new(W, B);
        let board = s.board.clone();
        assert_eq!(
            s.play(W, "c3", "c4"),
            Err(CheckersError::Rejected(MoveRejection::LightSquareMove))
        );
        assert_eq!(s.board, board);
        assert_eq!(s.moves, 0);
        assert_eq!(s.turn, TurnState::WhiteToMove);
        assert_eq!(s.last_move, None);
    }

    #[test]
    fn colors_alternate_over_a_sequence() {
        let mut s = CheckersSession::new(W, B);
        let script = [(W, "c3", "d4"), (B, "f6", "g5"), (W, "g3", "h4"), (B, "b6", "a5")];
        let mut expected = Color::White;
        for (player, from, to) in script {
            assert_eq!(s.color_to_move(), Some(expected));
            s.play(player, from, to).unwrap();
            expected = expected.opponent();
        }
        assert_eq!(s.moves, 4);
        assert_eq!(s.color_to_move(), Some(Color::White));
    }

    #[test]
    fn capturing_the_last_piece_finishes_the_game() {
        let mut board = Board::empty();
        board.set(rc(5, 2), Some(Piece::man(Color::White)));
        board.set(rc(4, 3), Some(Piece::man(Color::Black)));
        let mut s = CheckersSession::with_board(W, B, board, Color::White);
        let report = s.play(W, "c3", "e5").unwrap();
        assert_eq!(report.winner, Some(Color::White));
        assert_eq!(report.move_number, 1);
        assert!(report.executed.is_capture());
        assert!(s.is_finished());
        assert_eq!(s.winner, Some(Color::White));
        assert!(matches!(
            s.play(B, "a1", "b2"),
            Err(CheckersError::NotYourTurn { .. })
        ));
    }

    #[test]
    fn black_on_turn_from_custom_board() {
        let mut board = Board::empty();
        board.set(rc(2, 1), Some(Piece::man(Color::Black)));
        board.set(rc(7, 0), Some(Piece::man(Color::White)));
        let mut s = CheckersSession::with_board(W, B, board, Color::Black);
        assert_eq!(s.to_move_id, B);
        s.play(B, "b6", "c5").unwrap();
        assert_eq!(s.to_move_id, W);
    }
}
