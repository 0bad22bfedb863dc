//! Per-chat chess session: players, history and end-of-game detection around an engine.

use chrono::{DateTime, Utc};

use super::engine::{MoveRecord, RulesEngine, Side};
use super::errors::ChessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Checkmate { winner: Side },
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    /// Any other drawn state the engine reports (fifty-move rule).
    Draw,
    Resignation { winner: Side },
}

impl GameEnd {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameEnd::Checkmate { winner } | GameEnd::Resignation { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        self.winner().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub player: String,
    pub record: MoveRecord,
    pub at: DateTime<Utc>,
}

/// Result of one accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// Check on the board after the move; never set together with a checkmate end.
    pub check: bool,
    pub end: Option<GameEnd>,
    pub next: Side,
    pub fen: String,
}

pub struct ChessSession<E> {
    engine: E,
    pub white: String,
    pub black: String,
    pub moves: Vec<PlayedMove>,
    pub started_at: DateTime<Utc>,
    pub state: SessionState,
}

impl<E: RulesEngine> ChessSession<E> {
    pub fn new(engine: E, white: impl Into<String>, black: impl Into<String>) -> Self {
        ChessSession {
            engine,
            white: white.into(),
            black: black.into(),
            moves: Vec::new(),
            started_at: Utc::now(),
            state: SessionState::Active,
        }
    }

    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    pub fn side_of(&self, player: &str) -> Option<Side> {
        if player == self.white {
            Some(Side::White)
        } else if player == self.black {
            Some(Side::Black)
        } else {
            None
        }
    }

    pub fn side_to_move(&self) -> Side {
        self.engine.side_to_move()
    }

    pub fn fen(&self) -> String {
        self.engine.fen()
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Play `notation` for `player`. Rejections leave the session untouched.
    pub fn play(&mut self, player: &str, notation: &str) -> Result<MoveOutcome, ChessError> {
        let side = self.engine.side_to_move();
        if self.is_finished() || self.player(side) != player {
            return Err(ChessError::NotYourTurn {
                side,
                expected: self.player(side).to_string(),
            });
        }

        let record = self.engine.apply(notation)?;
        self.moves.push(PlayedMove {
            player: player.to_string(),
            record: record.clone(),
            at: Utc::now(),
        });

        let end = self.detect_end(side);
        if end.is_some() {
            self.state = SessionState::Finished;
        }
        Ok(MoveOutcome {
            record,
            check: end.is_none() && self.engine.is_check(),
            end,
            next: self.engine.side_to_move(),
            fen: self.engine.fen(),
        })
    }

    /// End conditions in priority order, judged right after `mover` played.
    fn detect_end(&self, mover: Side) -> Option<GameEnd> {
        if self.engine.is_checkmate() {
            Some(GameEnd::Checkmate { winner: mover })
        } else if self.engine.is_stalemate() {
            Some(GameEnd::Stalemate)
        } else if self.engine.is_threefold_repetition() {
            Some(GameEnd::ThreefoldRepetition)
        } else if self.engine.is_insufficient_material() {
            Some(GameEnd::InsufficientMaterial)
        } else if self.engine.is_draw() {
            Some(GameEnd::Draw)
        } else {
            None
        }
    }

    /// `player` gives up; the opponent wins.
    pub fn resign(&mut self, player: &str) -> Result<GameEnd, ChessError> {
        let side = self.side_of(player).ok_or(ChessError::NotAParticipant)?;
        self.state = SessionState::Finished;
        Ok(GameEnd::Resignation {
            winner: side.opponent(),
        })
    }

    /// The last `count` moves with their 1-based ply numbers.
    pub fn recent_moves(&self, count: usize) -> impl Iterator<Item = (usize, &PlayedMove)> {
        let skip = self.moves.len().saturating_sub(count);
        self.moves.iter().enumerate().skip(skip).map(|(i, m)| (i + 1, m))
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.engine.history().last()
    }

    pub fn elapsed_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chess::engine::EngineRejection;

    /// Engine double that accepts everything and reports whatever end flags are set.
    #[derive(Default)]
    pub(crate) struct ScriptedEngine {
        pub history: Vec<MoveRecord>,
        pub check: bool,
        pub mate: bool,
        pub stalemate: bool,
        pub repetition: bool,
        pub insufficient: bool,
        pub draw: bool,
        pub reject: bool,
    }

    impl ScriptedEngine {
        fn turn(&self) -> Side {
            if self.history.len() % 2 == 0 {
                Side::White
            } else {
                Side::Black
            }
        }
    }

    impl RulesEngine for ScriptedEngine {
        fn apply(&mut self, notation: &str) -> Result<MoveRecord, EngineRejection> {
            if self.reject {
                return Err(EngineRejection::Illegal(notation.to_string()));
            }
            let record = MoveRecord {
                san: notation.to_string(),
                from: "a1".into(),
                to: "a2".into(),
                side: self.turn(),
            };
            self.history.push(record.clone());
            Ok(record)
        }
        fn fen(&self) -> String {
            format!("scripted {}", self.history.len())
        }
        fn side_to_move(&self) -> Side {
            self.turn()
        }
        fn is_check(&self) -> bool {
            self.check || self.mate
        }
        fn is_checkmate(&self) -> bool {
            self.mate
        }
        fn is_stalemate(&self) -> bool {
            self.stalemate
        }
        fn is_threefold_repetition(&self) -> bool {
            self.repetition
        }
        fn is_insufficient_material(&self) -> bool {
            self.insufficient
        }
        fn is_draw(&self) -> bool {
            self.draw || self.stalemate || self.repetition || self.insufficient
        }
        fn history(&self) -> &[MoveRecord] {
            &self.history
        }
    }

    const W: &str = "w@s.whatsapp.net";
    const B: &str = "b@s.whatsapp.net";

    fn session() -> ChessSession<ScriptedEngine> {
        ChessSession::new(ScriptedEngine::default(), W, B)
    }

    #[test]
    fn moves_alternate_and_are_recorded() {
        let mut s = session();
        let first = s.play(W, "e4").unwrap();
        assert_eq!(first.next, Side::Black);
        assert_eq!(first.end, None);
        assert!(matches!(
            s.play(W, "d4"),
            Err(ChessError::NotYourTurn {
                side: Side::Black,
                ..
            })
        ));
        s.play(B, "e5").unwrap();
        assert_eq!(s.moves.len(), 2);
        assert_eq!(s.moves[1].player, B);
    }

    #[test]
    fn outsiders_cannot_move_or_resign() {
        let mut s = session();
        assert!(matches!(
            s.play("x@s.whatsapp.net", "e4"),
            Err(ChessError::NotYourTurn { .. })
        ));
        assert_eq!(
            s.resign("x@s.whatsapp.net"),
            Err(ChessError::NotAParticipant)
        );
        assert!(!s.is_finished());
    }

    #[test]
    fn engine_rejection_keeps_state() {
        let mut s = session();
        s.engine.reject = true;
        assert!(matches!(
            s.play(W, "e9"),
            Err(ChessError::IllegalMove(msg)) if msg.contains("e9")
        ));
        assert!(s.moves.is_empty());
        assert_eq!(s.side_to_move(), Side::White);
    }

    #[test]
    fn checkmate_outranks_draw_flags() {
        let mut s = session();
        s.engine.mate = true;
        s.engine.stalemate = true;
        let out = s.play(W, "Qh7#").unwrap();
        assert_eq!(out.end, Some(GameEnd::Checkmate { winner: Side::White }));
        assert!(!out.check);
        assert!(s.is_finished());
    }

    #[test]
    fn draw_reasons_follow_priority() {
        let cases: [(fn(&mut ScriptedEngine), GameEnd); 4] = [
            (|e| e.stalemate = true, GameEnd::Stalemate),
            (|e| e.repetition = true, GameEnd::ThreefoldRepetition),
            (|e| e.insufficient = true, GameEnd::InsufficientMaterial),
            (|e| e.draw = true, GameEnd::Draw),
        ];
        for (arm, expected) in cases {
            let mut s = session();
            arm(&mut s.engine);
            let out = s.play(W, "e4").unwrap();
            assert_eq!(out.end, Some(expected));
            assert!(expected.is_draw());
        }
    }

    #[test]
    fn check_is_reported_but_game_goes_on() {
        let mut s = session();
        s.engine.check = true;
        let out = s.play(W, "Bb5+").unwrap();
        assert!(out.check);
        assert_eq!(out.end, None);
        assert!(!s.is_finished());
    }

    #[test]
    fn resign_hands_win_to_opponent() {
        let mut s = session();
        assert_eq!(
            s.resign(B),
            Ok(GameEnd::Resignation { winner: Side::White })
        );
        assert!(s.is_finished());
        assert!(matches!(s.play(W, "e4"), Err(ChessError::NotYourTurn { .. })));
    }

    #[test]
    fn recent_moves_are_numbered_from_the_start() {
        let mut s = session();
        for (i, mv) in ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"].iter().enumerate() {
            let player = if i % 2 == 0 { W } else { B };
            s.play(player, mv).unwrap();
        }
        let recent: Vec<_> = s
            .recent_moves(5)
            .map(|(n, m)| format!("{n}. {}", m.record.san))
            .collect();
        assert_eq!(recent, vec!["3. Nf3", "4. Nc6", "5. Bb5", "6. a6", "7. Ba4"]);
    }
}
