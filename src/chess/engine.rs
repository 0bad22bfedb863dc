//! Rules-engine seam for chess.
//!
//! The session layer never looks at the board itself. It hands move strings to a
//! [RulesEngine] and asks it afterwards whether the game is over. [ShakmatyEngine] is the
//! production implementation on top of `shakmaty`.

use std::collections::HashMap;
use std::fmt;

use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, File, Move, Position, Square};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::White => "🤍 White",
            Side::Black => "🖤 Black",
        }
    }
}

impl From<shakmaty::Color> for Side {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Side::White,
            shakmaty::Color::Black => Side::Black,
        }
    }
}

/// One applied move in verbose form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub san: String,
    /// Origin and target squares in coordinate notation (`e2`, `e4`). Castling reports
    /// the king's squares.
    pub from: String,
    pub to: String,
    pub side: Side,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.san)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineRejection {
    #[error("`{0}` is not a move in coordinate (e2e4) or algebraic (Nf3) notation")]
    Unreadable(String),
    #[error("`{0}` is not legal in this position")]
    Illegal(String),
}

/// What the chess session layer needs from a rules engine.
pub trait RulesEngine: Send {
    /// Parse and play `notation` for the side to move. A rejected move leaves the engine
    /// unchanged.
    fn apply(&mut self, notation: &str) -> Result<MoveRecord, EngineRejection>;

    /// Current position as a full FEN record.
    fn fen(&self) -> String;

    fn side_to_move(&self) -> Side;

    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_threefold_repetition(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;

    /// Any drawn state, including the fifty-move rule.
    fn is_draw(&self) -> bool;

    /// Every move applied so far, oldest first.
    fn history(&self) -> &[MoveRecord];
}

/// Standard chess through `shakmaty`, with repetition tracking on top.
#[derive(Debug, Clone)]
pub struct ShakmatyEngine {
    position: Chess,
    history: Vec<MoveRecord>,
    seen: HashMap<String, u32>,
}

impl Default for ShakmatyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ShakmatyEngine {
    pub fn new() -> Self {
        let mut engine = ShakmatyEngine {
            position: Chess::default(),
            history: Vec::new(),
            seen: HashMap::new(),
        };
        engine.note_position();
        engine
    }

    /// Placement, side, castling and en passant; clocks are left out so repeated
    /// positions compare equal.
    fn repetition_key(&self) -> String {
        self.fen().split(' ').take(4).collect::<Vec<_>>().join(" ")
    }

    fn note_position(&mut self) {
        *self.seen.entry(self.repetition_key()).or_insert(0) += 1;
    }

    fn parse(&self, notation: &str) -> Result<Move, EngineRejection> {
        let raw = notation.trim();
        if raw.is_empty() {
            return Err(EngineRejection::Unreadable(raw.to_string()));
        }
        let mut readable = false;

        if let Ok(uci) = raw.parse::<UciMove>() {
            readable = true;
            if let Ok(mv) = uci.to_move(&self.position) {
                return Ok(mv);
            }
        }
        if let Ok(san) = raw.parse::<SanPlus>() {
            readable = true;
            if let Ok(mv) = san.san.to_move(&self.position) {
                return Ok(mv);
            }
        }
        // Loose coordinate forms such as `E2-E4`.
        let loose: String = raw
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        if loose != raw {
            if let Ok(uci) = loose.parse::<UciMove>() {
                readable = true;
                if let Ok(mv) = uci.to_move(&self.position) {
                    return Ok(mv);
                }
            }
        }

        if readable {
            Err(EngineRejection::Illegal(raw.to_string()))
        } else {
            Err(EngineRejection::Unreadable(raw.to_string()))
        }
    }
}

fn endpoints(mv: &Move) -> (Square, Square) {
    match mv {
        Move::Normal { from, to, .. } => (*from, *to),
        Move::EnPassant { from, to } => (*from, *to),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() {
                File::G
            } else {
                File::C
            };
            (*king, Square::from_coords(file, king.rank()))
        }
        Move::Put { to, .. } => (*to, *to),
    }
}

impl RulesEngine for ShakmatyEngine {
    fn apply(&mut self, notation: &str) -> Result<MoveRecord, EngineRejection> {
        let mv = self.parse(notation)?;
        let side = Side::from(self.position.turn());
        let mut san = San::from_move(&self.position, mv.clone()).to_string();
        let (from, to) = endpoints(&mv);
        self.position.play_unchecked(mv);
        self.note_position();
        if self.position.is_checkmate() {
            san.push('#');
        } else if self.position.is_check() {
            san.push('+');
        }
        let record = MoveRecord {
            san,
            from: from.to_string(),
            to: to.to_string(),
            side,
        };
        self.history.push(record.clone());
        Ok(record)
    }

    fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn side_to_move(&self) -> Side {
        self.position.turn().into()
    }

    fn is_check(&self) -> bool {
        self.position.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_threefold_repetition(&self) -> bool {
        self.seen
            .get(&self.repetition_key())
            .is_some_and(|count| *count >= 3)
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
            || self.position.halfmoves() >= 100
    }

    fn history(&self) -> &[MoveRecord] {
        &self.history
    }
}
