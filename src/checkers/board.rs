//! Board model and algebraic coordinate codec.
//!
//! Row 0 is rank 8 (black's home side), row 7 is rank 1 (white's home side). Only dark
//! squares, `(row + col)` odd, ever hold pieces.

use std::fmt;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward step for a man of this color.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row on which a man of this color is crowned.
    pub fn crowning_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Color::White => "⚪ White",
            Color::Black => "⚫ Black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn man(color: Color) -> Self {
        Piece {
            color,
            kind: PieceKind::Man,
        }
    }

    pub const fn king(color: Color) -> Self {
        Piece {
            color,
            kind: PieceKind::King,
        }
    }

    pub fn is_king(self) -> bool {
        self.kind == PieceKind::King
    }

    pub fn glyph(self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Man) => '⚪',
            (Color::Black, PieceKind::Man) => '⚫',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Position { row, col })
    }

    /// Parse algebraic notation such as `c3`. The file letter is case-insensitive.
    /// Anything that is not exactly a file `a-h` followed by a rank `1-8` yields `None`.
    pub fn parse(coord: &str) -> Option<Self> {
        let mut chars = coord.chars();
        let (file, rank) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return None;
        }
        let rank = rank.to_digit(10)? as usize;
        if !(1..=BOARD_SIZE).contains(&rank) {
            return None;
        }
        Position::new(BOARD_SIZE - rank, file as usize - 'a' as usize)
    }

    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Position> {
        let row = usize::try_from(self.row as i32 + d_row).ok()?;
        let col = usize::try_from(self.col as i32 + d_col).ok()?;
        Position::new(row, col)
    }

    /// Signed (row, col) displacement from `self` to `other`.
    pub fn delta(self, other: Position) -> (i32, i32) {
        (
            other.row as i32 - self.row as i32,
            other.col as i32 - self.col as i32,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col as u8) as char;
        write!(f, "{}{}", file, BOARD_SIZE - self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Starting layout: black men on the dark squares of rows 0-2, white men on rows 5-7.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for pos in Board::squares().filter(|p| p.is_dark()) {
            match pos.row {
                0..=2 => board.set(pos, Some(Piece::man(Color::Black))),
                5..=7 => board.set(pos, Some(Piece::man(Color::White))),
                _ => {}
            }
        }
        board
    }

    /// All 64 squares in row-major order.
    pub fn squares() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.row][pos.col]
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.cells[pos.row][pos.col] = piece;
    }

    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        self.cells[pos.row][pos.col].take()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Board::squares().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Men plus kings of `color`.
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.color == color).count()
    }

    /// Monospace picture with file letters and rank numbers, for chats without images.
    pub fn to_text(&self) -> String {
        let mut out = String::from("```\n   a  b  c  d  e  f  g  h\n");
        for row in 0..BOARD_SIZE {
            out.push_str(&format!("{} ", BOARD_SIZE - row));
            for col in 0..BOARD_SIZE {
                let pos = Position { row, col };
                let symbol = if !pos.is_dark() {
                    '□'
                } else {
                    self.get(pos).map(Piece::glyph).unwrap_or('▪')
                };
                out.push(' ');
                out.push(symbol);
                out.push(' ');
            }
            out.push_str(&format!("{}\n", BOARD_SIZE - row));
        }
        out.push_str("   a  b  c  d  e  f  g  h\n```");
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(coord: &str) -> Position {
        Position::parse(coord).unwrap()
    }

    #[test]
    fn parses_algebraic_corners() {
        assert_eq!(pos("a8"), Position { row: 0, col: 0 });
        assert_eq!(pos("h1"), Position { row: 7, col: 7 });
        assert_eq!(pos("c3"), Position { row: 5, col: 2 });
        assert_eq!(pos("D4"), Position { row: 4, col: 3 });
    }

    #[test]
    fn rejects_malformed_coordinates() {
        for bad in ["", "c", "c33", "i3", "c0", "c9", "33", "cc", "é3"] {
            assert_eq!(Position::parse(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_inverts_parse() {
        for coord in ["a1", "b2", "e5", "h8"] {
            assert_eq!(pos(coord).to_string(), coord);
        }
    }

    #[test]
    fn initial_layout_has_twelve_men_each_on_dark_squares() {
        let board = Board::initial();
        assert_eq!(board.count(Color::White), 12);
        assert_eq!(board.count(Color::Black), 12);
        assert!(board.pieces().all(|(p, piece)| p.is_dark() && !piece.is_king()));
        assert!(board.pieces().all(|(p, piece)| match piece.color {
            Color::Black => p.row <= 2,
            Color::White => p.row >= 5,
        }));
    }

    #[test]
    fn offset_stays_on_board() {
        let corner = pos("a1");
        assert_eq!(corner.offset(1, 0), None);
        assert_eq!(corner.offset(-1, 1), Some(pos("b2")));
    }

    #[test]
    fn text_board_marks_light_and_dark_squares() {
        let text = Board::initial().to_text();
        assert!(text.starts_with("```\n   a  b"));
        let rank8 = text.lines().nth(2).unwrap();
        assert!(rank8.starts_with("8  □  ⚫ "));
        let rank4 = text.lines().nth(6).unwrap();
        assert!(rank4.contains('▪'));
        assert!(!rank4.contains('⚪'));
    }
}
