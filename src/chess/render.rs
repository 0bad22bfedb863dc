//! Chess position pictures and the monospace fallback board.

use crate::render::{checked_link, encode_query_value, RenderError};

pub const DEFAULT_DYNBOARD_URL: &str = "https://www.chess.com/dynboard";

pub trait PositionRenderer: Send + Sync {
    /// Link to a picture of the position described by `fen`.
    fn render(&self, fen: &str) -> Result<String, RenderError>;
}

/// Dynamic board image service that draws a position from its FEN placement field.
#[derive(Debug, Clone)]
pub struct DynboardRenderer {
    base_url: String,
}

impl DynboardRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for DynboardRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DYNBOARD_URL)
    }
}

impl PositionRenderer for DynboardRenderer {
    fn render(&self, fen: &str) -> Result<String, RenderError> {
        if self.base_url.is_empty() {
            return Err(RenderError::Unavailable("no board service configured".into()));
        }
        let placement = placement_field(fen)?;
        checked_link(format!(
            "{}?fen={}&board=brown&piece=neo&size=3&coordinates=true",
            self.base_url,
            encode_query_value(placement)
        ))
    }
}

fn placement_field(fen: &str) -> Result<&str, RenderError> {
    let placement = fen.split_whitespace().next().unwrap_or_default();
    if placement.split('/').count() != 8 {
        return Err(RenderError::InvalidPosition(fen.to_string()));
    }
    Ok(placement)
}

fn glyph(piece: char) -> Option<char> {
    Some(match piece {
        'K' => '♔',
        'Q' => '♕',
        'R' => '♖',
        'B' => '♗',
        'N' => '♘',
        'P' => '♙',
        'k' => '♚',
        'q' => '♛',
        'r' => '♜',
        'b' => '♝',
        'n' => '♞',
        'p' => '♟',
        _ => return None,
    })
}

/// Code-fenced board drawn from the FEN placement field, rank 8 on top.
pub fn board_text(fen: &str) -> Result<String, RenderError> {
    let placement = placement_field(fen)?;
    let mut out = String::from("```\n  a b c d e f g h\n");
    for (row, rank) in placement.split('/').enumerate() {
        out.push_str(&format!("{} ", 8 - row));
        let mut col = 0usize;
        for ch in rank.chars() {
            if let Some(empty) = ch.to_digit(10) {
                for _ in 0..empty {
                    out.push(if (row + col) % 2 == 0 { '□' } else { '■' });
                    out.push(' ');
                    col += 1;
                }
            } else {
                let symbol =
                    glyph(ch).ok_or_else(|| RenderError::InvalidPosition(fen.to_string()))?;
                out.push(symbol);
                out.push(' ');
                col += 1;
            }
        }
        if col != 8 {
            return Err(RenderError::InvalidPosition(fen.to_string()));
        }
        out.push_str(&format!("{}\n", 8 - row));
    }
    out.push_str("  a b c d e f g h\n```");
    Ok(out)
}

/// Static guide to square names, for players new to coordinate notation.
pub fn coordinates_guide() -> String {
    let mut out = String::from("📍 *BOARD COORDINATES:*\n\n   a  b  c  d  e  f  g  h\n");
    for row in 0..8 {
        let rank = 8 - row;
        out.push_str(&format!("{rank}  "));
        for col in 0..8 {
            out.push(if (row + col) % 2 == 0 { '⬛' } else { '⬜' });
        }
        out.push_str(&format!("  {rank}\n"));
    }
    out.push_str("   a  b  c  d  e  f  g  h\n\n");
    out.push_str("💡 Example: e2e4 = the pawn on file E moves from rank 2 to rank 4");
    out
}
