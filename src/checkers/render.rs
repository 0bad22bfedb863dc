//! Checkers board pictures: an SVG drawing wrapped in a chart-service link.

use std::fmt::Write;

use super::board::{Board, Color, PieceKind, Position, BOARD_SIZE};
use crate::render::{checked_link, encode_query_value, RenderError};

pub const DEFAULT_CHART_URL: &str = "https://quickchart.io/chart";

const SQUARE: usize = 50;
const HEADER: usize = 60;
const RADIUS: usize = 18;

pub trait BoardRenderer: Send + Sync {
    /// Link to a picture of `board` with `to_move` shown as the side on turn.
    fn render(&self, board: &Board, to_move: Color) -> Result<String, RenderError>;
}

/// Builds the SVG locally and hands it to a chart-image service as a query parameter.
#[derive(Debug, Clone)]
pub struct ChartSvgRenderer {
    base_url: String,
}

impl ChartSvgRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ChartSvgRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_URL)
    }
}

impl BoardRenderer for ChartSvgRenderer {
    fn render(&self, board: &Board, to_move: Color) -> Result<String, RenderError> {
        if self.base_url.is_empty() {
            return Err(RenderError::Unavailable("no chart service configured".into()));
        }
        let svg = board_svg(board, to_move);
        checked_link(format!(
            "{}?bkg=white&c={}",
            self.base_url,
            encode_query_value(&svg)
        ))
    }
}

/// Standalone SVG document for `board`.
pub fn board_svg(board: &Board, to_move: Color) -> String {
    let size = SQUARE * BOARD_SIZE;
    let mut svg = String::with_capacity(16 * 1024);
    let _ = write!(
        svg,
        r##"<svg width="{size}" height="{h}" xmlns="http://www.w3.org/2000/svg"><rect width="{size}" height="{h}" fill="#2c2c2c"/>"##,
        h = size + HEADER
    );
    let _ = write!(
        svg,
        r##"<text x="{x}" y="30" font-family="Arial, sans-serif" font-size="20" font-weight="bold" fill="white" text-anchor="middle">CHECKERS</text><text x="{x}" y="50" font-family="Arial, sans-serif" font-size="14" fill="#FFD700" text-anchor="middle">Turn: {turn}</text>"##,
        x = size / 2,
        turn = to_move.label()
    );

    for pos in Board::squares() {
        let x = pos.col * SQUARE;
        let y = pos.row * SQUARE + HEADER;
        let fill = if pos.is_dark() { "#8B4513" } else { "#F5DEB3" };
        let _ = write!(
            svg,
            r##"<rect x="{x}" y="{y}" width="{SQUARE}" height="{SQUARE}" fill="{fill}" stroke="#000" stroke-width="1"/>"##
        );
        if pos.is_dark() {
            draw_piece(&mut svg, board, pos, x + SQUARE / 2, y + SQUARE / 2);
        }
    }

    svg.push_str("</svg>");
    svg
}

fn draw_piece(svg: &mut String, board: &Board, pos: Position, cx: usize, cy: usize) {
    let Some(piece) = board.get(pos) else {
        return;
    };
    let (fill, stroke) = match piece.color {
        Color::White => ("white", "#333"),
        Color::Black => ("#1a1a1a", "#666"),
    };
    let ring = match piece.kind {
        PieceKind::Man if piece.color == Color::White => "#ccc",
        PieceKind::Man => "#333",
        PieceKind::King => "#FFD700",
    };
    let _ = write!(
        svg,
        r##"<circle cx="{cx}" cy="{cy}" r="{RADIUS}" fill="{fill}" stroke="{stroke}" stroke-width="2"/><circle cx="{cx}" cy="{cy}" r="{inner}" fill="none" stroke="{ring}" stroke-width="1"/>"##,
        inner = RADIUS - 3
    );
    if piece.is_king() {
        let _ = write!(
            svg,
            r##"<text x="{cx}" y="{ty}" font-family="Arial, sans-serif" font-size="20" fill="#FFD700" text-anchor="middle" font-weight="bold">{glyph}</text>"##,
            ty = cy + 5,
            glyph = piece.glyph()
        );
    }
}
