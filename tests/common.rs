//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use zapgames::bot::ChatEvent;
use zapgames::checkers::{Board, Piece, Position};
use zapgames::config::Config;

pub const CHAT: &str = "120363000000@g.us";
pub const ALICE: &str = "5511900000001@s.whatsapp.net";
pub const BOB: &str = "5511900000002@s.whatsapp.net";

/// Board holding exactly the listed pieces, e.g. `[("c3", Piece::man(Color::White))]`.
pub fn board_with(pieces: &[(&str, Piece)]) -> Board {
    let mut board = Board::empty();
    for (square, piece) in pieces {
        let pos = Position::parse(square).expect("fixture square");
        board.set(pos, Some(*piece));
    }
    board
}

pub fn square(name: &str) -> Position {
    Position::parse(name).expect("fixture square")
}

/// Default config writing into `data_dir`, with image links off.
pub fn test_config(data_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = data_dir.to_string_lossy().into_owned();
    config.logging.file = None;
    config.games.render_images = false;
    config
}

pub fn event(sender: &str, text: &str) -> ChatEvent {
    ChatEvent {
        chat: CHAT.to_string(),
        sender: sender.to_string(),
        text: text.to_string(),
        mentions: Vec::new(),
    }
}
