//! Chat front end: command parsing, the games menu and the event loop that routes
//! commands to the checkers and chess games.

pub mod commands;
pub mod games;
pub mod server;

pub use commands::{BotCommand, CheckersCommand, ChessCommand, CommandParser};
pub use games::{GameDoor, GameDoorKind};
pub use server::{BotServer, ChatEvent, OutgoingReply};
