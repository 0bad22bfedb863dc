//! # ZapGames - board games for WhatsApp group chats
//!
//! ZapGames hosts two-player board games inside chat groups. Players type short
//! prefixed commands (`.damas @friend`, `.xadrez jogada e2e4`) and the bot answers with
//! the new position, whose turn it is and, at the end, who won.
//!
//! ## Features
//!
//! - **Checkers**: complete 8x8 rules engine (dark squares only, forward men,
//!   one-square diagonal steps, mandatory capture, promotion, win detection).
//! - **Chess**: session and turn layer over the `shakmaty` rules engine, accepting UCI
//!   (`e2e4`) and SAN (`Nf3`, `O-O`) notation.
//! - **Ranking**: persistent JSON win/loss/draw ledger for chess with a top-10 table.
//! - **Board pictures**: best-effort image links, with a monospace board always included.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zapgames::bot::BotServer;
//! use zapgames::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = BotServer::new(config);
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`bot`] - command parser, games menu and the JSON-lines event loop
//! - [`checkers`] - checkers board, rules, sessions and replies
//! - [`chess`] - chess engine adapter, sessions, ledger and replies
//! - [`session_store`] - one live session per chat, behind a trait
//! - [`config`] - configuration loading and validation

pub mod bot;
pub mod checkers;
pub mod chess;
pub mod config;
pub mod logutil;
pub mod metrics;
pub mod render;
pub mod reply;
pub mod session_store;
