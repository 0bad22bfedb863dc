//! Chat command parser.
//!
//! Commands are recognised only when the message starts with the configured prefix
//! (default `.`). Verbs are case-insensitive and exist in Portuguese and English:
//!
//! - `damas @opponent`, `damasjogada c3 d4`, `damastabuleiro`, `damasparar`, `damasajuda`
//!   (`checkers`, `checkersmove`, `checkersboard`, `checkersstop`, `checkershelp`)
//! - `xadrez @opponent` and `xadrez <sub>` with `jogada`/`move`, `status`,
//!   `desistir`/`resign`, `ranking`, `coordenadas`/`coords`, `player`/`jogador`,
//!   `ajuda`/`help` (`chess`)
//! - `jogos`/`games`, optionally followed by a game number or name
//!
//! The parser only classifies; it never touches game state.
use log::trace;

/// Server suffix appended to bare phone numbers typed as `@5511...`.
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckersCommand {
    Start { opponent: String },
    Move { from: String, to: String },
    Board,
    Stop,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessCommand {
    Start { opponent: String },
    Move(String),
    Status,
    Resign,
    Ranking,
    Coordinates,
    /// Chess.com profile lookup.
    Player(String),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Checkers(CheckersCommand),
    Chess(ChessCommand),
    /// Games menu, or one game's help when a selector follows.
    Games(Option<String>),
    /// Recognised verb with unusable arguments; carries the usage hint.
    Invalid(String),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classify `raw`. `mentions` are the player ids the transport resolved from the
    /// message, in order.
    pub fn parse(&self, raw: &str, mentions: &[String]) -> BotCommand {
        let trimmed = raw.trim();
        let Some(body) = trimmed.strip_prefix(self.prefix.as_str()) else {
            return BotCommand::Unknown;
        };
        let mut words = body.split_whitespace();
        let Some(verb) = words.next() else {
            return BotCommand::Unknown;
        };
        let verb = verb.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();
        let p = &self.prefix;

        let cmd = match verb.as_str() {
            "damas" | "checkers" => match resolve_opponent(&args, mentions) {
                Some(opponent) => BotCommand::Checkers(CheckersCommand::Start { opponent }),
                None => BotCommand::Invalid(format!(
                    "⚠️ Mention your opponent!\n\n💡 Use: `{p}damas @opponent`"
                )),
            },
            "damasjogada" | "checkersmove" => match args.as_slice() {
                [from, to, ..] => BotCommand::Checkers(CheckersCommand::Move {
                    from: from.to_string(),
                    to: to.to_string(),
                }),
                _ => BotCommand::Invalid(format!(
                    "❌ Use: `{p}damasjogada <from> <to>`\nExample: `{p}damasjogada c3 d4`"
                )),
            },
            "damastabuleiro" | "checkersboard" => BotCommand::Checkers(CheckersCommand::Board),
            "damasparar" | "checkersstop" => BotCommand::Checkers(CheckersCommand::Stop),
            "damasajuda" | "checkershelp" => BotCommand::Checkers(CheckersCommand::Help),
            "xadrez" | "chess" => self.parse_chess(&args, mentions),
            "jogos" | "games" => {
                BotCommand::Games((!args.is_empty()).then(|| args.join(" ")))
            }
            _ => BotCommand::Unknown,
        };
        trace!("parsed {:?} from '{}'", cmd, raw);
        cmd
    }

    fn parse_chess(&self, args: &[&str], mentions: &[String]) -> BotCommand {
        let sub = args
            .first()
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        let cmd = match sub.as_str() {
            "jogada" | "move" => match args.get(1) {
                Some(notation) => ChessCommand::Move(notation.to_string()),
                None => {
                    let p = &self.prefix;
                    return BotCommand::Invalid(format!(
                        "❌ Use: `{p}xadrez jogada <move>`\nExample: `{p}xadrez jogada e2e4`"
                    ));
                }
            },
            "status" | "tabuleiro" | "board" => ChessCommand::Status,
            "desistir" | "resign" => ChessCommand::Resign,
            "ranking" => ChessCommand::Ranking,
            "coordenadas" | "coords" | "coordinates" => ChessCommand::Coordinates,
            "player" | "jogador" => match args.get(1) {
                Some(username) => ChessCommand::Player(username.to_string()),
                None => {
                    let p = &self.prefix;
                    return BotCommand::Invalid(format!(
                        "❌ Use: `{p}xadrez player <username>`\nExample: `{p}xadrez player hikaru`"
                    ));
                }
            },
            "ajuda" | "help" => ChessCommand::Help,
            _ => match resolve_opponent(args, mentions) {
                Some(opponent) => ChessCommand::Start { opponent },
                None => ChessCommand::Help,
            },
        };
        BotCommand::Chess(cmd)
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Opponent id from the transport's mention list, or from the first `@handle` word.
pub fn resolve_opponent(args: &[&str], mentions: &[String]) -> Option<String> {
    if let Some(first) = mentions.iter().find(|m| !m.trim().is_empty()) {
        return Some(first.trim().to_string());
    }
    let handle = args.iter().find_map(|a| a.strip_prefix('@'))?;
    let handle = handle.trim_end_matches(|c: char| !c.is_alphanumeric());
    if handle.is_empty() {
        return None;
    }
    if handle.contains('@') {
        Some(handle.to_string())
    } else {
        Some(format!("{handle}@{DEFAULT_USER_SERVER}"))
    }
}
