//! Bot server: turns inbound chat events into game replies.
//!
//! The transport (a WhatsApp bridge) writes one JSON [ChatEvent] per line and reads one
//! JSON [OutgoingReply] per line back. Messages are handled strictly one after another,
//! including while a Chess.com lookup is in flight.

use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::commands::{BotCommand, CheckersCommand, ChessCommand, CommandParser};
use super::games::{
    enabled_doors, format_games_menu, has_enabled_doors, resolve_games_command, GameDoor,
    GameDoorKind,
};
use crate::checkers::{ChartSvgRenderer, CheckersError, CheckersGames, CheckersSession};
use crate::chess::{
    messages as chess_messages, ChessComClient, ChessError, ChessGames, ChessSession,
    DynboardRenderer, JsonLedger, PlayerLookup, ShakmatyEngine,
};
use crate::config::Config;
use crate::logutil::{escape_log, short_id};
use crate::metrics;
use crate::reply::Reply;
use crate::session_store::SharedSessionStore;

type CheckersStore = SharedSessionStore<String, CheckersSession>;
type ChessStore = SharedSessionStore<String, ChessSession<ShakmatyEngine>>;

/// One message seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub chat: String,
    pub sender: String,
    pub text: String,
    /// Player ids mentioned in the message, as resolved by the transport.
    #[serde(default)]
    pub mentions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingReply {
    pub chat: String,
    pub reply: Reply,
}

pub struct BotServer<L = ChessComClient> {
    config: Config,
    parser: CommandParser,
    doors: Vec<GameDoor>,
    checkers: CheckersGames<CheckersStore>,
    chess: ChessGames<ShakmatyEngine, ChessStore>,
    lookup: L,
}

impl BotServer {
    pub fn new(config: Config) -> Self {
        let lookup = ChessComClient::from_config(&config.games);
        Self::with_lookup(config, lookup)
    }
}

impl<L: PlayerLookup> BotServer<L> {
    pub fn with_lookup(config: Config, lookup: L) -> Self {
        let prefix = config.bot.prefix.clone();
        let games = &config.games;

        let mut checkers = CheckersGames::new(CheckersStore::new()).with_prefix(prefix.clone());
        let mut chess = ChessGames::new(ChessStore::new(), Box::new(ShakmatyEngine::new))
            .with_prefix(prefix.clone())
            .with_ledger(Box::new(JsonLedger::in_data_dir(&config.storage.data_dir)));
        if games.render_images {
            checkers = checkers.with_renderer(Box::new(ChartSvgRenderer::new(
                games.checkers_render_url.clone(),
            )));
            chess = chess.with_renderer(Box::new(DynboardRenderer::new(
                games.chess_render_url.clone(),
            )));
        }

        Self {
            parser: CommandParser::new(prefix),
            doors: enabled_doors(games),
            checkers,
            chess,
            config,
            lookup,
        }
    }

    fn door(&self, kind: GameDoorKind) -> Option<&GameDoor> {
        self.doors.iter().find(|door| door.kind == kind)
    }

    fn disabled(kind: GameDoorKind) -> Reply {
        let name = match kind {
            GameDoorKind::Checkers => "Checkers",
            GameDoorKind::Chess => "Chess",
        };
        Reply::text(format!("⚠️ {name} is disabled on this bot."))
    }

    /// Reply for one event, or `None` when the message is not a bot command.
    pub async fn handle_event(&mut self, event: &ChatEvent) -> Option<Reply> {
        let command = self.parser.parse(&event.text, &event.mentions);
        if command == BotCommand::Unknown {
            return None;
        }
        debug!(
            "{} in {}: {}",
            short_id(&event.sender),
            short_id(&event.chat),
            escape_log(&event.text)
        );
        let chat = event.chat.as_str();
        let sender = event.sender.as_str();

        let reply = match command {
            BotCommand::Unknown => return None,
            BotCommand::Invalid(usage) => Reply::text(usage),
            BotCommand::Games(None) => self.games_menu(),
            BotCommand::Games(Some(selector)) => {
                match resolve_games_command(&selector, &self.doors).map(|door| door.kind) {
                    Some(GameDoorKind::Checkers) => self.checkers.help(),
                    Some(GameDoorKind::Chess) => self.chess.help(),
                    None => self.games_menu(),
                }
            }
            BotCommand::Checkers(cmd) => {
                if self.door(GameDoorKind::Checkers).is_none() {
                    Self::disabled(GameDoorKind::Checkers)
                } else {
                    self.checkers_command(chat, sender, cmd)
                        .unwrap_or_else(checkers_error_reply)
                }
            }
            BotCommand::Chess(cmd) => {
                if self.door(GameDoorKind::Chess).is_none() {
                    Self::disabled(GameDoorKind::Chess)
                } else {
                    self.chess_command(chat, sender, cmd)
                        .await
                        .unwrap_or_else(chess_error_reply)
                }
            }
        };
        Some(reply)
    }

    fn games_menu(&self) -> Reply {
        let text = format_games_menu(
            &self.doors,
            |kind| match kind {
                GameDoorKind::Checkers => self.checkers.active_count(),
                GameDoorKind::Chess => self.chess.active_count(),
            },
            self.parser.prefix(),
        );
        Reply::text(text)
    }

    fn checkers_command(
        &mut self,
        chat: &str,
        sender: &str,
        cmd: CheckersCommand,
    ) -> Result<Reply, CheckersError> {
        match cmd {
            CheckersCommand::Start { opponent } => self.checkers.start(chat, sender, &opponent),
            CheckersCommand::Move { from, to } => self.checkers.play(chat, sender, &from, &to),
            CheckersCommand::Board => self.checkers.show(chat),
            CheckersCommand::Stop => self.checkers.stop(chat),
            CheckersCommand::Help => Ok(self.checkers.help()),
        }
    }

    async fn chess_command(
        &mut self,
        chat: &str,
        sender: &str,
        cmd: ChessCommand,
    ) -> Result<Reply, ChessError> {
        match cmd {
            ChessCommand::Start { opponent } => self.chess.start(chat, sender, &opponent),
            ChessCommand::Move(notation) => self.chess.play(chat, sender, &notation),
            ChessCommand::Status => self.chess.status(chat),
            ChessCommand::Resign => self.chess.resign(chat, sender),
            ChessCommand::Ranking => Ok(self.chess.ranking()),
            ChessCommand::Coordinates => Ok(self.chess.coordinates()),
            ChessCommand::Player(username) => Ok(self.player_card(&username).await),
            ChessCommand::Help => Ok(self.chess.help()),
        }
    }

    async fn player_card(&self, username: &str) -> Reply {
        match self.lookup.player(username).await {
            Ok(card) => Reply::text(chess_messages::player_card(&card)),
            Err(e) => {
                warn!("Chess.com lookup for '{}' failed: {}", escape_log(username), e);
                Reply::text(chess_messages::player_not_found())
            }
        }
    }

    /// Serve JSON-lines events from `reader` until it closes, writing replies to `writer`.
    pub async fn run_with<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event: ChatEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Ignoring malformed event '{}': {}", escape_log(line), e);
                    continue;
                }
            };
            let Some(reply) = self.handle_event(&event).await else {
                continue;
            };
            let out = OutgoingReply {
                chat: event.chat,
                reply,
            };
            let mut data = serde_json::to_string(&out)?;
            data.push('\n');
            writer.write_all(data.as_bytes()).await?;
            writer.flush().await?;
        }
        info!("Event stream closed");
        Ok(())
    }

    /// Serve stdin/stdout until end of input or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "{} ready (prefix '{}', {} game(s) enabled)",
            self.config.bot.name,
            self.parser.prefix(),
            self.doors.len()
        );
        if !has_enabled_doors(&self.config.games) {
            warn!("No games are enabled; only the games menu will answer");
        }
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        let result = tokio::select! {
            result = self.run_with(stdin, stdout) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                Ok(())
            }
        };
        for (slug, counter) in metrics::game_counters_snapshot() {
            info!(
                "{}: {} started, {} finished, {} still active (peak {})",
                slug,
                counter.started,
                counter.finished,
                counter.currently_active,
                counter.concurrent_peak
            );
        }
        result
    }
}

fn checkers_error_reply(err: CheckersError) -> Reply {
    let reply = Reply::text(err.to_string());
    match err {
        CheckersError::NotYourTurn { expected } => reply.with_mentions([expected]),
        _ => reply,
    }
}

fn chess_error_reply(err: ChessError) -> Reply {
    let reply = Reply::text(err.to_string());
    match err {
        ChessError::NotYourTurn { expected, .. } => reply.with_mentions([expected]),
        _ => reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::lookup::{PlayerProfile, PlayerStats};
    use crate::chess::PlayerCard;
    use anyhow::anyhow;
    use tempfile::TempDir;

    /// Knows a single Chess.com account.
    struct OnePlayer;

    impl PlayerLookup for OnePlayer {
        async fn player(&self, username: &str) -> anyhow::Result<PlayerCard> {
            if username.eq_ignore_ascii_case("erik") {
                Ok(PlayerCard {
                    profile: PlayerProfile {
                        username: "erik".into(),
                        player_id: 41,
                        url: "https://www.chess.com/member/erik".into(),
                        joined: 1178556600,
                    },
                    stats: PlayerStats::default(),
                })
            } else {
                Err(anyhow!("API returned status: 404 Not Found"))
            }
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_string_lossy().into_owned();
        config.games.render_images = false;
        config
    }

    fn server(dir: &TempDir) -> BotServer<OnePlayer> {
        BotServer::with_lookup(test_config(dir), OnePlayer)
    }

    fn event(sender: &str, text: &str) -> ChatEvent {
        ChatEvent {
            chat: "g1@g.us".into(),
            sender: sender.into(),
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn plain_chat_gets_no_reply() {
        let dir = TempDir::new().unwrap();
        let mut bot = server(&dir);
        assert_eq!(bot.handle_event(&event("a@s.whatsapp.net", "hello")).await, None);
    }

    #[test]
    fn empty_stream_ends_cleanly() {
        let dir = TempDir::new().unwrap();
        let mut bot = server(&dir);
        let mut out = Vec::new();
        let input = tokio::io::BufReader::new(&b"\n\n"[..]);
        tokio_test::block_on(bot.run_with(input, &mut out)).unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn not_your_turn_mentions_the_expected_player() {
        let dir = TempDir::new().unwrap();
        let mut bot = server(&dir);
        bot.handle_event(&event("1@s.whatsapp.net", ".damas @2")).await.unwrap();
        let reply = bot
            .handle_event(&event("2@s.whatsapp.net", ".damasjogada f6 e5"))
            .await
            .unwrap();
        assert!(reply.text.contains("not your turn"));
        assert_eq!(reply.mentions, vec!["1@s.whatsapp.net".to_string()]);
    }

    #[tokio::test]
    async fn disabled_game_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.games.chess_enabled = false;
        let mut bot = BotServer::with_lookup(config, OnePlayer);
        let reply = bot.handle_event(&event("1@x", ".xadrez @2")).await.unwrap();
        assert_eq!(reply.text, "⚠️ Chess is disabled on this bot.");
        let menu = bot.handle_event(&event("1@x", ".jogos")).await.unwrap();
        assert!(!menu.text.contains("Chess"));
    }

    #[tokio::test]
    async fn games_menu_counts_live_games_and_selects_help() {
        let dir = TempDir::new().unwrap();
        let mut bot = server(&dir);
        bot.handle_event(&event("1@s.whatsapp.net", ".xadrez @2")).await.unwrap();
        let menu = bot.handle_event(&event("3@x", ".jogos")).await.unwrap();
        assert!(menu.text.contains("1) Checkers (0 active)"));
        assert!(menu.text.contains("2) Chess (1 active)"));
        let help = bot.handle_event(&event("3@x", ".games 1")).await.unwrap();
        assert!(help.text.contains("damasjogada"));
    }

    #[tokio::test]
    async fn player_lookup_answers_with_the_profile() {
        let dir = TempDir::new().unwrap();
        let mut bot = server(&dir);
        let reply = bot.handle_event(&event("1@x", ".xadrez player Erik")).await.unwrap();
        assert!(reply.text.contains("CHESS.COM PROFILE"));
        assert!(reply.text.contains("🆔 ID: 41"));
    }

    #[tokio::test]
    async fn failed_player_lookup_is_a_not_found_reply() {
        let dir = TempDir::new().unwrap();
        let mut bot = server(&dir);
        let reply = bot.handle_event(&event("1@x", ".xadrez player nobody")).await.unwrap();
        assert_eq!(reply.text, chess_messages::player_not_found());
        assert!(reply.mentions.is_empty());
    }
}
