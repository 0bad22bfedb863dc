//! # Chess
//!
//! Session and turn layer around a chess rules engine. The engine decides legality and
//! end conditions; this module decides who may move, keeps per-chat history, evicts
//! finished games and credits results to the [ledger].
//!
//! Rendering and ledger writes run after the game state has changed and can only
//! degrade the reply, never undo the move.

pub mod engine;
pub mod errors;
pub mod ledger;
pub mod lookup;
pub mod messages;
pub mod render;
pub mod session;

use log::{debug, info, warn};

use crate::logutil::short_id;
use crate::metrics;
use crate::render::best_effort;
use crate::reply::Reply;
use crate::session_store::{MemorySessionStore, SessionStore};

pub use engine::{EngineRejection, MoveRecord, RulesEngine, ShakmatyEngine, Side};
pub use errors::ChessError;
pub use ledger::{JsonLedger, Ledger, LedgerError, PlayerRecord};
pub use lookup::{ChessComClient, PlayerCard, PlayerLookup};
pub use render::{DynboardRenderer, PositionRenderer};
pub use session::{ChessSession, GameEnd, MoveOutcome};

pub const GAME_SLUG: &str = "chess";

pub type EngineFactory<E> = Box<dyn Fn() -> E + Send + Sync>;

pub struct ChessGames<E = ShakmatyEngine, S = MemorySessionStore<String, ChessSession<E>>> {
    sessions: S,
    new_engine: EngineFactory<E>,
    ledger: Option<Box<dyn Ledger>>,
    renderer: Option<Box<dyn PositionRenderer>>,
    prefix: String,
}

impl ChessGames {
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new(), Box::new(ShakmatyEngine::new))
    }
}

impl<E, S> ChessGames<E, S>
where
    E: RulesEngine,
    S: SessionStore<String, ChessSession<E>>,
{
    pub fn new(sessions: S, new_engine: EngineFactory<E>) -> Self {
        Self {
            sessions,
            new_engine,
            ledger: None,
            renderer: None,
            prefix: ".".to_string(),
        }
    }

    pub fn with_ledger(mut self, ledger: Box<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn PositionRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn picture(&self, fen: &str) -> Option<String> {
        let renderer = self.renderer.as_ref()?;
        best_effort(GAME_SLUG, renderer.render(fen))
    }

    fn with_board(&self, reply: Reply, fen: &str) -> Reply {
        let reply = reply.with_image(self.picture(fen));
        match render::board_text(fen) {
            Ok(text) => reply.with_board_text(text),
            Err(e) => {
                debug!("chess: no text board for {}: {}", fen, e);
                reply
            }
        }
    }

    /// Post-commit ledger hook for decisive endings; draws are not recorded. Failures
    /// are logged and dropped.
    fn credit(&self, end: GameEnd, white: &str, black: &str) {
        let Some(ledger) = self.ledger.as_ref() else {
            return;
        };
        let (winner, loser) = match end.winner() {
            Some(Side::White) => (white, black),
            Some(Side::Black) => (black, white),
            None => {
                debug!("chess: {:?} leaves the ledger unchanged", end);
                return;
            }
        };
        if let Err(e) = ledger.record_win(winner, loser) {
            warn!("chess: ledger not updated after {:?}: {}", end, e);
        }
    }

    fn finish(&mut self, chat: &str) -> Result<ChessSession<E>, ChessError> {
        let session = self.sessions.remove(&chat.to_string())?;
        metrics::record_game_finished(GAME_SLUG);
        Ok(session)
    }

    /// Open a game in `chat`: `challenger` plays white, `opponent` black.
    pub fn start(
        &mut self,
        chat: &str,
        challenger: &str,
        opponent: &str,
    ) -> Result<Reply, ChessError> {
        if challenger == opponent {
            return Err(ChessError::SamePlayer);
        }
        let session = ChessSession::new((self.new_engine)(), challenger, opponent);
        let fen = session.fen();
        self.sessions.create(chat.to_string(), session)?;
        metrics::record_game_started(GAME_SLUG);
        info!(
            "chess: game started in {} ({} vs {})",
            short_id(chat),
            short_id(challenger),
            short_id(opponent)
        );
        let reply = Reply::text(messages::started(challenger, opponent, &self.prefix))
            .with_mentions([challenger, opponent]);
        Ok(self.with_board(reply, &fen))
    }

    /// Submit `notation` for `player`. Game-ending moves evict the session; checkmate
    /// also updates the ledger.
    pub fn play(&mut self, chat: &str, player: &str, notation: &str) -> Result<Reply, ChessError> {
        let key = chat.to_string();
        let (outcome, white, black) = self.sessions.with_session_mut(&key, |session| {
            session
                .play(player, notation)
                .map(|outcome| (outcome, session.white.clone(), session.black.clone()))
        })??;
        debug!(
            "chess: {} played {} in {}",
            short_id(player),
            outcome.record.san,
            short_id(chat)
        );

        if let Some(end) = outcome.end {
            self.finish(chat)?;
            info!("chess: game in {} ended: {:?}", short_id(chat), end);
            self.credit(end, &white, &black);
        }

        let reply = Reply::text(messages::moved(&outcome)).with_mentions([white, black]);
        Ok(self.with_board(reply, &outcome.fen))
    }

    /// Players, side to move and the last few moves.
    pub fn status(&self, chat: &str) -> Result<Reply, ChessError> {
        let (text, fen, mentions) = self.sessions.with_session(&chat.to_string(), |session| {
            (
                messages::status(session),
                session.fen(),
                [session.white.clone(), session.black.clone()],
            )
        })?;
        Ok(self.with_board(Reply::text(text).with_mentions(mentions), &fen))
    }

    /// `player` gives the game up; the opponent is credited with the win.
    pub fn resign(&mut self, chat: &str, player: &str) -> Result<Reply, ChessError> {
        let key = chat.to_string();
        let end = self
            .sessions
            .with_session_mut(&key, |session| session.resign(player))??;
        let session = self.finish(chat)?;
        let winner = end.winner().map(|side| session.player(side).to_string());
        info!(
            "chess: {} resigned in {}",
            short_id(player),
            short_id(chat)
        );
        self.credit(end, &session.white, &session.black);
        Ok(Reply::text(messages::resigned(end, winner.as_deref().unwrap_or_default()))
            .with_mentions([session.white.clone(), session.black.clone()]))
    }

    /// Top players by points. A ledger that cannot be read yields an apology instead.
    pub fn ranking(&self) -> Reply {
        let book = match self.ledger.as_ref().map(|l| l.load()) {
            None => Default::default(),
            Some(Ok(book)) => book,
            Some(Err(e)) => {
                warn!("chess: ranking unavailable: {}", e);
                return Reply::text("❌ Could not load the ranking!");
            }
        };
        let top = ledger::ranking(&book);
        let mentions: Vec<String> = top.iter().map(|entry| entry.player.clone()).collect();
        Reply::text(ledger::format_ranking(&top)).with_mentions(mentions)
    }

    pub fn coordinates(&self) -> Reply {
        Reply::text(render::coordinates_guide())
    }

    pub fn help(&self) -> Reply {
        Reply::text(messages::help(&self.prefix))
    }

    pub fn is_active(&self, chat: &str) -> bool {
        self.sessions.contains(&chat.to_string())
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
