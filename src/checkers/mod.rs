//! # Checkers
//!
//! Complete rule implementation for 8x8 checkers played between two chat members.
//!
//! - [board]: board model, pieces and the algebraic coordinate codec
//! - [rules]: move validation (with the global mandatory-capture scan), execution and
//!   win detection
//! - [session]: per-chat game state and the turn state machine
//! - [render]: best-effort board pictures
//! - [messages]: reply texts
//!
//! [CheckersGames] ties them together behind the four chat operations (start, move,
//! show, stop) plus the rules text. A game leaves the store when someone wins or when it
//! is stopped; nothing is persisted.

pub mod board;
pub mod errors;
pub mod messages;
pub mod render;
pub mod rules;
pub mod session;

use log::{debug, info};

use crate::logutil::short_id;
use crate::metrics;
use crate::render::best_effort;
use crate::reply::Reply;
use crate::session_store::{MemorySessionStore, SessionStore};

pub use board::{Board, Color, Piece, PieceKind, Position};
pub use errors::{CheckersError, MoveRejection};
pub use render::{BoardRenderer, ChartSvgRenderer};
pub use rules::{ExecutedMove, MoveValidation};
pub use session::{CheckersSession, MoveReport, TurnState};

pub const GAME_SLUG: &str = "checkers";

pub struct CheckersGames<S = MemorySessionStore<String, CheckersSession>> {
    sessions: S,
    renderer: Option<Box<dyn BoardRenderer>>,
    prefix: String,
}

impl CheckersGames {
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }
}

impl<S: SessionStore<String, CheckersSession>> CheckersGames<S> {
    pub fn new(sessions: S) -> Self {
        Self {
            sessions,
            renderer: None,
            prefix: ".".to_string(),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn BoardRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Command prefix quoted in reply texts.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn picture(&self, board: &Board, to_move: Color) -> Option<String> {
        let renderer = self.renderer.as_ref()?;
        best_effort(GAME_SLUG, renderer.render(board, to_move))
    }

    /// Open a game in `chat`: `challenger` plays white, `opponent` black.
    pub fn start(
        &mut self,
        chat: &str,
        challenger: &str,
        opponent: &str,
    ) -> Result<Reply, CheckersError> {
        if challenger == opponent {
            return Err(CheckersError::SamePlayer);
        }
        let session = CheckersSession::new(challenger, opponent);
        let text = messages::started(&session, &self.prefix);
        let board = session.board.clone();
        self.sessions.create(chat.to_string(), session)?;
        metrics::record_game_started(GAME_SLUG);
        info!(
            "checkers: game started in {} ({} vs {})",
            short_id(chat),
            short_id(challenger),
            short_id(opponent)
        );
        Ok(Reply::text(text)
            .with_mentions([challenger, opponent])
            .with_image(self.picture(&board, Color::White))
            .with_board_text(board.to_text()))
    }

    /// Submit a move for `player`. A winning move also ends the game.
    pub fn play(
        &mut self,
        chat: &str,
        player: &str,
        origin: &str,
        dest: &str,
    ) -> Result<Reply, CheckersError> {
        let key = chat.to_string();
        let (report, board) = self.sessions.with_session_mut(&key, |session| {
            session
                .play(player, origin, dest)
                .map(|report| (report, session.board.clone()))
        })??;
        debug!(
            "checkers: {} played {} -> {} in {} (move {})",
            short_id(player),
            report.executed.from,
            report.executed.to,
            short_id(chat),
            report.move_number
        );

        if let Some(winner) = report.winner {
            let finished = self.sessions.remove(&key)?;
            metrics::record_game_finished(GAME_SLUG);
            let winner_id = finished.player(winner).to_string();
            info!(
                "checkers: {} won in {} after {} moves",
                short_id(&winner_id),
                short_id(chat),
                finished.moves
            );
            return Ok(Reply::text(messages::victory(&finished, winner, &self.prefix))
                .with_mentions([winner_id])
                .with_image(self.picture(&board, report.next_color))
                .with_board_text(board.to_text()));
        }

        Ok(Reply::text(messages::moved(&report))
            .with_mentions([report.next_player.clone()])
            .with_image(self.picture(&board, report.next_color))
            .with_board_text(board.to_text()))
    }

    /// Current board, players, piece counts and elapsed time.
    pub fn show(&self, chat: &str) -> Result<Reply, CheckersError> {
        let (text, board, to_move, mention) =
            self.sessions.with_session(&chat.to_string(), |session| {
                (
                    messages::status(session),
                    session.board.clone(),
                    session.color_to_move().unwrap_or(Color::White),
                    session.to_move_id.clone(),
                )
            })?;
        Ok(Reply::text(text)
            .with_mentions([mention])
            .with_image(self.picture(&board, to_move))
            .with_board_text(board.to_text()))
    }

    /// End the game in `chat` without a winner.
    pub fn stop(&mut self, chat: &str) -> Result<Reply, CheckersError> {
        let session = self.sessions.remove(&chat.to_string())?;
        metrics::record_game_finished(GAME_SLUG);
        info!(
            "checkers: game stopped in {} after {} moves",
            short_id(chat),
            session.moves
        );
        Ok(Reply::text(messages::stopped(&session, &self.prefix)))
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
