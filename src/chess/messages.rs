//! Reply texts for chess.

use super::engine::{RulesEngine, Side};
use super::lookup::PlayerCard;
use super::session::{ChessSession, GameEnd, MoveOutcome};
use crate::reply::mention_name;

/// Moves listed by the status view.
pub const RECENT_MOVES: usize = 5;

fn side_to_play(side: Side) -> &'static str {
    match side {
        Side::White => "♟️ *WHITE* to move!",
        Side::Black => "♟️ *BLACK* to move!",
    }
}

pub fn started(white: &str, black: &str, prefix: &str) -> String {
    format!(
        "♟️ *CHESS GAME STARTED*\n\n\
         🤍 White: @{}\n\
         🖤 Black: @{}\n\n\
         {}\n\n\
         💡 Use `{prefix}xadrez jogada e2e4` to move",
        mention_name(white),
        mention_name(black),
        side_to_play(Side::White)
    )
}

fn end_text(end: GameEnd) -> String {
    match end {
        GameEnd::Checkmate { winner } => match winner {
            Side::White => "🏆 *CHECKMATE!*\n🤍 WHITE WINS!".to_string(),
            Side::Black => "🏆 *CHECKMATE!*\n🖤 BLACK WINS!".to_string(),
        },
        GameEnd::Stalemate => "🤝 *DRAW BY STALEMATE!*".to_string(),
        GameEnd::ThreefoldRepetition => "🤝 *DRAW BY REPETITION!*".to_string(),
        GameEnd::InsufficientMaterial => "🤝 *DRAW BY INSUFFICIENT MATERIAL!*".to_string(),
        GameEnd::Draw => "🤝 *DRAW!*".to_string(),
        GameEnd::Resignation { winner } => format!("🏳️ {} resigned!", winner.opponent().label()),
    }
}

pub fn moved(outcome: &MoveOutcome) -> String {
    let icon = match outcome.record.side {
        Side::White => "🤍",
        Side::Black => "🖤",
    };
    let mut text = format!("♟️ *MOVE PLAYED*\n\n{icon} {}", outcome.record.san);
    match outcome.end {
        Some(end) => {
            text.push_str("\n\n");
            text.push_str(&end_text(end));
        }
        None => {
            if outcome.check {
                text.push_str("\n\n⚠️ *CHECK!*");
            }
            text.push_str("\n\n");
            text.push_str(side_to_play(outcome.next));
        }
    }
    text
}

pub fn status<E: RulesEngine>(session: &ChessSession<E>) -> String {
    let mut text = format!(
        "♟️ *GAME STATUS*\n\n\
         🤍 White: @{}\n\
         🖤 Black: @{}\n\n\
         {}\n\
         📊 Total moves: {}",
        mention_name(&session.white),
        mention_name(&session.black),
        side_to_play(session.side_to_move()),
        session.moves.len()
    );
    if let Some(last) = session.last_move() {
        text.push_str(&format!("\n🔄 Last move: {} → {}", last.from, last.to));
    }
    let recent: Vec<String> = session
        .recent_moves(RECENT_MOVES)
        .map(|(n, played)| format!("{n}. {}", played.record.san))
        .collect();
    if !recent.is_empty() {
        text.push_str("\n\n📜 Last moves:\n");
        text.push_str(&recent.join("\n"));
    }
    text
}

pub fn resigned(end: GameEnd, winner_id: &str) -> String {
    format!(
        "🏳️ *RESIGNATION*\n\n{}\n\n🏆 Winner: @{}",
        end_text(end),
        mention_name(winner_id)
    )
}

pub fn player_card(card: &PlayerCard) -> String {
    let profile = &card.profile;
    let joined = chrono::DateTime::<chrono::Utc>::from_timestamp(profile.joined, 0)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let mut text = format!(
        "♟️ *CHESS.COM PROFILE*\n\n\
         👤 Player: {}\n\
         🆔 ID: {}\n\
         🔗 {}\n\
         📅 Joined: {}",
        profile.username, profile.player_id, profile.url, joined
    );
    for (mode, stats) in card.stats.modes() {
        text.push_str(&format!(
            "\n\n⏱️ *{mode}*: {}\n   ✅ {}  ❌ {}  🤝 {}",
            stats.last.rating, stats.record.win, stats.record.loss, stats.record.draw
        ));
    }
    text
}

pub fn player_not_found() -> String {
    "❌ Player not found on Chess.com!\n\n💡 Check that the username is spelled correctly"
        .to_string()
}

pub fn help(prefix: &str) -> String {
    format!(
        "♟️ *CHESS COMMANDS*\n\n\
         🆕 *Start a game:*\n\
         {prefix}xadrez @opponent\n\
         (you play white)\n\n\
         ♟️ *Make a move:*\n\
         {prefix}xadrez jogada e2e4\n\
         {prefix}xadrez jogada Nf3\n\n\
         📊 *Show the board:*\n\
         {prefix}xadrez status\n\n\
         📍 *Coordinates:*\n\
         {prefix}xadrez coordenadas\n\n\
         🏳️ *Resign:*\n\
         {prefix}xadrez desistir\n\n\
         🏆 *Ranking:*\n\
         {prefix}xadrez ranking\n\n\
         🌐 *Chess.com profile:*\n\
         {prefix}xadrez player <username>\n\n\
         💡 *Move examples:*\n\
         • e2e4 (pawn on file E from rank 2 to rank 4)\n\
         • Nf3 (knight to f3)\n\
         • Bb5 (bishop to b5)\n\
         • O-O (short castle)\n\
         • O-O-O (long castle)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::engine::MoveRecord;

    fn outcome(san: &str, side: Side, check: bool, end: Option<GameEnd>) -> MoveOutcome {
        MoveOutcome {
            record: MoveRecord {
                san: san.into(),
                from: "e2".into(),
                to: "e4".into(),
                side,
            },
            check,
            end,
            next: side.opponent(),
            fen: String::new(),
        }
    }

    #[test]
    fn plain_move_names_next_side() {
        let text = moved(&outcome("e4", Side::White, false, None));
        assert!(text.contains("🤍 e4"));
        assert!(text.ends_with("*BLACK* to move!"));
    }

    #[test]
    fn check_is_flagged() {
        let text = moved(&outcome("Bb5+", Side::White, true, None));
        assert!(text.contains("⚠️ *CHECK!*"));
    }

    #[test]
    fn end_replaces_turn_line() {
        let mate = GameEnd::Checkmate {
            winner: Side::Black,
        };
        let text = moved(&outcome("Qh4#", Side::Black, false, Some(mate)));
        assert!(text.contains("BLACK WINS"));
        assert!(!text.contains("to move"));
    }

    #[test]
    fn player_card_lists_only_played_modes() {
        use crate::chess::lookup::{ModeStats, PlayerProfile, PlayerStats, Rating, Record};
        let card = PlayerCard {
            profile: PlayerProfile {
                username: "erik".into(),
                player_id: 41,
                url: "https://www.chess.com/member/erik".into(),
                joined: 1178556600,
            },
            stats: PlayerStats {
                chess_rapid: Some(ModeStats {
                    last: Rating { rating: 1800 },
                    record: Record {
                        win: 7,
                        loss: 3,
                        draw: 1,
                    },
                }),
                ..PlayerStats::default()
            },
        };
        let text = player_card(&card);
        assert!(text.contains("👤 Player: erik"));
        assert!(text.contains("🆔 ID: 41"));
        assert!(text.contains("📅 Joined: 2007-05-07"));
        assert!(text.contains("*Rapid*: 1800"));
        assert!(text.contains("✅ 7  ❌ 3  🤝 1"));
        assert!(!text.contains("Blitz"));
    }

    #[test]
    fn resignation_names_loser_and_winner() {
        let end = GameEnd::Resignation {
            winner: Side::White,
        };
        let text = resigned(end, "55@s.whatsapp.net");
        assert!(text.contains("🖤 Black resigned!"));
        assert!(text.contains("Winner: @55"));
    }
}
