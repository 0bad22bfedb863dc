//! Reply texts for checkers.

use super::board::Color;
use super::session::{CheckersSession, MoveReport};
use crate::reply::mention_name;

pub fn started(session: &CheckersSession, prefix: &str) -> String {
    let white = mention_name(&session.white);
    let black = mention_name(&session.black);
    format!(
        "🎲 *CHECKERS GAME STARTED!*\n\n\
         ♟️ *Players:*\n\
         ⚪ White: @{white}\n\
         ⚫ Black: @{black}\n\n\
         🎯 *To move:* @{white} (⚪ White)\n\n\
         📍 *How to play:*\n\
         Use: `{prefix}damasjogada <from> <to>`\n\
         Example: `{prefix}damasjogada c3 d4`\n\n\
         📋 *Commands:*\n\
         • `{prefix}damastabuleiro` - Show the board\n\
         • `{prefix}damasparar` - End the game\n\
         • `{prefix}damasajuda` - Show the rules\n\n\
         🎮 *Good luck!*"
    )
}

pub fn moved(report: &MoveReport) -> String {
    let executed = &report.executed;
    let (headline, arrow) = if executed.is_capture() {
        ("🎯 CAPTURE!", "captures")
    } else {
        ("✅ Move played!", "→")
    };
    let mut text = format!("{headline}\n\n📍 {} {arrow} {}\n", executed.from, executed.to);
    if executed.promoted() {
        text.push_str("👑 PIECE CROWNED!\n");
    }
    text.push_str(&format!(
        "\n🎯 *To move:* @{} ({})\n\n📊 Move {}",
        mention_name(&report.next_player),
        report.next_color.label(),
        report.move_number
    ));
    text
}

pub fn victory(session: &CheckersSession, winner: Color, prefix: &str) -> String {
    format!(
        "🏆 *VICTORY!*\n\n\
         👑 @{} won the game!\n\n\
         📊 *Stats:*\n\
         ⏱️ Duration: {}s\n\
         🎯 Moves: {}\n\n\
         🎮 Use `{prefix}damas @opponent` to play again!",
        mention_name(session.player(winner)),
        session.elapsed_secs(),
        session.moves
    )
}

pub fn status(session: &CheckersSession) -> String {
    let turn = session
        .color_to_move()
        .map(Color::label)
        .unwrap_or("finished");
    format!(
        "🎲 *CHECKERS*\n\n\
         ♟️ *Players:*\n\
         ⚪ White: @{} ({} pieces)\n\
         ⚫ Black: @{} ({} pieces)\n\n\
         🎯 *To move:* @{} ({turn})\n\n\
         📊 Move {}\n\
         ⏱️ {}s",
        mention_name(&session.white),
        session.board.count(Color::White),
        mention_name(&session.black),
        session.board.count(Color::Black),
        mention_name(&session.to_move_id),
        session.moves,
        session.elapsed_secs()
    )
}

pub fn stopped(session: &CheckersSession, prefix: &str) -> String {
    format!(
        "🛑 *Game over!*\n\n\
         ⏱️ Duration: {}s\n\
         🎯 Moves: {}\n\n\
         🎮 Use `{prefix}damas @opponent` to play again!",
        session.elapsed_secs(),
        session.moves
    )
}

pub fn help(prefix: &str) -> String {
    format!(
        "🎲 *CHECKERS - RULES*\n\n\
         📍 *How to play:*\n\
         • Pieces move diagonally\n\
         • White moves up (⚪↑)\n\
         • Black moves down (⚫↓)\n\
         • Captures are mandatory\n\
         • One capture per turn\n\
         • A man reaching the far row is crowned 👑\n\
         • Kings move in any diagonal direction\n\n\
         🎯 *Commands:*\n\
         `{prefix}damas @opponent` - Start a game\n\
         `{prefix}damasjogada <from> <to>` - Make a move\n\
         `{prefix}damastabuleiro` - Show the board\n\
         `{prefix}damasparar` - End the game\n\n\
         📋 *Examples:*\n\
         `{prefix}damasjogada c3 d4` - Move a piece\n\
         `{prefix}damasjogada c3 e5` - Capture a piece\n\n\
         📍 *Coordinates:*\n\
         Files: a-h (left → right)\n\
         Ranks: 1-8 (bottom → top)\n\n\
         🏆 *Victory:*\n\
         Capture every opposing piece!"
    )
}
