mod common;

use common::{ALICE, BOB, CHAT};
use tempfile::TempDir;
use zapgames::chess::{ChessError, ChessGames, JsonLedger, Ledger, PlayerRecord};
use zapgames::session_store::SessionError;

fn games_with_ledger(dir: &TempDir) -> (ChessGames, JsonLedger) {
    let ledger = JsonLedger::in_data_dir(dir.path());
    let games = ChessGames::in_memory().with_ledger(Box::new(ledger.clone()));
    (games, ledger)
}

#[test]
fn fools_mate_credits_black_and_closes_the_chat() {
    let dir = TempDir::new().unwrap();
    let (mut games, ledger) = games_with_ledger(&dir);
    games.start(CHAT, ALICE, BOB).unwrap();

    games.play(CHAT, ALICE, "f2f3").unwrap();
    games.play(CHAT, BOB, "e5").unwrap();
    games.play(CHAT, ALICE, "g4").unwrap();
    let reply = games.play(CHAT, BOB, "Qh4#").unwrap();
    assert!(reply.text.contains("Qh4#"));
    assert!(reply.text.contains("CHECKMATE"));
    assert!(reply.text.contains("BLACK WINS"));
    assert!(!games.is_active(CHAT));

    assert_eq!(
        games.play(CHAT, ALICE, "e2e4").unwrap_err(),
        ChessError::Session(SessionError::NoActiveSession)
    );

    let book = ledger.load().unwrap();
    assert_eq!(
        book[BOB],
        PlayerRecord {
            wins: 1,
            losses: 0,
            draws: 0
        }
    );
    assert_eq!(book[ALICE].losses, 1);

    let ranking = games.ranking();
    assert!(ranking.text.contains("🥇 @5511900000002"));
    assert_eq!(ranking.mentions[0], BOB);
}

#[test]
fn stalemate_ends_the_game_without_touching_the_ledger() {
    let dir = TempDir::new().unwrap();
    let (mut games, ledger) = games_with_ledger(&dir);
    games.start(CHAT, ALICE, BOB).unwrap();

    let line = [
        "e3", "a5", "Qh5", "Ra6", "Qxa5", "h5", "h4", "Rah6", "Qxc7", "f6", "Qxd7+", "Kf7",
        "Qxb7", "Qd3", "Qxb8", "Qh7", "Qxc8", "Kg6",
    ];
    for (ply, san) in line.iter().enumerate() {
        let player = if ply % 2 == 0 { ALICE } else { BOB };
        games.play(CHAT, player, san).unwrap();
    }
    let reply = games.play(CHAT, ALICE, "Qe6").unwrap();
    assert!(reply.text.contains("STALEMATE"));
    assert!(!games.is_active(CHAT));

    assert!(!ledger.path().exists());
    assert!(ledger.load().unwrap().is_empty());
    assert!(games.ranking().text.contains("No games recorded yet"));
}

#[test]
fn check_does_not_end_the_game() {
    let mut games = ChessGames::in_memory();
    games.start(CHAT, ALICE, BOB).unwrap();
    games.play(CHAT, ALICE, "e4").unwrap();
    games.play(CHAT, BOB, "d5").unwrap();
    let reply = games.play(CHAT, ALICE, "Bb5+").unwrap();
    assert!(reply.text.contains("CHECK!"));
    assert!(games.is_active(CHAT));
    let status = games.status(CHAT).unwrap().text;
    assert!(status.contains("3. Bb5+"));
    assert!(status.contains("🔄 Last move: f1 → b5"));
}

#[test]
fn fresh_game_status_has_no_last_move() {
    let mut games = ChessGames::in_memory();
    games.start(CHAT, ALICE, BOB).unwrap();
    let status = games.status(CHAT).unwrap().text;
    assert!(status.contains("📊 Total moves: 0"));
    assert!(!status.contains("Last move"));
}

#[test]
fn unwritable_ledger_does_not_undo_the_result() {
    let dir = TempDir::new().unwrap();
    // A regular file where the ledger directory should be.
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, "x").unwrap();
    let mut games =
        ChessGames::in_memory().with_ledger(Box::new(JsonLedger::in_data_dir(&blocker)));

    games.start(CHAT, ALICE, BOB).unwrap();
    let reply = games.resign(CHAT, BOB).unwrap();
    assert!(reply.text.contains("RESIGNATION"));
    assert!(reply.text.contains("Winner: @5511900000001"));
    assert!(!games.is_active(CHAT));
    assert_eq!(games.ranking().text, "❌ Could not load the ranking!");
}

#[test]
fn only_participants_may_move_or_resign() {
    let mut games = ChessGames::in_memory();
    games.start(CHAT, ALICE, BOB).unwrap();
    let stranger = "5511900000003@s.whatsapp.net";
    assert!(matches!(
        games.play(CHAT, stranger, "e4"),
        Err(ChessError::NotYourTurn { .. })
    ));
    assert_eq!(
        games.resign(CHAT, stranger).unwrap_err(),
        ChessError::NotAParticipant
    );
    assert!(games.is_active(CHAT));
}
