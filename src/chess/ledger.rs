//! Persistent chess win/loss/draw ledger.
//!
//! The whole book is one JSON object keyed by player id, re-read and rewritten under an
//! exclusive `fs2` lock after every checkmate or resignation. Readers take a shared lock. Callers treat
//! every [LedgerError] as non-fatal: the game result has already been decided.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reply::mention_name;

/// Entries shown by the ranking command.
pub const RANKING_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
}

impl PlayerRecord {
    /// Three points per win, one per draw.
    pub fn points(&self) -> u32 {
        self.wins
            .saturating_mul(3)
            .saturating_add(self.draws)
    }
}

pub type LedgerBook = BTreeMap<String, PlayerRecord>;

/// Where finished chess games are credited.
pub trait Ledger: Send + Sync {
    fn load(&self) -> Result<LedgerBook, LedgerError>;

    fn record_win(&self, winner: &str, loser: &str) -> Result<(), LedgerError>;
}

/// JSON file ledger, normally at `<data_dir>/chess/ledger.json`.
#[derive(Debug, Clone)]
pub struct JsonLedger {
    path: PathBuf,
}

impl JsonLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join("chess").join("ledger.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> std::io::Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }

    /// Read-modify-write the book under one exclusive lock.
    fn update(&self, apply: impl FnOnce(&mut LedgerBook)) -> Result<(), LedgerError> {
        self.ensure_parent()?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let result = (|| -> Result<(), LedgerError> {
            let mut book = read_book(&mut file)?;
            apply(&mut book);
            let data = serde_json::to_string_pretty(&book)?;
            file.seek(SeekFrom::Start(0))?;
            file.set_len(0)?;
            file.write_all(data.as_bytes())?;
            file.flush()?;
            Ok(())
        })();
        let _ = file.unlock();
        result
    }
}

fn read_book(file: &mut fs::File) -> Result<LedgerBook, LedgerError> {
    let mut raw = String::new();
    file.read_to_string(&mut raw)?;
    let cleaned = raw.trim_start_matches('\0').trim();
    if cleaned.is_empty() {
        return Ok(LedgerBook::new());
    }
    Ok(serde_json::from_str(cleaned)?)
}

impl Ledger for JsonLedger {
    fn load(&self) -> Result<LedgerBook, LedgerError> {
        let mut file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LedgerBook::new()),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let book = read_book(&mut file);
        let _ = file.unlock();
        book
    }

    fn record_win(&self, winner: &str, loser: &str) -> Result<(), LedgerError> {
        self.update(|book| {
            let w = book.entry(winner.to_string()).or_default();
            w.wins = w.wins.saturating_add(1);
            let l = book.entry(loser.to_string()).or_default();
            l.losses = l.losses.saturating_add(1);
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub player: String,
    pub record: PlayerRecord,
}

/// Top [RANKING_SIZE] players by points. Ties keep player-id order.
pub fn ranking(book: &LedgerBook) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = book
        .iter()
        .map(|(player, record)| RankingEntry {
            player: player.clone(),
            record: *record,
        })
        .collect();
    entries.sort_by(|a, b| b.record.points().cmp(&a.record.points()));
    entries.truncate(RANKING_SIZE);
    entries
}

pub fn format_ranking(entries: &[RankingEntry]) -> String {
    if entries.is_empty() {
        return "📊 *CHESS RANKING*\n\nNo games recorded yet!".to_string();
    }
    let mut out = String::from("🏆 *CHESS RANKING*\n\n");
    for (idx, entry) in entries.iter().enumerate() {
        let medal = match idx {
            0 => "🥇".to_string(),
            1 => "🥈".to_string(),
            2 => "🥉".to_string(),
            n => format!("{}.", n + 1),
        };
        let r = entry.record;
        out.push_str(&format!(
            "{} @{}\n   🏆 {}W | ❌ {}L | 🤝 {}D | 📊 {}pts\n\n",
            medal,
            mention_name(&entry.player),
            r.wins,
            r.losses,
            r.draws,
            r.points()
        ));
    }
    out.truncate(out.trim_end().len());
    out
}
