//! Process-wide game counters.
//!
//! Counts games started and finished per game slug, along with how many are live right
//! now and the highest number ever live at once. Values are only logged; nothing is
//! exported.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

static GAME_COUNTERS: OnceLock<Mutex<HashMap<String, GameCounter>>> = OnceLock::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameCounter {
    pub started: u64,
    pub finished: u64,
    pub currently_active: u64,
    pub concurrent_peak: u64,
}

fn counters() -> MutexGuard<'static, HashMap<String, GameCounter>> {
    GAME_COUNTERS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn record_game_started(slug: &str) -> GameCounter {
    let mut guard = counters();
    let counter = guard.entry(slug.to_string()).or_default();
    counter.started = counter.started.saturating_add(1);
    counter.currently_active = counter.currently_active.saturating_add(1);
    if counter.currently_active > counter.concurrent_peak {
        counter.concurrent_peak = counter.currently_active;
    }
    log::debug!(
        "metrics: {} started (active={}, peak={})",
        slug,
        counter.currently_active,
        counter.concurrent_peak
    );
    *counter
}

pub fn record_game_finished(slug: &str) -> GameCounter {
    let mut guard = counters();
    let counter = guard.entry(slug.to_string()).or_default();
    counter.finished = counter.finished.saturating_add(1);
    counter.currently_active = counter.currently_active.saturating_sub(1);
    log::debug!(
        "metrics: {} finished (total={}, active={})",
        slug,
        counter.finished,
        counter.currently_active
    );
    *counter
}

pub fn game_counters_snapshot() -> HashMap<String, GameCounter> {
    counters().clone()
}
