//! Chat-keyed session storage shared by the game engines.
//!
//! Every game keeps at most one live session per chat. The [SessionStore] trait is the
//! seam between the engines and wherever the sessions actually live:
//!
//! - [MemorySessionStore] is a plain map owned by a single caller (tests, one-shot tools).
//! - [SharedSessionStore] puts the map behind `Arc<Mutex<_>>` so clones handed to other
//!   tasks observe the same sessions and every mutation runs under the lock.
//!
//! Sessions never expire; they leave the store only through [SessionStore::remove].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

/// Session-store contract violations, surfaced to players as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("⚠️ There is already an active game in this chat!")]
    SessionAlreadyActive,
    #[error("⚠️ There is no active game in this chat!")]
    NoActiveSession,
}

pub trait SessionStore<K, V> {
    /// Insert a brand-new session. Fails without touching the existing entry when the
    /// key is already taken.
    fn create(&mut self, key: K, session: V) -> Result<(), SessionError>;

    /// Run `f` against the session for `key`.
    fn with_session<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Result<R, SessionError>;

    /// Run `f` against a mutable borrow of the session for `key`.
    fn with_session_mut<R>(
        &mut self,
        key: &K,
        f: impl FnOnce(&mut V) -> R,
    ) -> Result<R, SessionError>;

    /// Drop the session for `key`, handing it back to the caller.
    fn remove(&mut self, key: &K) -> Result<V, SessionError>;

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct MemorySessionStore<K, V> {
    sessions: HashMap<K, V>,
}

impl<K, V> MemorySessionStore<K, V> {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }
}

impl<K, V> Default for MemorySessionStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> SessionStore<K, V> for MemorySessionStore<K, V> {
    fn create(&mut self, key: K, session: V) -> Result<(), SessionError> {
        if self.sessions.contains_key(&key) {
            return Err(SessionError::SessionAlreadyActive);
        }
        self.sessions.insert(key, session);
        Ok(())
    }

    fn with_session<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Result<R, SessionError> {
        self.sessions
            .get(key)
            .map(f)
            .ok_or(SessionError::NoActiveSession)
    }

    fn with_session_mut<R>(
        &mut self,
        key: &K,
        f: impl FnOnce(&mut V) -> R,
    ) -> Result<R, SessionError> {
        self.sessions
            .get_mut(key)
            .map(f)
            .ok_or(SessionError::NoActiveSession)
    }

    fn remove(&mut self, key: &K) -> Result<V, SessionError> {
        self.sessions.remove(key).ok_or(SessionError::NoActiveSession)
    }

    fn contains(&self, key: &K) -> bool {
        self.sessions.contains_key(key)
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// Clonable store handle; all clones share one map guarded by a mutex.
#[derive(Debug)]
pub struct SharedSessionStore<K, V> {
    inner: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> SharedSessionStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        // A panic while holding the lock leaves the map itself intact; keep serving it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K, V> Clone for SharedSessionStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for SharedSessionStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> SessionStore<K, V> for SharedSessionStore<K, V> {
    fn create(&mut self, key: K, session: V) -> Result<(), SessionError> {
        let mut guard = self.lock();
        if guard.contains_key(&key) {
            return Err(SessionError::SessionAlreadyActive);
        }
        guard.insert(key, session);
        Ok(())
    }

    fn with_session<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Result<R, SessionError> {
        let guard = self.lock();
        guard.get(key).map(f).ok_or(SessionError::NoActiveSession)
    }

    fn with_session_mut<R>(
        &mut self,
        key: &K,
        f: impl FnOnce(&mut V) -> R,
    ) -> Result<R, SessionError> {
        let mut guard = self.lock();
        guard.get_mut(key).map(f).ok_or(SessionError::NoActiveSession)
    }

    fn remove(&mut self, key: &K) -> Result<V, SessionError> {
        self.lock().remove(key).ok_or(SessionError::NoActiveSession)
    }

    fn contains(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
