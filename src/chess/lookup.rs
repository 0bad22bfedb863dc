//! Chess.com player lookup for `xadrez player <username>`.
//!
//! Uses the public API (`/player/{username}` and `/player/{username}/stats`). Any
//! failure, from a bad username to a timeout, ends as a "player not found" reply; the
//! cause only goes to the log.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::timeout;

use crate::config::GamesConfig;

pub const DEFAULT_CHESSCOM_API: &str = "https://api.chess.com/pub";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerProfile {
    pub username: String,
    pub player_id: u64,
    pub url: String,
    /// Unix seconds.
    pub joined: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rating {
    pub rating: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub loss: u32,
    #[serde(default)]
    pub draw: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ModeStats {
    pub last: Rating,
    #[serde(default)]
    pub record: Record,
}

/// Ratings per time control; modes the player never played are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerStats {
    pub chess_rapid: Option<ModeStats>,
    pub chess_blitz: Option<ModeStats>,
    pub chess_bullet: Option<ModeStats>,
}

impl PlayerStats {
    pub fn modes(&self) -> impl Iterator<Item = (&'static str, &ModeStats)> {
        [
            ("Rapid", self.chess_rapid.as_ref()),
            ("Blitz", self.chess_blitz.as_ref()),
            ("Bullet", self.chess_bullet.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, stats)| stats.map(|s| (name, s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub profile: PlayerProfile,
    pub stats: PlayerStats,
}

/// Source of public player profiles.
pub trait PlayerLookup: Send + Sync {
    fn player(&self, username: &str) -> impl Future<Output = Result<PlayerCard>> + Send;
}

/// Chess.com usernames: 3 to 25 letters, digits, `_` or `-`.
pub fn valid_username(username: &str) -> bool {
    (3..=25).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub struct ChessComClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ChessComClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("zapgames/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    pub fn from_config(config: &GamesConfig) -> Self {
        Self::new(
            config.chesscom_api_url.clone(),
            Duration::from_secs(config.lookup_timeout_secs),
        )
    }

    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/player/{}", self.base_url, username.to_ascii_lowercase())
    }

    pub fn stats_url(&self, username: &str) -> String {
        format!("{}/stats", self.profile_url(username))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Fetching {}", url);
        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| anyhow!("Request timeout after {}s", self.timeout.as_secs()))?
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("API returned status: {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
    }
}

impl PlayerLookup for ChessComClient {
    async fn player(&self, username: &str) -> Result<PlayerCard> {
        if !valid_username(username) {
            return Err(anyhow!("Invalid Chess.com username"));
        }
        let profile: PlayerProfile = self.fetch(&self.profile_url(username)).await?;
        let stats: PlayerStats = self.fetch(&self.stats_url(username)).await?;
        Ok(PlayerCard { profile, stats })
    }
}
