//! # Configuration
//!
//! TOML configuration for the bot, read once at startup.
//!
//! - [`BotConfig`] - display name and command prefix
//! - [`StorageConfig`] - where the chess ledger lives
//! - [`LoggingConfig`] - log level and optional log file
//! - [`GamesConfig`] - which games are on, where board pictures come from and where
//!   Chess.com profiles are looked up
//!
//! ```rust,no_run
//! use zapgames::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Prefix: {}", config.bot.prefix);
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ```toml
//! [bot]
//! name = "ZapGames"
//! prefix = "."
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//!
//! [games]
//! checkers_enabled = true
//! chess_enabled = true
//! render_images = true
//! chesscom_api_url = "https://api.chess.com/pub"
//! lookup_timeout_secs = 10
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::checkers::render::DEFAULT_CHART_URL;
use crate::chess::lookup::DEFAULT_CHESSCOM_API;
use crate::chess::render::DEFAULT_DYNBOARD_URL;

/// Characters accepted as a command prefix.
pub const ALLOWED_PREFIXES: &[&str] = &[".", "!", "/", "#", "$", "^"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub games: GamesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    ".".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesConfig {
    #[serde(default = "default_true")]
    pub checkers_enabled: bool,
    #[serde(default = "default_true")]
    pub chess_enabled: bool,
    /// Attach board picture links to replies.
    #[serde(default = "default_true")]
    pub render_images: bool,
    #[serde(default = "default_checkers_render_url")]
    pub checkers_render_url: String,
    #[serde(default = "default_chess_render_url")]
    pub chess_render_url: String,
    /// Base of the public Chess.com API used by `xadrez player`.
    #[serde(default = "default_chesscom_api_url")]
    pub chesscom_api_url: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_checkers_render_url() -> String {
    DEFAULT_CHART_URL.to_string()
}

fn default_chess_render_url() -> String {
    DEFAULT_DYNBOARD_URL.to_string()
}

fn default_chesscom_api_url() -> String {
    DEFAULT_CHESSCOM_API.to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            checkers_enabled: true,
            chess_enabled: true,
            render_images: true,
            checkers_render_url: default_checkers_render_url(),
            chess_render_url: default_chess_render_url(),
            chesscom_api_url: default_chesscom_api_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file and validate it
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !ALLOWED_PREFIXES.contains(&self.bot.prefix.as_str()) {
            return Err(anyhow!(
                "Invalid command prefix '{}': expected one of {}",
                self.bot.prefix,
                ALLOWED_PREFIXES.join(" ")
            ));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(anyhow!("Invalid log level '{}'", self.logging.level));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot: BotConfig {
                name: "ZapGames".to_string(),
                prefix: default_prefix(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("zapgames.log".to_string()),
            },
            games: GamesConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn prefix_outside_allowed_set_is_rejected() {
        let mut config = Config::default();
        config.bot.prefix = "%".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid command prefix '%'"));
        config.bot.prefix = "!".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn games_section_is_optional() {
        let raw = r#"
            [bot]
            name = "Test"

            [storage]
            data_dir = "/tmp/z"

            [logging]
            level = "debug"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.bot.prefix, ".");
        assert!(config.games.chess_enabled);
        assert_eq!(config.games.chess_render_url, DEFAULT_DYNBOARD_URL);
        assert_eq!(config.logging.file, None);
        assert_eq!(config.games.chesscom_api_url, DEFAULT_CHESSCOM_API);
        assert_eq!(config.games.lookup_timeout_secs, 10);
    }

    #[test]
    fn retired_bot_keys_still_parse() {
        let raw = r#"
            [bot]
            name = "Test"
            owner = "5511999999999@s.whatsapp.net"

            [storage]
            data_dir = "/tmp/z"

            [logging]
            level = "info"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bot.name, "Test");
    }

    #[tokio::test]
    async fn default_file_round_trips_through_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();
        Config::create_default(path).await.unwrap();
        let loaded = Config::load(path).await.unwrap();
        assert_eq!(loaded.bot.name, "ZapGames");
        assert!(loaded.games.checkers_enabled);
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = Config::load("/nonexistent/zapgames.toml").await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/zapgames.toml"));
    }
}
