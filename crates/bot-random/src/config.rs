//! Configuration file loading for the random bot.
//!
//! Settings come from an optional TOML file; command line flags override
//! them in `main`.

use chess_core::FenParser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Self-play settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Number of games to play. Defaults to 1.
    #[serde(default = "default_games")]
    pub games: u32,
    /// Plies after which an unfinished game is abandoned. Defaults to 300.
    #[serde(default = "default_max_plies")]
    pub max_plies: u32,
    /// Seed for the move picker. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Position description every game starts from.
    #[serde(default = "default_start_position")]
    pub start_position: String,
    /// Print summaries as JSON instead of one line per game.
    #[serde(default)]
    pub json: bool,
}

fn default_games() -> u32 {
    1
}

fn default_max_plies() -> u32 {
    300
}

fn default_start_position() -> String {
    FenParser::STARTPOS.to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            games: default_games(),
            max_plies: default_max_plies(),
            seed: None,
            start_position: default_start_position(),
            json: false,
        }
    }
}

impl BotConfig {
    /// Loads the configuration at `path`, or the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Default location of the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("bot-random.toml")
    }
}
