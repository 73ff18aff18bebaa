//! Match settings loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cozy_chess::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Seating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanColor {
    #[default]
    White,
    Black,
}

impl HumanColor {
    pub fn color(self) -> Color {
        match self {
            HumanColor::White => Color::White,
            HumanColor::Black => Color::Black,
        }
    }
}

/// How to launch the UCI engine process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub path: PathBuf,
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            args: Vec::new(),
        }
    }
}

/// Match settings. Missing keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Clock allotment per side, in seconds.
    pub initial_seconds: u32,
    /// `go movetime` budget.
    pub search_movetime_ms: u64,
    /// Slack beyond the movetime before a search is abandoned.
    pub search_grace_ms: u64,
    pub error_flash_ms: u64,
    pub human_color: HumanColor,
    pub engine: EngineConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            initial_seconds: 600,
            search_movetime_ms: 1000,
            search_grace_ms: 5000,
            error_flash_ms: 500,
            human_color: HumanColor::White,
            engine: EngineConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn seating(&self) -> Seating {
        Seating::new(self.human_color.color())
    }

    pub fn movetime(&self) -> Duration {
        Duration::from_millis(self.search_movetime_ms)
    }

    pub fn search_grace(&self) -> Duration {
        Duration::from_millis(self.search_grace_ms)
    }

    pub fn error_flash(&self) -> Duration {
        Duration::from_millis(self.error_flash_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
