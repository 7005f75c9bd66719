//! Configuration file parser for ~/.config/cinema/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are accepted but logged, since they are
//! usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys may be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel catalog: an http(s) URL or a local file path.
    pub catalog: String,

    /// Base theme, "dark" or "light". A stored `darkMode` preference wins.
    pub theme: String,

    /// Accent swatch name (red, blue, green, purple, orange). A stored
    /// `themeColor` preference wins.
    pub accent: String,

    /// External player command line. `{url}` is replaced by the stream
    /// reference (appended when absent), `{volume}` by the volume 0-100.
    /// When unset the system opener is used.
    pub player_command: Option<String>,

    /// Seconds without input before the header and status bar hide. 0 = never.
    pub idle_hide_secs: u64,

    /// Keybinding overrides: action name -> key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: "channels.json".to_string(),
            theme: "dark".to_string(),
            accent: "red".to_string(),
            player_command: None,
            idle_hide_secs: 3,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "catalog",
        "theme",
        "accent",
        "player_command",
        "idle_hide_secs",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing, empty or whitespace-only file -> defaults
    /// - Invalid TOML or wrong value types -> `ConfigError::Parse`
    /// - Files over 1 MB -> `ConfigError::TooLarge`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse TOML text. Blank input yields defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(catalog = %config.catalog, theme = %config.theme, "Loaded configuration");
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
