//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/ordo/config.toml` by default. Command-line flags override the
//! file, and the file overrides the built-in defaults.
//!
//! ```toml
//! [feed]
//! name = "General Roman Calendar"
//! domain = "catholic.calendar"
//! timezone = "UTC"
//! method = "PUBLISH"          # "" or "none" omits the property
//!
//! [source]
//! locale = "en"
//! calendar = "general"
//! include_optional = true
//! script = "/usr/local/share/ordo/bridge.mjs"
//! node = "node"
//! timeout_secs = 60
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ordo_core::GENERAL_CALENDAR;
use ordo_feed::config::{
    DEFAULT_DOMAIN, DEFAULT_METHOD, DEFAULT_NAME, DEFAULT_PUBLISHED_TTL,
    DEFAULT_REFRESH_INTERVAL, DEFAULT_TIMEZONE,
};
use ordo_sources::DEFAULT_PROGRAM;

use crate::error::{CliError, CliResult};

/// File name of the bridge script inside the data directory.
pub const BRIDGE_SCRIPT_NAME: &str = "bridge.mjs";

/// Configuration for the ordo CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdoConfig {
    /// Debug mode.
    pub debug: bool,

    /// Feed metadata.
    pub feed: FeedSettings,

    /// Calendar source settings.
    pub source: SourceSettings,
}

/// Feed metadata settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Calendar name shown to subscribers.
    pub name: String,

    /// Domain used for event UIDs.
    pub domain: String,

    /// Time zone exposed via `X-WR-TIMEZONE`.
    pub timezone: String,

    /// Explicit `PRODID`.
    pub prodid: Option<String>,

    /// `METHOD`; empty or `none` omits it.
    pub method: String,

    /// `REFRESH-INTERVAL`; empty or `none` omits it.
    pub refresh_interval: String,

    /// `X-PUBLISHED-TTL`; empty or `none` omits it.
    pub published_ttl: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            prodid: None,
            method: DEFAULT_METHOD.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL.to_string(),
            published_ttl: DEFAULT_PUBLISHED_TTL.to_string(),
        }
    }
}

/// Calendar source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Locale understood by the calendar library.
    pub locale: String,

    /// Calendar to generate.
    pub calendar: String,

    /// Whether optional memorials are included.
    pub include_optional: bool,

    /// Path to the bridge script.
    pub script: Option<PathBuf>,

    /// Program that runs the bridge script.
    pub node: String,

    /// Per-call bridge timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            calendar: GENERAL_CALENDAR.to_string(),
            include_optional: true,
            script: None,
            node: DEFAULT_PROGRAM.to_string(),
            timeout_secs: None,
        }
    }
}

impl SourceSettings {
    /// Returns the configured script, or the one in the data directory.
    pub fn script_path(&self) -> PathBuf {
        self.script
            .clone()
            .unwrap_or_else(|| OrdoConfig::default_data_dir().join(BRIDGE_SCRIPT_NAME))
    }
}

impl OrdoConfig {
    /// Loads configuration from `path`, or from the default path.
    ///
    /// An explicit path must exist; a missing default file yields the
    /// defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ordo")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ordo")
    }
}

/// Returns `None` for a disabled optional property (`""` or `none`).
pub fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
