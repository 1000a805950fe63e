//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::matchday::default_kickoff;
use crate::presenter::CycleConfig;
use crate::roster::MemoryStoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub presenter: PresenterConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub event: EventConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Attendee display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PresenterConfig {
    /// Attendees visible at once
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// How long each window stays up (ms)
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_ms: u64,
}

fn default_window_size() -> usize {
    CycleConfig::DEFAULT_WINDOW_SIZE
}

fn default_cycle_interval() -> u64 {
    CycleConfig::DEFAULT_INTERVAL_MS
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            cycle_interval_ms: default_cycle_interval(),
        }
    }
}

impl PresenterConfig {
    pub fn cycle_config(&self) -> Result<CycleConfig, ConfigError> {
        CycleConfig::new(self.window_size, self.cycle_interval_ms).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "presenter.window_size ({}) must be 1..={} and presenter.cycle_interval_ms ({}) positive",
                self.window_size,
                CycleConfig::MAX_WINDOW_SIZE,
                self.cycle_interval_ms
            ))
        })
    }
}

/// Roster store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Capacity of the snapshot broadcast channel
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_broadcast_capacity() -> usize {
    64
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl StoreConfig {
    pub fn memory_store_config(&self) -> MemoryStoreConfig {
        MemoryStoreConfig {
            broadcast_capacity: self.broadcast_capacity,
        }
    }
}

/// Event details: kickoff and country catalogs
#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Kickoff instant (RFC 3339)
    #[serde(default = "default_kickoff_string")]
    pub kickoff: String,

    /// Qualified teams JSON (bundled list when unset)
    pub qualified_countries: Option<PathBuf>,

    /// All countries JSON (bundled list when unset)
    pub all_countries: Option<PathBuf>,
}

fn default_kickoff_string() -> String {
    default_kickoff().to_rfc3339()
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            kickoff: default_kickoff_string(),
            qualified_countries: None,
            all_countries: None,
        }
    }
}

impl EventConfig {
    pub fn kickoff_time(&self) -> Result<DateTime<Utc>, ConfigError> {
        DateTime::parse_from_rfc3339(&self.kickoff)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ConfigError::Invalid(format!("event.kickoff {:?}: {}", self.kickoff, e)))
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8026
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file locations, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("fanzone").join("config.toml")),
            Some(PathBuf::from("/etc/fanzone/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    ///
    /// Returns the config and the file it came from, if any.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_from_candidates(&Self::default_paths())
    }

    /// Load the first candidate that exists, with environment overrides
    ///
    /// A file that exists but cannot be read or parsed is an error, not a
    /// reason to try the next one. With no file at all, defaults plus
    /// environment overrides are used.
    pub fn load_from_candidates(
        candidates: &[PathBuf],
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Ok((Self::load_with_env(path)?, Some(path.clone()))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.presenter.cycle_config()?;
        self.event.kickoff_time()?;
        if self.store.broadcast_capacity == 0 {
            return Err(ConfigError::Invalid(
                "store.broadcast_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Presenter overrides
        if let Some(size) = var("FANZONE_WINDOW_SIZE").and_then(|s| s.parse().ok()) {
            self.presenter.window_size = size;
        }
        if let Some(ms) = var("FANZONE_CYCLE_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            self.presenter.cycle_interval_ms = ms;
        }

        // Event overrides
        if let Some(kickoff) = var("FANZONE_KICKOFF") {
            self.event.kickoff = kickoff;
        }

        // API overrides
        if let Some(host) = var("FANZONE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("FANZONE_API_PORT").and_then(|s| s.parse().ok()) {
            self.api.port = port;
        }

        // Logging overrides
        if let Some(level) = var("FANZONE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("FANZONE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# FanZone Configuration
#
# Environment variables override these settings:
# - FANZONE_WINDOW_SIZE
# - FANZONE_CYCLE_INTERVAL_MS
# - FANZONE_KICKOFF
# - FANZONE_API_HOST
# - FANZONE_API_PORT
# - FANZONE_LOG_LEVEL
# - FANZONE_LOG_FORMAT

[presenter]
# Attendees shown at once in the RSVP display
window_size = 3

# How long each set of attendees stays visible (ms)
cycle_interval_ms = 5000

[store]
# Snapshot channel capacity; slow subscribers skip stale snapshots
broadcast_capacity = 64

[event]
# Opening match kickoff (RFC 3339)
kickoff = "2026-06-11T00:00:00+00:00"

# Country lists as {"code": "Name"} JSON objects (bundled lists when unset)
# qualified_countries = "./qualified-countries.json"
# all_countries = "./all-countries.json"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8026

# Allowed CORS origins (empty = any)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
