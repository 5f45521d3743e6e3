//! # Site Configuration
//!
//! Which store to talk to, and how inquiries travel.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WANDERLUST_STORE_URL=https://abc.example.co                        │
//! │     WANDERLUST_USE_EDGE_FUNCTIONS=true                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/wanderlust-gateway/config.toml (Linux)                   │
//! │     or the path passed with --config                                   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     REST store at the local development endpoint, direct inquiries    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! backend = "rest"              # rest | sqlite | memory
//! url = "http://127.0.0.1:54321"
//! anon_key = "<public anon key>"
//! sqlite_path = "wanderlust.db"
//! timeout_secs = 30
//!
//! [inquiries]
//! transport = "direct"          # direct | edge
//! edge_function_url = "http://127.0.0.1:54321/functions/v1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Store endpoint used when nothing else is configured: the local
/// development stack.
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:54321";

/// Path of the edge functions below the store URL.
pub const EDGE_FUNCTIONS_PATH: &str = "/functions/v1";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid URL for {key}: {url}")]
    InvalidUrl { key: String, url: String },

    #[error("Failed to load config: {0}")]
    LoadFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

// =============================================================================
// Store Backend
// =============================================================================

/// Where destination and inquiry rows live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Remote hosted store over its REST interface.
    #[default]
    Rest,

    /// Local SQLite file.
    Sqlite,

    /// No store: the in-memory fallback with the sample catalogue.
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Rest => write!(f, "rest"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" | "remote" => Ok(StoreBackend::Rest),
            "sqlite" | "local" => Ok(StoreBackend::Sqlite),
            "memory" | "fallback" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::InvalidValue {
                key: "store.backend".to_string(),
                reason: format!("unknown backend '{}', expected rest, sqlite or memory", other),
            }),
        }
    }
}

// =============================================================================
// Inquiry Transport Mode
// =============================================================================

/// How inquiry operations reach the store. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryTransportMode {
    /// Straight to the `inquiries` table through the store client.
    #[default]
    Direct,

    /// Through the edge function HTTP endpoints.
    Edge,
}

impl std::fmt::Display for InquiryTransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InquiryTransportMode::Direct => write!(f, "direct"),
            InquiryTransportMode::Edge => write!(f, "edge"),
        }
    }
}

// =============================================================================
// Settings Sections
// =============================================================================

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base URL of the hosted store.
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Public (anon) API key sent with every REST call.
    #[serde(default)]
    pub anon_key: String,

    /// SQLite database file for the `sqlite` backend.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    /// Per-request timeout for HTTP calls (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_store_url() -> String {
    DEFAULT_STORE_URL.to_string()
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("wanderlust.db")
}

fn default_timeout() -> u64 {
    30
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            backend: StoreBackend::default(),
            url: default_store_url(),
            anon_key: String::new(),
            sqlite_path: default_sqlite_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl StoreSettings {
    /// Returns the HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[inquiries]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InquirySettings {
    #[serde(default)]
    pub transport: InquiryTransportMode,

    /// Base URL of the edge functions. Derived from the store URL when unset.
    #[serde(default)]
    pub edge_function_url: Option<String>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete site data configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub inquiries: InquirySettings,
}

impl SiteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        info!(
            backend = %config.store.backend,
            inquiry_transport = %config.inquiries.transport,
            "Site configuration loaded"
        );
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Rest {
            check_http_url("store.url", &self.store.url)?;
        }

        if self.store.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "store.timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.inquiries.transport == InquiryTransportMode::Edge {
            if self.store.backend == StoreBackend::Memory {
                return Err(ConfigError::InvalidValue {
                    key: "inquiries.transport".to_string(),
                    reason: "edge transport needs a store; the memory backend has none".to_string(),
                });
            }
            check_http_url("inquiries.edge_function_url", &self.edge_function_url())?;
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("WANDERLUST_STORE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding store backend from environment");
                    self.store.backend = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring store backend from environment"),
            }
        }

        if let Some(url) = lookup("WANDERLUST_STORE_URL") {
            debug!(url = %url, "Overriding store URL from environment");
            self.store.url = url;
        }

        if let Some(key) = lookup("WANDERLUST_STORE_ANON_KEY") {
            self.store.anon_key = key;
        }

        if let Some(path) = lookup("WANDERLUST_SQLITE_PATH") {
            self.store.sqlite_path = PathBuf::from(path);
        }

        if let Some(flag) = lookup("WANDERLUST_USE_EDGE_FUNCTIONS") {
            self.inquiries.transport = if flag.eq_ignore_ascii_case("true") {
                InquiryTransportMode::Edge
            } else {
                InquiryTransportMode::Direct
            };
        }

        if let Some(url) = lookup("WANDERLUST_EDGE_FUNCTION_URL") {
            debug!(url = %url, "Overriding edge function URL from environment");
            self.inquiries.edge_function_url = Some(url);
        }
    }

    /// Returns the edge function base URL, derived from the store URL when
    /// not set explicitly.
    pub fn edge_function_url(&self) -> String {
        match &self.inquiries.edge_function_url {
            Some(url) => url.clone(),
            None => format!(
                "{}{}",
                self.store.url.trim_end_matches('/'),
                EDGE_FUNCTIONS_PATH
            ),
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "wanderlust", "gateway")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn check_http_url(key: &str, raw: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key: key.to_string(),
        url: raw.to_string(),
    };

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}
