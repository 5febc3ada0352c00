//! Configuration management
//!
//! This module handles loading and parsing configuration for the storefront
//! backend. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Login throttling configuration
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/storefront.db".to_string()
}

/// Login throttling configuration.
///
/// `window_ms` governs both how long a burst of failed logins is considered
/// contiguous and how old an attempt record must be before the periodic
/// sweep reclaims it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Sliding window in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Failed attempts tolerated before logins are rejected outright
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fold attempt keys to lowercase before tracking them.
    ///
    /// Off by default: `A@x.com` and `a@x.com` throttle independently.
    #[serde(default)]
    pub case_insensitive_keys: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_attempts: default_max_attempts(),
            case_insensitive_keys: false,
        }
    }
}

impl ThrottleConfig {
    /// The sliding window as a `Duration`
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

fn default_window_ms() -> u64 {
    15_000
}

fn default_max_attempts() -> u32 {
    5
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file.
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern:
    /// - STOREFRONT_SERVER_HOST
    /// - STOREFRONT_SERVER_PORT
    /// - STOREFRONT_SERVER_CORS_ORIGIN
    /// - STOREFRONT_DATABASE_URL
    /// - STOREFRONT_THROTTLE_WINDOW_MS
    /// - STOREFRONT_THROTTLE_MAX_ATTEMPTS
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("STOREFRONT_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("STOREFRONT_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("STOREFRONT_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }
        if let Ok(url) = std::env::var("STOREFRONT_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(window_ms) = std::env::var("STOREFRONT_THROTTLE_WINDOW_MS") {
            if let Ok(window_ms) = window_ms.parse() {
                self.throttle.window_ms = window_ms;
            }
        }
        if let Ok(max_attempts) = std::env::var("STOREFRONT_THROTTLE_MAX_ATTEMPTS") {
            if let Ok(max_attempts) = max_attempts.parse() {
                self.throttle.max_attempts = max_attempts;
            }
        }
    }
}
