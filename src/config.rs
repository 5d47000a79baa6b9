//! Configuration management for session-bridge.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ServerConfig;
use crate::cli::Args;
use crate::session::{
    validate_name, CookieParams, SessionOptions, DEFAULT_MAX_LIFETIME_SECS, DEFAULT_SESSION_NAME,
};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Session configuration.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Session name, also the cookie name.
    pub name: String,
    /// Whether sessions are enabled.
    pub enabled: bool,
    /// Seconds a stored record stays valid after its last commit.
    pub max_lifetime_secs: u64,
    /// Seconds between background garbage-collection passes.
    pub gc_interval_secs: u64,
    /// Cookie parameters.
    pub cookie: CookieParams,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_NAME.to_string(),
            enabled: true,
            max_lifetime_secs: DEFAULT_MAX_LIFETIME_SECS,
            gc_interval_secs: 60,
            cookie: CookieParams::default(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SESSION_BRIDGE_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("SESSION_BRIDGE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(name) = std::env::var("SESSION_BRIDGE_SESSION_NAME") {
            if !name.is_empty() {
                self.session.name = name;
            }
        }

        if let Ok(secs) = std::env::var("SESSION_BRIDGE_MAX_LIFETIME_SECS") {
            if let Ok(secs) = secs.parse() {
                self.session.max_lifetime_secs = secs;
            }
        }

        if let Ok(level) = std::env::var("SESSION_BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref name) = args.session_name {
            self.session.name = name.clone();
        }
        if let Some(secs) = args.max_lifetime_secs {
            self.session.max_lifetime_secs = secs;
        }
        if let Some(secs) = args.gc_interval_secs {
            self.session.gc_interval_secs = secs;
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Config::default();

        // Load from config file if specified
        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        // Apply environment variable overrides
        config.apply_env();

        // Apply CLI argument overrides (highest priority)
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        Ok(ServerConfig::new(host.to_string(), self.server.port))
    }

    /// Convert to SessionOptions for the facade.
    pub fn to_session_options(&self) -> Result<SessionOptions, ConfigError> {
        validate_name(&self.session.name)
            .map_err(|_| ConfigError::InvalidSessionName(self.session.name.clone()))?;

        Ok(SessionOptions {
            name: self.session.name.clone(),
            cookie: self.session.cookie.clone(),
            max_lifetime_secs: self.session.max_lifetime_secs,
            enabled: self.session.enabled,
        })
    }

    /// Interval between background garbage-collection passes.
    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs(self.session.gc_interval_secs.max(1))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// Invalid session name.
    InvalidSessionName(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidSessionName(name) => write!(f, "invalid session name: {}", name),
        }
    }
}

impl std::error::Error for ConfigError {}
