//! Configuration system for the assistant
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/asistente/config.{ASISTENTE_ENV}.json
//! 3. Default values
//!
//! Where ASISTENTE_ENV can be: production (default), development, test
//!
//! # Examples
//!
//! ```no_run
//! use asistente::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! println!("Backend: {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! Environment variables override config file values:
//! - ASISTENTE_API_URL
//! - ASISTENTE_TOKEN
//! - ASISTENTE_REPORTS_DIR
//! - ASISTENTE_DEBUG

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the restaurant backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token (or the name of an environment variable holding it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reportes")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the token from an environment variable if needed
    pub fn resolve_token(&self) -> Option<String> {
        self.auth_token.as_ref().and_then(|token| {
            if !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                std::env::var(token).ok()
            } else if token.is_empty() {
                None
            } else {
                Some(token.clone())
            }
        })
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Directory where exported reports are written
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            reports_dir: default_reports_dir(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a config file as written, without environment overrides
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/asistente/config.{ASISTENTE_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            } else {
                return Err(ConfigError::ValidationError(format!(
                    "Config file not found: {:?}",
                    path
                )));
            }
        }

        let env = std::env::var("ASISTENTE_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = Self::config_dir() {
            let config_path = config_dir.join(format!("config.{}.json", env));

            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::info!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ASISTENTE_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(token) = std::env::var("ASISTENTE_TOKEN") {
            self.api.auth_token = Some(token);
        }

        if let Ok(dir) = std::env::var("ASISTENTE_REPORTS_DIR") {
            self.reports_dir = PathBuf::from(dir);
        }

        if let Ok(debug) = std::env::var("ASISTENTE_DEBUG") {
            self.debug = debug.eq_ignore_ascii_case("true")
                || debug == "1"
                || debug.eq_ignore_ascii_case("yes");
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;

        if self.reports_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "reports_dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("asistente"))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
