#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Application configuration.
//!
//! [`AppConfig::load`] runs once at start-up: it reads an optional TOML
//! file, applies environment overrides, and fills everything else with
//! defaults. The resulting value is passed to every component; nothing
//! reads the environment afterwards.
//!
//! ```toml
//! [database]
//! path = "data/dengue_watch.db"
//!
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [weather]
//! latitude = 14.5995
//! longitude = 120.9842
//!
//! [ai]
//! model = "gemini-1.5-flash"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "DENGUE_WATCH_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "dengue_watch.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },
}

/// `SQLite` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/dengue_watch.db"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding the compiled dashboard.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

/// Weather provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Open-Meteo base URL.
    pub base_url: String,
    /// Forecast latitude.
    pub latitude: f64,
    /// Forecast longitude.
    pub longitude: f64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com".to_string(),
            latitude: 14.5995,
            longitude: 120.9842,
            timeout_secs: 10,
        }
    }
}

/// Generative-AI provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key. The chatbot reports an authentication failure without one.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Transactional email settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// API key. Alert emails are disabled without one.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Sender address.
    pub sender: Option<String>,
    /// Sender display name.
    pub sender_name: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.brevo.com/v3".to_string(),
            sender: None,
            sender_name: "Dengue Watch".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `SQLite` settings.
    pub database: DatabaseConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Weather provider settings.
    pub weather: WeatherConfig,
    /// Generative-AI provider settings.
    pub ai: AiConfig,
    /// Transactional email settings.
    pub email: EmailConfig,
}

fn parse_env<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        })
}

impl AppConfig {
    /// Loads configuration from the process environment and the optional
    /// config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file exists but is invalid, or
    /// an environment override cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = lookup(CONFIG_PATH_ENV).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Parses a config file, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::info!("Loading config from {}", path.display());
                Self::from_toml(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses configuration from TOML text. Missing sections and keys keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is invalid.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("DATABASE_PATH") {
            self.database.path = PathBuf::from(v);
        }

        if let Some(v) = lookup("BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_env("PORT", v)?;
        }
        if let Some(v) = lookup("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }

        if let Some(v) = lookup("WEATHER_BASE_URL") {
            self.weather.base_url = v;
        }
        if let Some(v) = lookup("WEATHER_LATITUDE") {
            self.weather.latitude = parse_env("WEATHER_LATITUDE", v)?;
        }
        if let Some(v) = lookup("WEATHER_LONGITUDE") {
            self.weather.longitude = parse_env("WEATHER_LONGITUDE", v)?;
        }
        if let Some(v) = lookup("WEATHER_TIMEOUT_SECS") {
            self.weather.timeout_secs = parse_env("WEATHER_TIMEOUT_SECS", v)?;
        }

        if let Some(v) = lookup("AI_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.ai.api_key = Some(v).filter(|k| !k.trim().is_empty());
        }
        if let Some(v) = lookup("AI_MODEL") {
            self.ai.model = v;
        }
        if let Some(v) = lookup("AI_BASE_URL") {
            self.ai.base_url = v;
        }
        if let Some(v) = lookup("AI_TIMEOUT_SECS") {
            self.ai.timeout_secs = parse_env("AI_TIMEOUT_SECS", v)?;
        }

        if let Some(v) = lookup("EMAIL_API_KEY") {
            self.email.api_key = Some(v).filter(|k| !k.trim().is_empty());
        }
        if let Some(v) = lookup("EMAIL_BASE_URL") {
            self.email.base_url = v;
        }
        if let Some(v) = lookup("EMAIL_SENDER") {
            self.email.sender = Some(v);
        }
        if let Some(v) = lookup("EMAIL_SENDER_NAME") {
            self.email.sender_name = v;
        }
        if let Some(v) = lookup("EMAIL_TIMEOUT_SECS") {
            self.email.timeout_secs = parse_env("EMAIL_TIMEOUT_SECS", v)?;
        }

        Ok(())
    }
}
