//! Configuration loading, validation, and management for fitcheck.
//!
//! Loads configuration from `~/.fitcheck/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.fitcheck/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Telegram connection settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// AI suggester settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Weather lookup settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Daily outfit job settings
    #[serde(default)]
    pub daily: DailyConfig,

    /// The category registry. Items may only use these categories.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_categories() -> Vec<String> {
    [
        "underwear",
        "socks",
        "calzado",
        "pantalones",
        "tops",
        "capas",
        "gorras",
        "smartwatch_bands",
        "extras",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram", &self.telegram)
            .field("ai", &self.ai)
            .field("weather", &self.weather)
            .field("storage", &self.storage)
            .field("daily", &self.daily)
            .field("categories", &self.categories)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Chat id the daily outfit is delivered to. 0 = unconfigured.
    #[serde(default)]
    pub owner_chat_id: i64,

    /// Allowed sender IDs. Empty = deny all, ["*"] = allow all.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("owner_chat_id", &self.owner_chat_id)
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            owner_chat_id: 0,
            allowed_users: vec![],
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gemini-2.5-flash-lite".into()
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Whether to include a weather string in outfit requests
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend: "file" or "sqlite"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Path to the JSON document (file) or database file (sqlite).
    /// Defaults to `wardrobe.json` / `wardrobe.db` under the config dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_storage_backend() -> String {
    "file".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyConfig {
    /// Local hour the daily outfit fires
    #[serde(default = "default_daily_hour")]
    pub hour: u32,

    /// Local minute the daily outfit fires
    #[serde(default)]
    pub minute: u32,

    /// Fixed UTC offset in hours for "local" (e.g. -6 for CST Mexico)
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
}

fn default_daily_hour() -> u32 {
    7
}

fn default_utc_offset() -> i32 {
    -6
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            hour: default_daily_hour(),
            minute: 0,
            utc_offset_hours: default_utc_offset(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.fitcheck/config.toml).
    ///
    /// Environment variables take priority over file values:
    /// - `FITCHECK_TELEGRAM_TOKEN` / `TELEGRAM_TOKEN`
    /// - `FITCHECK_GEMINI_API_KEY` / `GEMINI_API_KEY`
    /// - `FITCHECK_OWNER_CHAT_ID`
    /// - `FITCHECK_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment-variable overrides on top of file values.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(token) = std::env::var("FITCHECK_TELEGRAM_TOKEN")
            .ok()
            .or_else(|| std::env::var("TELEGRAM_TOKEN").ok())
        {
            self.telegram.bot_token = Some(token);
        }

        if let Some(key) = std::env::var("FITCHECK_GEMINI_API_KEY")
            .ok()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        {
            self.ai.api_key = Some(key);
        }

        if let Ok(chat_id) = std::env::var("FITCHECK_OWNER_CHAT_ID") {
            self.telegram.owner_chat_id =
                chat_id.parse().map_err(|_| ConfigError::ValidationError(
                    "FITCHECK_OWNER_CHAT_ID must be an integer".into(),
                ))?;
        }

        if let Ok(model) = std::env::var("FITCHECK_MODEL") {
            self.ai.model = model;
        }

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".fitcheck")
    }

    /// Resolved path of the persisted wardrobe for the configured backend.
    pub fn storage_path(&self) -> PathBuf {
        match &self.storage.path {
            Some(p) => PathBuf::from(p),
            None => {
                let file = match self.storage.backend.as_str() {
                    "sqlite" => "wardrobe.db",
                    _ => "wardrobe.json",
                };
                Self::config_dir().join(file)
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one category must be registered".into(),
            ));
        }

        if !matches!(self.storage.backend.as_str(), "file" | "sqlite") {
            return Err(ConfigError::ValidationError(format!(
                "storage.backend must be 'file' or 'sqlite', got '{}'",
                self.storage.backend
            )));
        }

        if self.daily.hour > 23 || self.daily.minute > 59 {
            return Err(ConfigError::ValidationError(
                "daily.hour must be 0-23 and daily.minute 0-59".into(),
            ));
        }

        if self.daily.utc_offset_hours < -12 || self.daily.utc_offset_hours > 14 {
            return Err(ConfigError::ValidationError(
                "daily.utc_offset_hours must be between -12 and 14".into(),
            ));
        }

        Ok(())
    }

    /// Check whether a category is registered.
    pub fn is_registered_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            ai: AiConfig::default(),
            weather: WeatherConfig::default(),
            storage: StorageConfig::default(),
            daily: DailyConfig::default(),
            categories: default_categories(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
