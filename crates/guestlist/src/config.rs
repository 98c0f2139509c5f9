//! Configuration management for guestlist.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Utc;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::FilterMode;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "guestlist";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "guests.db";

/// Default key the guest list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "eventGuests";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GUESTLIST_`)
/// 2. TOML config file at `~/.config/guestlist/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/guestlist/guests.db`
    pub database_path: Option<PathBuf>,
    /// Key the serialized guest list is stored under.
    pub key: String,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Filter applied by `list` when none is given.
    pub default_filter: FilterMode,
    /// strftime format for the date a guest was added.
    pub date_format: String,
    /// Ask before removing a guest or clearing the list.
    pub confirm_destructive: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_filter: FilterMode::All,
            date_format: "%B %-d, %Y".to_string(),
            confirm_destructive: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `GUESTLIST_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GUESTLIST_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage key must not be empty".to_string(),
            });
        }

        if !is_usable_date_format(&self.display.date_format) {
            return Err(Error::ConfigValidation {
                message: format!("invalid date format: {:?}", self.display.date_format),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

/// A pattern is usable if it is non-empty and formats a real timestamp.
///
/// Parse-only specifiers such as `%#z` are accepted by the strftime parser
/// but fail when formatting, so a sample date is written out.
fn is_usable_date_format(pattern: &str) -> bool {
    let mut sample = String::new();
    !pattern.is_empty() && write!(sample, "{}", Utc::now().format(pattern)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.key, "eventGuests");
        assert!(config.storage.database_path.is_none());
        assert_eq!(config.display.default_filter, FilterMode::All);
        assert!(config.display.confirm_destructive);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage key"));
    }

    #[test]
    fn test_validate_bad_date_format() {
        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid date format"));

        config.display.date_format = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_parse_only_date_format() {
        let mut config = Config::default();
        config.display.date_format = "%#z".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid date format"));
    }

    #[test]
    fn test_validate_accepts_common_date_formats() {
        let mut config = Config::default();
        for pattern in ["%Y-%m-%d", "%d/%m/%Y %H:%M", "%a %b %e"] {
            config.display.date_format = pattern.to_string();
            assert!(config.validate().is_ok(), "{pattern} should be accepted");
        }
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("guests.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/guests.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/guests.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("guestlist"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("guestlist"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "guestlist_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"
[storage]
key = "weddingGuests"

[display]
default_filter = "rsvp-no"
confirm_destructive = false
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.storage.key, "weddingGuests");
        assert_eq!(config.display.default_filter, FilterMode::RsvpNo);
        assert!(!config.display.confirm_destructive);
        assert_eq!(config.display.date_format, "%B %-d, %Y");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"key": "party"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.key, "party");
        assert!(storage.database_path.is_none());
    }

    #[test]
    fn test_display_config_serialize() {
        let json = serde_json::to_string(&DisplayConfig::default()).unwrap();
        assert!(json.contains(r#""default_filter":"all""#));
        assert!(json.contains("confirm_destructive"));
    }
}
