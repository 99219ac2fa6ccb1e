//! # App Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CASHDESK_DB_PATH=/var/lib/cashdesk/cashdesk.db                     │
//! │     CASHDESK_USER=alice                                                │
//! │     CASHDESK_LOCALE=pt_BR                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cashdesk/cashdesk.toml (Linux)                           │
//! │     or the path given with --config                                    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [cashier]
//! user = "alice"
//! locale = "pt_BR"
//!
//! [database]
//! path = "/var/lib/cashdesk/cashdesk.db"
//! max_connections = 5
//! ```

use cashdesk_core::display::parse_locale;
use cashdesk_core::LocalizedFormatter;
use cashdesk_db::DbConfig;
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Who operates the register and how dates are shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashierSettings {
    /// The authenticated user recorded as opener/closer.
    #[serde(default = "default_user")]
    pub user: String,

    /// Locale for session display texts.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_user() -> String {
    "operator".to_string()
}

fn default_locale() -> String {
    "pt_BR".to_string()
}

impl Default for CashierSettings {
    fn default() -> Self {
        CashierSettings {
            user: default_user(),
            locale: default_locale(),
        }
    }
}

/// Where sessions are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Defaults to `cashdesk.db` in the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cashier: CashierSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cashdesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cashier.user.trim().is_empty() {
            return Err(ConfigError::Invalid("cashier.user must not be empty".into()));
        }

        if parse_locale(&self.cashier.locale).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Unknown locale: '{}'. Valid options: pt_BR, pt_PT, en_US, es_ES",
                self.cashier.locale
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `CASHDESK_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CASHDESK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(user) = lookup("CASHDESK_USER") {
            debug!(user = %user, "Overriding user from environment");
            self.cashier.user = user;
        }

        if let Some(locale) = lookup("CASHDESK_LOCALE") {
            self.cashier.locale = locale;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cashdesk", "cashdesk")
            .map(|dirs| dirs.config_dir().join("cashdesk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolves the database file, creating nothing.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        directories::ProjectDirs::from("com", "cashdesk", "cashdesk")
            .map(|dirs| dirs.data_dir().join("cashdesk.db"))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Builds the pool configuration.
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.database.max_connections))
    }

    pub fn locale(&self) -> Locale {
        parse_locale(&self.cashier.locale).unwrap_or(Locale::pt_BR)
    }

    /// Display formatter for the configured locale at the machine's offset.
    pub fn formatter(&self) -> LocalizedFormatter {
        LocalizedFormatter::with_local_offset(self.locale())
    }

    pub fn user(&self) -> &str {
        self.cashier.user.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cashier.locale, "pt_BR");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [cashier]
            user = "alice"
            "#,
        )
        .unwrap();

        assert_eq!(config.user(), "alice");
        assert_eq!(config.cashier.locale, "pt_BR");
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CASHDESK_DB_PATH", "/tmp/cash.db"),
            ("CASHDESK_USER", "bob"),
            ("CASHDESK_LOCALE", "en_US"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.user(), "bob");
        assert_eq!(config.locale(), Locale::en_US);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/cash.db"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.cashier.user = "  ".to_string();
        assert!(config.validate().is_err());

        config.cashier.user = "alice".to_string();
        config.cashier.locale = "klingon".to_string();
        assert!(config.validate().is_err());

        config.cashier.locale = "es_ES".to_string();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = std::env::temp_dir().join(format!("cashdesk-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cashdesk.toml");
        std::fs::write(&path, "[database]\nmax_connections = 2\n").unwrap();

        let config = AppConfig::load(Some(path.clone())).unwrap();
        assert_eq!(config.database.max_connections, 2);

        std::fs::write(&path, "[database]\nmax_connections = \"two\"\n").unwrap();
        assert!(matches!(AppConfig::load(Some(path)), Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
