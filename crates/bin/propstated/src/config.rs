//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `propstate.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// In-process event bus settings.
    pub event_bus: EventBusConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Events a subscriber may fall behind before it starts losing them.
    pub capacity: usize,
}

/// Per-integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Enable the virtual/demo integration.
    pub virtual_enabled: bool,
    /// Seconds between two virtual device ticks.
    pub virtual_interval_secs: u64,
}

impl Config {
    /// Load configuration from `propstate.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("propstate.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PROPSTATE_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("PROPSTATE_EVENT_BUS_CAPACITY")
            && let Ok(capacity) = val.parse()
        {
            self.event_bus.capacity = capacity;
        }
        if let Ok(val) = std::env::var("PROPSTATE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.event_bus.capacity == 0 {
            return Err(ConfigError::Validation(
                "event bus capacity must be non-zero".to_string(),
            ));
        }
        if self.integrations.virtual_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "virtual interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn virtual_interval(&self) -> Duration {
        Duration::from_secs(self.integrations.virtual_interval_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:propstate.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "propstated=info,propstate_app=info,propstate_adapter_virtual=info".to_string(),
        }
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: true,
            virtual_interval_secs: 5,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite:propstate.db?mode=rwc");
        assert_eq!(config.event_bus.capacity, 256);
        assert!(config.integrations.virtual_enabled);
        assert_eq!(config.virtual_interval(), Duration::from_secs(5));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.event_bus.capacity, 256);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [event_bus]
            capacity = 16

            [integrations]
            virtual_enabled = false
            virtual_interval_secs = 30
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database_url(), "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.event_bus.capacity, 16);
        assert!(!config.integrations.virtual_enabled);
        assert_eq!(config.virtual_interval(), Duration::from_secs(30));
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [integrations]
            virtual_interval_secs = 1
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.integrations.virtual_interval_secs, 1);
        assert!(config.integrations.virtual_enabled);
        assert_eq!(config.database.url, "sqlite:propstate.db?mode=rwc");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.event_bus.capacity, 256);
    }

    #[test]
    fn should_reject_zero_capacity() {
        let mut config = Config::default();
        config.event_bus.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_interval() {
        let mut config = Config::default();
        config.integrations.virtual_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
