//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `barrelhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use barrelhub_app::store::{ParseOrderingError, ResponseOrdering};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Store behaviour.
    pub store: StoreConfig,
    /// Real-time feed settings.
    pub feed: FeedConfig,
    /// Demo session toggles.
    pub demo: DemoConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Store configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `latest-request` or `last-response`.
    pub response_ordering: ResponseOrdering,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Messages buffered per feed receiver before it lags.
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Start the virtual server with the demo dataset instead of empty.
    pub seed: bool,
}

impl Config {
    /// Load configuration from `barrelhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if an
    /// override or the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("barrelhub.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
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

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("BARRELHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("BARRELHUB_RESPONSE_ORDERING") {
            self.store.response_ordering = val.parse()?;
        }
        if let Some(val) = var("BARRELHUB_FEED_CAPACITY") {
            self.feed.capacity = val.parse().map_err(|_| {
                ConfigError::Validation(format!("feed capacity '{val}' is not a number"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.capacity == 0 {
            return Err(ConfigError::Validation(
                "feed capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "barrelhubd=info,barrelhub_app=info,barrelhub_adapter_virtual=info".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { seed: true }
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
    /// Unknown response ordering override.
    #[error("invalid response ordering")]
    Ordering(#[from] ParseOrderingError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.store.response_ordering, ResponseOrdering::LatestRequest);
        assert_eq!(config.feed.capacity, 256);
        assert!(config.demo.seed);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.feed.capacity, 256);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [logging]
            filter = 'debug'

            [store]
            response_ordering = 'last-response'

            [feed]
            capacity = 8

            [demo]
            seed = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.store.response_ordering, ResponseOrdering::LastResponse);
        assert_eq!(config.feed.capacity, 8);
        assert!(!config.demo.seed);
    }

    #[test]
    fn should_reject_unknown_ordering_in_toml() {
        let result: Result<Config, _> = toml::from_str("[store]\nresponse_ordering = 'fastest'");
        assert!(result.is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.feed.capacity, 256);
    }

    #[test]
    fn should_prefer_rust_log_over_barrelhub_log() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[("BARRELHUB_LOG", "warn"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_override_ordering_and_capacity_from_env() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("BARRELHUB_RESPONSE_ORDERING", "last-response"),
                ("BARRELHUB_FEED_CAPACITY", "32"),
            ]))
            .unwrap();
        assert_eq!(config.store.response_ordering, ResponseOrdering::LastResponse);
        assert_eq!(config.feed.capacity, 32);
    }

    #[test]
    fn should_reject_malformed_env_override() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(env(&[("BARRELHUB_FEED_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn should_reject_unknown_ordering_override() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(env(&[("BARRELHUB_RESPONSE_ORDERING", "fastest")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Ordering(ParseOrderingError(ref name)) if name == "fastest"
        ));
    }

    #[test]
    fn should_reject_zero_capacity() {
        let mut config = Config::default();
        config.feed.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
