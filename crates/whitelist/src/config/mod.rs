//! Configuration module for the whitelist service

mod identity;
mod logging;
mod store;

pub use identity::IdentityConfig;
pub use logging::LoggingConfig;
pub use store::{StoreConfig, Visibility};

use common::config::{ConfigLoader, LoadOptions};
use common::ConfigurationError as ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Identity lookup service
    pub identity: IdentityConfig,

    /// Remote document store
    pub store: StoreConfig,

    /// Logging
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment, then validate it
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => <Config as ConfigLoader<Config>>::load_from_file(path)?,
            None => <Config as ConfigLoader<Config>>::load(None)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Generate example configuration file
    pub fn generate_example() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError {
            details: format!("Failed to serialize config: {e}"),
        })
    }

    /// Check required values and ranges once at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.api_key.trim().is_empty() {
            return Err(ConfigError::missing("store.api_key"));
        }
        if self.store.document_id.trim().is_empty() {
            return Err(ConfigError::missing("store.document_id"));
        }

        validate_url("identity.endpoint", &self.identity.endpoint)?;
        validate_url("store.base_url", &self.store.base_url)?;

        if self.identity.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "identity.timeout_secs",
                "0",
                "must be at least one second",
            ));
        }
        if self.store.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "store.timeout_secs",
                "0",
                "must be at least one second",
            ));
        }

        Ok(())
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::invalid_value(key, value, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::invalid_value(
            key,
            value,
            format!("unsupported scheme {scheme}"),
        )),
    }
}

impl ConfigLoader<Config> for Config {
    fn load(path: Option<PathBuf>) -> Result<Config, ConfigError> {
        common::config::load_config_with_options(LoadOptions {
            config_path: path,
            ..LoadOptions::default()
        })
    }

    fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
        common::config::load_from_file(path)
    }

    fn apply_env_overrides(config: &mut Config, prefix: &str) -> Result<(), ConfigError> {
        common::config::apply_env_overrides(config, prefix)
    }
}
