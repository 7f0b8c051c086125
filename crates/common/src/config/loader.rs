//! # Configuration Loader
//!
//! Figment-based configuration loading with layered support:
//! 1. Compiled defaults
//! 2. TOML configuration file
//! 3. Environment variable overrides
//!
//! Nested fields map to environment variables with a double underscore,
//! e.g. `WHITELIST_STORE__API_KEY` sets `store.api_key`.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "whitelist.toml";

/// Default environment variable prefix, without the trailing underscore
pub const DEFAULT_ENV_PREFIX: &str = "WHITELIST";

/// Configuration loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Optional path to configuration file
    pub config_path: Option<PathBuf>,
    /// Environment variable prefix
    pub env_prefix: String,
    /// Whether configuration file is required
    pub require_file: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            require_file: false,
        }
    }
}

impl LoadOptions {
    /// Options for loading from a file that must exist
    pub fn required_file(path: &Path) -> Self {
        Self {
            config_path: Some(path.to_path_buf()),
            require_file: true,
            ..Self::default()
        }
    }
}

/// Load configuration from a specific file with environment overrides
pub fn load_from_file<T>(path: &Path) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    load_config_with_options::<T>(LoadOptions::required_file(path))
}

/// Load configuration with custom options
pub fn load_config_with_options<T>(options: LoadOptions) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    debug!("Loading configuration with options: {:?}", options);

    let mut figment = Figment::new().merge(Serialized::defaults(T::default()));

    let config_path = determine_config_path(options.config_path, &options.env_prefix)?;

    if let Some(path) = &config_path {
        if path.exists() {
            info!("Loading configuration from file: {}", path.display());
            figment = add_file_provider(figment, path)?;
        } else if options.require_file {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        } else {
            warn!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            );
        }
    }

    figment = merge_env(figment, &options.env_prefix);

    figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: format!("Failed to parse configuration: {err}"),
        })
}

/// Re-apply environment overrides on top of an already loaded value
pub fn apply_env_overrides<T>(config: &mut T, prefix: &str) -> Result<(), ConfigurationError>
where
    T: DeserializeOwned + serde::Serialize,
{
    let figment = merge_env(Figment::from(Serialized::defaults(&*config)), prefix);

    *config = figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: err.to_string(),
        })?;

    Ok(())
}

fn merge_env(figment: Figment, prefix: &str) -> Figment {
    let prefix = if prefix.ends_with('_') {
        prefix.to_string()
    } else {
        format!("{prefix}_")
    };

    figment.merge(
        Env::prefixed(&prefix)
            .split("__")
            .ignore(&["PATH", "HOME", "USER"]),
    )
}

/// Resolve which configuration file to read, if any
///
/// Order: explicit override, `<PREFIX>_CONFIG_PATH`, the current directory,
/// then the system-wide location.
fn determine_config_path(
    override_path: Option<PathBuf>,
    env_prefix: &str,
) -> Result<Option<PathBuf>, ConfigurationError> {
    if let Some(path) = override_path {
        return Ok(Some(path));
    }

    let path_var = format!("{}_CONFIG_PATH", env_prefix.trim_end_matches('_'));
    if let Ok(env_path) = std::env::var(&path_var) {
        let path = PathBuf::from(env_path);
        debug!("Using config path from {}: {}", path_var, path.display());
        return Ok(Some(path));
    }

    let current_dir_config = std::env::current_dir()
        .map_err(|e| ConfigurationError::EnvironmentError {
            var: "current_dir".to_string(),
            details: e.to_string(),
        })?
        .join(DEFAULT_CONFIG_FILE);

    if current_dir_config.exists() {
        debug!(
            "Found config file in current directory: {}",
            current_dir_config.display()
        );
        return Ok(Some(current_dir_config));
    }

    let system_config = PathBuf::from("/etc/whitelist").join(DEFAULT_CONFIG_FILE);
    if system_config.exists() {
        debug!("Found config file at: {}", system_config.display());
        return Ok(Some(system_config));
    }

    debug!("No configuration file found, using defaults");
    Ok(None)
}

fn add_file_provider(figment: Figment, path: &Path) -> Result<Figment, ConfigurationError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("toml");

    match extension.to_lowercase().as_str() {
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigurationError::ParseError {
            details: format!(
                "Unsupported configuration file format: {extension} (supported: toml)"
            ),
        }),
    }
}
