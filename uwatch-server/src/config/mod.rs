//! Configuration loading for uwatch-server.
//!
//! Handles loading configuration from the TOML file and CLI arguments.

pub mod file;

pub use file::{ChannelConfig, FileConfig, PollerConfig, ProviderConfig};

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.poller.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "poller.interval_secs must be non-zero".to_string(),
        ));
    }
    if config.channels.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one notification channel must be configured".to_string(),
        ));
    }
    for channel in &config.channels {
        if channel.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "channel name must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
