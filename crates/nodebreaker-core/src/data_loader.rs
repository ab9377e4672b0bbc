//! Data-driven configuration loading from JSON.
//!
//! Feature-gated behind `data-loader`. Provides JSON deserialization into
//! [`GameConfig`] for embedders that keep game tuning in data files. All
//! fields are optional in the data file; omitted ones take their defaults,
//! and the result is validated before it is handed out.

use crate::config::{ConfigError, GameConfig};

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Load and validate a [`GameConfig`] from a JSON string.
pub fn load_config_json(json: &str) -> Result<GameConfig, ConfigLoadError> {
    let config: GameConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a [`GameConfig`] from JSON bytes.
pub fn load_config_json_bytes(bytes: &[u8]) -> Result<GameConfig, ConfigLoadError> {
    let config: GameConfig = serde_json::from_slice(bytes)?;
    config.validate()?;
    Ok(config)
}
