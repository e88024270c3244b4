//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::FunderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `funding.max_eth_to_send`.
pub const MAX_ETH_ENV_VAR: &str = "FUNDER_MAX_ETH";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FunderConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    load_config_str(&content)
}

/// Load configuration from a file if it exists, otherwise start from defaults.
///
/// Environment overrides and validation apply in both cases.
pub fn load_or_default(path: &Path) -> Result<FunderConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }
    tracing::info!(path = ?path, "Config file not found, using defaults");
    finish(FunderConfig::default())
}

/// Parse, apply environment overrides and validate configuration text.
pub fn load_config_str(content: &str) -> Result<FunderConfig, ConfigError> {
    let config: FunderConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    finish(config)
}

fn finish(config: FunderConfig) -> Result<FunderConfig, ConfigError> {
    let config = apply_overrides(config, std::env::var(MAX_ETH_ENV_VAR).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply an optional spend ceiling override on top of file values.
pub fn apply_overrides(mut config: FunderConfig, max_eth: Option<String>) -> FunderConfig {
    if let Some(max_eth) = max_eth.filter(|v| !v.trim().is_empty()) {
        tracing::debug!(max_eth_to_send = %max_eth, "Spend ceiling overridden from environment");
        config.funding.max_eth_to_send = max_eth.trim().to_string();
    }
    config
}
