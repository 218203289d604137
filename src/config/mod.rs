mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads `CONFIG_PATH` (or `config.yaml` when present), then applies
/// environment overrides and validates the result.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").ok();
    let mut config = load_file(config_path.as_deref()).await?;
    config.apply_env(|key| env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// An explicit path must exist. Without one, a missing default file yields
/// the built-in defaults.
pub async fn load_file(path: Option<&str>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path,
        None => {
            if !tokio::fs::try_exists(DEFAULT_CONFIG_PATH).await? {
                debug!("No configuration file found, using defaults");
                return Ok(Config::default());
            }
            DEFAULT_CONFIG_PATH
        }
    };

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| Error::config(format!("Cannot read {config_path}: {e}")))?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(config_str)?;
    Ok(config)
}
