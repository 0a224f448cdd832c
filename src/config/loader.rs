//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read and parse a TOML configuration file. Missing sections take their defaults.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the effective configuration at startup.
///
/// Defaults, then the optional TOML file, then environment overrides. Validation
/// runs last so env values are checked too.
pub fn resolve_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    resolve_config_with(path, |key| std::env::var(key).ok())
}

/// [`resolve_config`] with an explicit variable source in place of the process environment.
pub fn resolve_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    config.apply_overrides_from(lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
