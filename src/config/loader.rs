//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::LoggenConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::generator::SERVICE_NAME_ENV;

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

/// Build the effective configuration.
///
/// Defaults (or the TOML file at `path`), then environment overrides, then
/// `overrides` (CLI flags), then validation.
pub fn load<F>(path: Option<&Path>, overrides: F) -> Result<LoggenConfig, ConfigError>
where
    F: FnOnce(&mut LoggenConfig),
{
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => LoggenConfig::default(),
    };
    apply_env_overrides(&mut config);
    overrides(&mut config);
    validate(config)
}

/// Parse TOML without overrides or semantic checks.
pub fn parse_config(content: &str) -> Result<LoggenConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

pub fn validate(config: LoggenConfig) -> Result<LoggenConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut LoggenConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides from `lookup`.
///
/// `SERVICE_NAME` (non-empty) pins the service set and the file prefix.
pub fn apply_overrides_from<F>(config: &mut LoggenConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup(SERVICE_NAME_ENV) {
        let name = name.trim();
        if !name.is_empty() {
            config.generator.service_name = Some(name.to_string());
        }
    }
}
