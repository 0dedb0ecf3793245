//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, retention >= 1, size > 0)
//! - Reject service names that cannot be used in a file name
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggenConfig → Result<(), Vec<ValidationError>>
//! - Runs after environment overrides, before the config is used

use thiserror::Error;

use crate::config::schema::LoggenConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("generator.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("generator.services must not be empty")]
    NoServices,

    #[error("generator.services[{0}] is empty")]
    EmptyServiceName(usize),

    #[error("service name {0:?} cannot be used in a file name")]
    UnsafeServiceName(String),

    #[error("sink.directory must not be empty")]
    EmptyDirectory,

    #[error("sink.max_size must be greater than zero")]
    ZeroMaxSize,

    #[error("sink.max_files must be at least 1")]
    ZeroMaxFiles,
}

pub fn validate_config(config: &LoggenConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.generator.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    match &config.generator.service_name {
        Some(name) => {
            if name.trim().is_empty() || !is_file_safe(name) {
                errors.push(ValidationError::UnsafeServiceName(name.clone()));
            }
        }
        None => {
            if config.generator.services.is_empty() {
                errors.push(ValidationError::NoServices);
            }
            for (i, name) in config.generator.services.iter().enumerate() {
                if name.trim().is_empty() {
                    errors.push(ValidationError::EmptyServiceName(i));
                }
            }
        }
    }

    if config.sink.file_enabled {
        if config.sink.directory.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyDirectory);
        }
        if config.sink.max_size_bytes == 0 {
            errors.push(ValidationError::ZeroMaxSize);
        }
        if config.sink.max_files == 0 {
            errors.push(ValidationError::ZeroMaxFiles);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Only the pinned name ends up in file names; pool names are free-form.
fn is_file_safe(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(validate_config(&LoggenConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = LoggenConfig::default();
        config.generator.interval_ms = 0;
        config.generator.services = vec!["web".into(), " ".into()];
        config.sink.max_files = 0;
        config.sink.max_size_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroInterval,
                ValidationError::EmptyServiceName(1),
                ValidationError::ZeroMaxSize,
                ValidationError::ZeroMaxFiles,
            ]
        );
    }

    #[test]
    fn test_unsafe_pinned_name() {
        let mut config = LoggenConfig::default();
        config.generator.service_name = Some("../etc".into());
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::UnsafeServiceName("../etc".into())]
        );
    }

    #[test]
    fn test_file_limits_ignored_when_file_disabled() {
        let mut config = LoggenConfig::default();
        config.sink.file_enabled = false;
        config.sink.max_files = 0;
        assert_eq!(validate_config(&config), Ok(()));
    }
}
