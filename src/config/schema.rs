//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every field has a default so an empty file is a valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::generator::{ServiceSet, DEFAULT_SERVICES};
use crate::sink::rotation::{DEFAULT_MAX_FILES, DEFAULT_MAX_SIZE_BYTES, DEFAULT_PREFIX};
use crate::sink::RotationConfig;

/// Root configuration for the generator process.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggenConfig {
    /// What to generate and how often.
    pub generator: GeneratorConfig,

    /// Where records go.
    pub sink: SinkConfig,

    /// The process's own diagnostic output.
    pub observability: ObservabilityConfig,
}

/// Generator settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Milliseconds between records.
    pub interval_ms: u64,

    /// Pool of service names to sample from.
    pub services: Vec<String>,

    /// Pins every record to this one service and names the files after it.
    pub service_name: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            services: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
            service_name: None,
        }
    }
}

impl GeneratorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn service_set(&self) -> ServiceSet {
        match &self.service_name {
            Some(name) => ServiceSet::single(name.clone()),
            None => ServiceSet::new(self.services.iter().cloned()),
        }
    }
}

/// Record sink settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SinkConfig {
    /// Write rotated JSON-lines files.
    pub file_enabled: bool,

    /// Mirror records to stdout.
    pub console_enabled: bool,

    /// Directory holding the rotated files.
    pub directory: PathBuf,

    /// Size bound per file. Accepts bytes or a string such as `"20m"`.
    #[serde(rename = "max_size", deserialize_with = "deserialize_size")]
    pub max_size_bytes: u64,

    /// Files kept, the active one included.
    pub max_files: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            file_enabled: true,
            console_enabled: true,
            directory: PathBuf::from("logs"),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for the process's own logs (not the generated records).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggenConfig {
    /// File name prefix: the pinned service, or `service`.
    pub fn file_prefix(&self) -> &str {
        self.generator
            .service_name
            .as_deref()
            .unwrap_or(DEFAULT_PREFIX)
    }

    pub fn rotation_config(&self) -> RotationConfig {
        RotationConfig::new(self.sink.directory.clone(), self.file_prefix())
            .with_max_size_bytes(self.sink.max_size_bytes)
            .with_max_files(self.sink.max_files)
    }
}

/// Error from [`parse_size`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid size {0:?}: expected bytes or a number with k, m or g suffix")]
pub struct InvalidSize(pub String);

/// Parse `1024`, `512k`, `20m`, `1g` (case-insensitive, powers of 1024).
pub fn parse_size(input: &str) -> Result<u64, InvalidSize> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    let lower = lower.strip_suffix('b').unwrap_or(&lower);

    let (digits, multiplier) = match lower.chars().last() {
        Some('k') => (&lower[..lower.len() - 1], 1024),
        Some('m') => (&lower[..lower.len() - 1], 1024 * 1024),
        Some('g') => (&lower[..lower.len() - 1], 1024 * 1024 * 1024),
        _ => (lower, 1),
    };

    digits
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| InvalidSize(input.to_string()))
}

fn deserialize_size<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Bytes(u64),
        Text(String),
    }

    match Size::deserialize(d)? {
        Size::Bytes(n) => Ok(n),
        Size::Text(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}
