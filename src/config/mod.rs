//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (SERVICE_NAME)
//!     → CLI flag overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → LoggenConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    parse_size, GeneratorConfig, LogFormat, LoggenConfig, ObservabilityConfig, SinkConfig,
};
pub use validation::{validate_config, ValidationError};
