//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! generator, sink, lifecycle
//!     → logging.rs (structured diagnostic events)
//!     → stderr (pretty or JSON)
//! ```
//!
//! Generated records never pass through here; they go through `sink`.

pub mod logging;

pub use logging::init_tracing;
