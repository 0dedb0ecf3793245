//! Synthetic log generator library.

pub mod clock;
pub mod config;
pub mod generator;
pub mod lifecycle;
pub mod observability;
pub mod record;
pub mod sink;

pub use config::schema::LoggenConfig;
pub use generator::LogGenerator;
pub use lifecycle::Shutdown;
pub use record::{Level, LogRecord};
pub use sink::{LogSink, RecordSink};
