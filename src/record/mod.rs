//! Generated log records.
//!
//! # Data Flow
//! ```text
//! generator tick
//!     → Level::choose + ServiceSet::choose + catch_phrase + Clock::now
//!     → LogRecord
//!     → to_json_line() (file) / to_console_line() (stdout)
//! ```
//!
//! # Design Decisions
//! - Records are plain values; nothing mutates them after creation
//! - Timestamps are always UTC with millisecond precision

pub mod level;

pub use level::Level;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One synthetic log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub service: String,
    #[serde(with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(
        service: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            service: service.into(),
            timestamp,
        }
    }

    /// Machine-parsable encoding written to log files (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Human-readable encoding mirrored to the console.
    ///
    /// `info: Synergized didactic throughput {"service":"web-service","timestamp":"..."}`
    pub fn to_console_line(&self) -> String {
        let meta = serde_json::json!({
            "service": self.service,
            "timestamp": self.timestamp_string(),
        });
        format!("{}: {} {}", self.level, self.message, meta)
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
