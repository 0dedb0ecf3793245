//! Record sinks.
//!
//! # Data Flow
//! ```text
//! LogRecord
//!     → RecordSink::submit
//!         → to_json_line → RotatingFile (size/hour rotation, retention)
//!         → to_console_line → ConsoleWriter (stdout)
//! ```
//!
//! # Design Decisions
//! - The sink is an explicit value handed to the generator, never a global
//! - A failing file write does not suppress the console mirror
//! - Files are opened lazily so a missing directory surfaces on first write

pub mod console;
pub mod memory;
pub mod rotation;

pub use console::ConsoleWriter;
pub use memory::MemorySink;
pub use rotation::{RotatingFile, RotationConfig};

use std::io::{self, Stdout, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::record::LogRecord;

/// Errors raised while recording a log record.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing, opening or rotating a log file failed.
    #[error("log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the console mirror failed.
    #[error("console write failed: {0}")]
    Console(#[source] io::Error),

    /// The record could not be serialized.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Destination for generated records.
pub trait LogSink: Send {
    /// Append one record.
    fn submit(&mut self, record: &LogRecord) -> Result<(), SinkError>;

    /// Flush buffered output, if any.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Production sink: JSON lines to a rotating file set, simple lines to the console.
pub struct RecordSink<W: Write = Stdout, C: Clock = SystemClock> {
    file: Option<RotatingFile<C>>,
    console: Option<ConsoleWriter<W>>,
}

impl<W: Write, C: Clock> RecordSink<W, C> {
    pub fn new(file: Option<RotatingFile<C>>, console: Option<ConsoleWriter<W>>) -> Self {
        Self { file, console }
    }

    pub fn console(&self) -> Option<&ConsoleWriter<W>> {
        self.console.as_ref()
    }
}

impl<W: Write + Send, C: Clock> LogSink for RecordSink<W, C> {
    fn submit(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        let file_result = match self.file.as_mut() {
            Some(file) => record
                .to_json_line()
                .map_err(SinkError::from)
                .and_then(|line| file.write_line(&line)),
            None => Ok(()),
        };

        let console_result = match self.console.as_mut() {
            Some(console) => console.write_record(record),
            None => Ok(()),
        };

        file_result.and(console_result)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        if let Some(console) = self.console.as_mut() {
            console.flush()?;
        }
        Ok(())
    }
}
