//! Human-readable console mirror.

use std::io::Write;

use crate::record::LogRecord;
use crate::sink::SinkError;

/// Writes one simple line per record to any writer (stdout in production).
#[derive(Debug)]
pub struct ConsoleWriter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_record(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        writeln!(self.out, "{}", record.to_console_line()).map_err(SinkError::Console)?;
        self.out.flush().map_err(SinkError::Console)
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush().map_err(SinkError::Console)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
