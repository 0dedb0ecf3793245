//! In-memory sink.

use std::sync::{Arc, Mutex};

use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};

/// Collects records in memory. Clones share the same buffer, so a test can
/// hand one clone to the generator and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("memory sink mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("memory sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn submit(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .expect("memory sink mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}
