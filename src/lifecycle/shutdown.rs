//! Shutdown coordination for the generator.

use std::sync::Arc;

use tokio::sync::watch;

/// Coordinator for stopping long-running tasks.
///
/// Latched: once triggered it stays triggered until [`reset`](Self::reset),
/// so a waiter that subscribes late still observes the stop. Clones share
/// the same state.
#[derive(Debug, Clone)]
pub struct Shutdown {
    /// Watch channel sender; `true` once stopped.
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the shutdown signal. Safe to call any number of times.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Clear a previous trigger so the coordinator can be used for another run.
    pub fn reset(&self) {
        self.tx.send_replace(false);
    }

    /// Whether [`trigger`](Self::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the shutdown signal has been triggered.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only ends by trigger.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
