//! Periodic record generation.
//!
//! # Data Flow
//! ```text
//! tokio interval tick
//!     → generate_record (service, level, phrase, clock)
//!     → LogSink::submit
//! Shutdown::trigger
//!     → select! picks the stop branch between ticks → start() returns
//! ```
//!
//! # Design Decisions
//! - One record per tick, first tick immediately
//! - Ticks never overlap; a slow tick delays the next instead of bursting
//! - Sink failures are logged and do not stop the loop

pub mod phrase;
pub mod services;

pub use phrase::catch_phrase;
pub use services::{ServiceSet, DEFAULT_SERVICES, SERVICE_NAME_ENV};

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};

use crate::clock::{Clock, SystemClock};
use crate::lifecycle::Shutdown;
use crate::record::{Level, LogRecord};
use crate::sink::LogSink;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Errors that prevent the generator from starting.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator interval must be greater than zero")]
    ZeroInterval,
}

/// Outcome of one `start` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records accepted by the sink.
    pub emitted: u64,
    /// Records the sink rejected.
    pub failed: u64,
}

/// Emits one synthetic record per tick into a sink until stopped.
pub struct LogGenerator<S: LogSink> {
    services: ServiceSet,
    sink: S,
    shutdown: Shutdown,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl<S: LogSink> LogGenerator<S> {
    pub fn new(services: ServiceSet, sink: S, shutdown: Shutdown) -> Self {
        Self {
            services,
            sink,
            shutdown,
            clock: Arc::new(SystemClock),
            rng: StdRng::from_entropy(),
        }
    }

    /// Use `clock` for record timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a fixed RNG, for reproducible output.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn services(&self) -> &ServiceSet {
        &self.services
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle that stops this generator from another task.
    pub fn stop_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Stop the generator. Idempotent.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    /// Synthesize one record.
    pub fn generate_record(&mut self) -> LogRecord {
        let service = self.services.choose(&mut self.rng).to_string();
        let level = Level::choose(&mut self.rng);
        let message = catch_phrase(&mut self.rng);
        LogRecord::new(service, level, message, self.clock.now())
    }

    /// Emit one record now. Returns whether the sink accepted it.
    pub fn tick(&mut self) -> bool {
        let record = self.generate_record();
        match self.sink.submit(&record) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, service = %record.service, "Failed to write record");
                false
            }
        }
    }

    /// Clear an earlier stop so the next run ticks again.
    pub fn arm(&self) {
        self.shutdown.reset();
    }

    /// Emit a record every `interval` until stopped.
    ///
    /// Re-arms first, so a generator stopped earlier runs again. The first
    /// record is emitted immediately. Returns once [`stop`](Self::stop) (or
    /// the shared [`Shutdown`]) fires.
    pub async fn start(&mut self, interval: Duration) -> Result<RunStats, GeneratorError> {
        if interval.is_zero() {
            return Err(GeneratorError::ZeroInterval);
        }
        self.arm();
        self.run(interval).await
    }

    /// Like [`start`](Self::start) but without re-arming: a stop issued after
    /// [`arm`](Self::arm) and before this call makes it return at once.
    pub async fn run(&mut self, interval: Duration) -> Result<RunStats, GeneratorError> {
        if interval.is_zero() {
            return Err(GeneratorError::ZeroInterval);
        }

        let mut stats = RunStats::default();
        if self.shutdown.is_triggered() {
            return Ok(stats);
        }

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            services = self.services.names().len(),
            "Generator starting"
        );

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    tracing::info!(emitted = stats.emitted, failed = stats.failed, "Generator stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if self.tick() {
                        stats.emitted += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
            }
        }

        if let Err(e) = self.sink.flush() {
            tracing::warn!(error = %e, "Failed to flush sink");
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::{MemorySink, SinkError};
    use chrono::{TimeZone, Utc};

    struct FailingSink;

    impl LogSink for FailingSink {
        fn submit(&mut self, _record: &LogRecord) -> Result<(), SinkError> {
            Err(SinkError::Console(std::io::Error::other("closed")))
        }
    }

    fn generator(services: ServiceSet) -> (LogGenerator<MemorySink>, MemorySink) {
        let sink = MemorySink::new();
        let generator = LogGenerator::new(services, sink.clone(), Shutdown::new())
            .with_rng(StdRng::seed_from_u64(42));
        (generator, sink)
    }

    #[test]
    fn test_generated_record_fields() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let (generator, _) = generator(ServiceSet::default());
        let mut generator = generator.with_clock(clock.clone());

        for _ in 0..200 {
            let record = generator.generate_record();
            assert!(Level::ALL.contains(&record.level));
            assert!(generator.services().contains(&record.service));
            assert!(!record.message.is_empty());
            assert_eq!(record.timestamp, clock.now());
        }
    }

    #[test]
    fn test_pinned_service() {
        let (mut generator, _) = generator(ServiceSet::single("checkout-service"));
        for _ in 0..50 {
            assert_eq!(generator.generate_record().service, "checkout-service");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected() {
        let (mut generator, sink) = generator(ServiceSet::default());
        let err = generator.start(Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, GeneratorError::ZeroInterval));
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_arm_skips_run() {
        let (mut generator, sink) = generator(ServiceSet::default());
        generator.arm();
        generator.stop();
        generator.stop();

        let stats = generator.run(DEFAULT_INTERVAL).await.unwrap();
        assert_eq!(stats, RunStats::default());
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let (mut generator, sink) = generator(ServiceSet::default());
        let handle = generator.stop_handle();
        let stopper = tokio::spawn(async move {
            time::sleep(Duration::from_millis(1_500)).await;
            handle.trigger();
            time::sleep(Duration::from_millis(1_700)).await;
            handle.trigger();
        });

        // Ticks at 0 and 1000, stopped at 1500.
        let first = generator.start(DEFAULT_INTERVAL).await.unwrap();
        assert_eq!(first.emitted, 2);

        // Ticks at 1500 and 2500, stopped at 3200.
        let second = generator.start(DEFAULT_INTERVAL).await.unwrap();
        assert_eq!(second.emitted, 2);
        assert_eq!(sink.len(), 4);

        stopper.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_clears_earlier_stop() {
        let (mut generator, sink) = generator(ServiceSet::default());
        generator.stop();
        let handle = generator.stop_handle();
        let stopper = tokio::spawn(async move {
            time::sleep(Duration::from_millis(500)).await;
            handle.trigger();
        });

        let stats = generator.start(DEFAULT_INTERVAL).await.unwrap();
        assert_eq!(stats.emitted, 1);
        assert_eq!(sink.len(), 1);
        stopper.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failures_counted_not_fatal() {
        let shutdown = Shutdown::new();
        let mut generator = LogGenerator::new(ServiceSet::default(), FailingSink, shutdown.clone());

        let task = tokio::spawn(async move { generator.start(DEFAULT_INTERVAL).await });
        time::sleep(Duration::from_millis(2500)).await;
        shutdown.trigger();

        let stats = task.await.unwrap().unwrap();
        assert_eq!(stats.emitted, 0);
        assert_eq!(stats.failed, 3);
    }
}
