//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Init diagnostics → Build sink → Start generator
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Shutdown::trigger → generator loop exits between ticks
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown, exit 0
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error exits with status 1, including failure to
//!   install signal handlers
//! - Shutdown does not drain; at most one in-flight tick completes

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{TerminationSignal, TerminationSignals};
