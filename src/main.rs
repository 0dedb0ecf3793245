//! Synthetic log generator.
//!
//! Emits one random record per interval to a rotating JSON-lines file set
//! and to stdout, until SIGTERM or SIGINT.
//!
//! ```text
//!   ┌──────────────┐   tick    ┌───────────────┐   JSON line   ┌───────────────────────────┐
//!   │ tokio        │──────────▶│ LogGenerator  │──────────────▶│ logs/<svc>-<YYYY-MM-DD-HH>│
//!   │ interval     │           │ service/level │               │ (size + hour rotation)    │
//!   └──────────────┘           │ phrase/clock  │   simple line └───────────────────────────┘
//!          ▲                   └───────────────┘──────────────▶ stdout
//!          │ stop
//!   ┌──────────────┐
//!   │ SIGTERM/INT  │
//!   └──────────────┘
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use loggen::config::{loader, parse_size, LoggenConfig};
use loggen::lifecycle::{Shutdown, TerminationSignals};
use loggen::observability::init_tracing;
use loggen::sink::{ConsoleWriter, RecordSink, RotatingFile};
use loggen::LogGenerator;

/// How long a signal-triggered stop waits for the current tick.
const STOP_GRACE: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(name = "loggen")]
#[command(about = "Emit synthetic structured log records to rotating files and stdout", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds between records
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Directory for rotated log files
    #[arg(short = 'd', long)]
    log_dir: Option<PathBuf>,

    /// Maximum size per file, e.g. 20m
    #[arg(long, value_parser = parse_size_arg)]
    max_size: Option<u64>,

    /// Number of files to keep
    #[arg(long)]
    max_files: Option<usize>,

    /// Do not mirror records to stdout
    #[arg(long)]
    no_console: bool,

    /// Do not write log files
    #[arg(long)]
    no_file: bool,
}

fn parse_size_arg(s: &str) -> Result<u64, String> {
    parse_size(s).map_err(|e| e.to_string())
}

impl Cli {
    fn apply(&self, config: &mut LoggenConfig) {
        if let Some(interval_ms) = self.interval_ms {
            config.generator.interval_ms = interval_ms;
        }
        if let Some(dir) = &self.log_dir {
            config.sink.directory = dir.clone();
        }
        if let Some(max_size) = self.max_size {
            config.sink.max_size_bytes = max_size;
        }
        if let Some(max_files) = self.max_files {
            config.sink.max_files = max_files;
        }
        if self.no_console {
            config.sink.console_enabled = false;
        }
        if self.no_file {
            config.sink.file_enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match loader::load(cli.config.as_deref(), |config| cli.apply(config)) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&Default::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.observability);

    tracing::info!(
        interval_ms = config.generator.interval_ms,
        services = ?config.generator.service_set().names(),
        directory = %config.sink.directory.display(),
        max_size_bytes = config.sink.max_size_bytes,
        max_files = config.sink.max_files,
        "loggen v0.1.0 starting"
    );

    let file = config
        .sink
        .file_enabled
        .then(|| RotatingFile::open(config.rotation_config(), loggen::clock::SystemClock));
    let console = config
        .sink
        .console_enabled
        .then(|| ConsoleWriter::new(io::stdout()));
    let sink = RecordSink::new(file, console);

    let mut signals = match TerminationSignals::install() {
        Ok(signals) => signals,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install signal handlers");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let mut generator = LogGenerator::new(config.generator.service_set(), sink, shutdown.clone());
    let interval = config.generator.interval();
    // Arm before spawning so a stop that lands before the first poll sticks.
    generator.arm();
    let mut run = tokio::spawn(async move { generator.run(interval).await });

    tokio::select! {
        signal = signals.recv() => {
            shutdown.trigger();
            let code = match signal {
                Ok(signal) => {
                    tracing::info!(%signal, "Received signal. Shutting down gracefully...");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "Signal handling failed, shutting down");
                    ExitCode::FAILURE
                }
            };
            // Best effort: no drain guarantee.
            let _ = tokio::time::timeout(STOP_GRACE, &mut run).await;
            code
        }
        result = &mut run => {
            match result {
                Ok(Ok(stats)) => {
                    tracing::info!(emitted = stats.emitted, failed = stats.failed, "Generator finished");
                    ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Error running simulation");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    tracing::error!(error = %e, "Generator task aborted");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
