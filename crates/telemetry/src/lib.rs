use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where and how verbosely the tools log.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_dir: PathBuf,
    pub file_prefix: String,
    /// Used when `RUST_LOG` is unset.
    pub console_filter: String,
    pub file_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            file_prefix: "monotime.log".to_string(),
            console_filter: "info".to_string(),
            file_filter: "debug".to_string(),
        }
    }
}

fn file_writer(config: &TelemetryConfig) -> io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Initialize telemetry (logging).
///
/// - Console layer: compact, filtered by `RUST_LOG` or `console_filter`.
/// - File layer: JSON, daily rolling under `log_dir`, filtered by `file_filter`.
///
/// The returned `WorkerGuard` must be kept alive so buffered lines are flushed on exit.
pub fn init(config: &TelemetryConfig) -> io::Result<WorkerGuard> {
    let (non_blocking, guard) = file_writer(config)?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .compact()
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.console_filter)),
        );

    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new(&config.file_filter));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(guard)
}
