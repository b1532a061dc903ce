//! Log setup. The watch loop owns the terminal, so it writes to
//! `<logs dir>/next-step-<timestamp>.log`; every other command logs to stderr.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Flushes the file writer on drop
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in watch mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Name of a log file created at the current time
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("next-step-{}.log", timestamp)
}

/// Whether logs go to a file rather than stderr
pub fn logs_to_file(config: &Config, is_watch_mode: bool) -> bool {
    is_watch_mode && config.logging.to_file
}

/// Install the global subscriber; `--debug` wins over the configured level,
/// and `RUST_LOG` wins over both.
pub fn init_logging(
    config: &Config,
    is_watch_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let level = if debug_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if logs_to_file(config, is_watch_mode) {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)?;

        let file_name = log_file_name();
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(&logs_dir, &file_name));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(logs_dir.join(file_name)),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
