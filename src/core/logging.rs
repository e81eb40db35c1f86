//! Log setup for the terminal UI.
//!
//! The TUI owns stdout while in raw/alternate-screen mode, so everything
//! goes to a daily-rolling JSON file under the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::AppConfig;

pub const LOG_FILE_PREFIX: &str = "resume-assistant.log";

/// Directory the rolling log files are written to.
pub fn log_dir(config: &AppConfig) -> PathBuf {
    config.data_dir().join("logs")
}

/// Initialize file logging. Keep the returned guard alive for the whole
/// run; dropping it flushes and stops the background writer.
pub fn init(config: &AppConfig) -> WorkerGuard {
    let log_dir = log_dir(config);
    ensure_dir(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter);

    let subscriber = tracing_subscriber::registry().with(file_layer);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {e}");
    }

    // Route `log` macros into tracing
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {e}");
    }

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

fn ensure_dir(dir: &Path) {
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create logs directory: {e}");
        }
    }
}
