//! Logging Infrastructure
//!
//! Structured logging via `tracing-subscriber`. `RUST_LOG` takes precedence
//! over the configured level; a log directory adds a daily rolling file.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Console logger at `info`
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Logger with optional JSON output and file sink
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir
        .map(Path::new)
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    let result = match (file_dir, json) {
        (Some(dir), true) => builder
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, "menu-server"))
            .try_init(),
        (Some(dir), false) => builder
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, "menu-server"))
            .try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
