//! Logging Infrastructure
//!
//! Structured logging to stdout, optionally to a daily rolling file.

use std::path::Path;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "freshmart-edge";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level`. When `log_dir` is set the
/// directory is created and logs go to `freshmart-edge.YYYY-MM-DD` there.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => Some(tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX)),
            Err(e) => {
                eprintln!("Failed to create log dir {dir}: {e}, logging to stdout");
                None
            }
        }
    });

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let result = match (file_appender, json.unwrap_or(false)) {
        (Some(appender), true) => builder.json().with_writer(appender).try_init(),
        (Some(appender), false) => builder.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };
    if let Err(e) = result {
        tracing::debug!("Logger already initialized: {e}");
    }
}
