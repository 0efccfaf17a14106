//! Logging initialization for the catalog binaries.
//!
//! Wraps the observability crate: structured JSONL to the log file plus
//! compact stderr output, with `RUST_LOG` taking precedence over the
//! configured level.

use std::path::PathBuf;

use crate::CoreResult;

/// Service name written into every JSON log line.
const SERVICE_NAME: &str = "emoji-catalog";

/// Initialize the logging system.
///
/// `log_file` of `None` keeps logs on stderr only.
///
/// # Example
///
/// ```ignore
/// init_logging("info", Some(paths.log_file()))?;
/// tracing::info!("catalog started");
/// ```
pub fn init_logging(level: &str, log_file: Option<PathBuf>) -> CoreResult<()> {
    observability::init_with_config(observability::LogConfig {
        service_name: SERVICE_NAME.into(),
        default_level: parse_level(level).to_string().to_lowercase(),
        log_path: log_file,
        also_stderr: true,
    })?;
    Ok(())
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
