use anyhow::{Context, Result};
use flexi_logger::default_format;
use flexi_logger::detailed_format;
use flexi_logger::Logger;
use flexi_logger::LoggerHandle;

/// Starts logging to stderr. `RUST_LOG` takes precedence over `level`.
///
/// stdout carries the status line, so nothing else may be written there.
pub fn initialize(level: &str) -> Result<LoggerHandle> {
    let format = if cfg!(debug_assertions) {
        detailed_format
    } else {
        default_format
    };
    Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log specification {:?}", level))?
        .format(format)
        .start()
        .context("failed to start logger")
}
