//! Logging configuration using tracing
//!
//! Logging is file-only: in headless mode stdout carries the NDJSON event
//! stream, so nothing else may write there. Level is controlled by the
//! `WELKIN_LOG` environment variable, e.g. `WELKIN_LOG=debug`.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs roll daily under `welkin/logs/` in the user data directory.
pub fn init() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("welkin")
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "welkin.log");

    // Default to info, allow override via WELKIN_LOG
    let env_filter = EnvFilter::try_from_env("WELKIN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("welkin=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("welkin starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}
