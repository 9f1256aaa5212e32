//! Tracing subscriber setup.
//!
//! The TUI owns stdout/stderr, so it only logs when a file is given. One-shot
//! commands log to stderr.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where tracing output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

/// Install the global subscriber. `default_filter` applies when `RUST_LOG` is unset.
pub fn init(target: LogTarget<'_>, default_filter: &str) -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}"))),
        LogTarget::File(path) => {
            let file = File::create(path)
                .map_err(|e| {
                    AppError::new(2, format!("Failed to create log file '{}': {e}", path.display()))
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
        }
    }
}
