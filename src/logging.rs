//! Log file setup.
//!
//! The terminal belongs to the UI, so logs only go to a file. Call
//! [`init`] once at startup and keep the returned guard alive until exit.

use std::fs;
use std::path::Path;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Flushes buffered log lines when dropped.
#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// `RUST_LOG` wins over the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(val) => EnvFilter::new(val),
        Err(_) => EnvFilter::new(default_level),
    }
}

/// Install a non-ANSI file layer writing to `log_path`.
pub fn init(log_path: &Path, default_level: &str) -> Result<LogGuard> {
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::error::NavError::Terminal(format!("logger: {}", e)))?;

    tracing::info!(path = %log_path.display(), "logging initialised");
    Ok(LogGuard(guard))
}
