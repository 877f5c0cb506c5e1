//! Log file setup
//!
//! The TUI owns the terminal, so events only go to a file. Without a
//! configured file no subscriber is installed and events are discarded.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a file subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(file: Option<&Path>, level: &str) -> Result<()> {
    let Some(path) = file else {
        return Ok(());
    };
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
