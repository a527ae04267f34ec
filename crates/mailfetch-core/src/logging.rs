//! Tracing subscriber setup for the `mailfetch` binary.
//!
//! Events go to `$XDG_STATE_HOME/mailfetch/mailfetch.log`. When that file
//! cannot be opened the binary calls `init_logging_stderr` instead.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,mailfetch=debug,mailfetch_core=debug";
const LOG_FILE: &str = "mailfetch.log";

/// `RUST_LOG` when set and valid, otherwise `DEFAULT_FILTER`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn log_file_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("mailfetch")?
        .place_state_file(LOG_FILE)
        .context("creating log directory")
}

/// Install a subscriber appending to the state-dir log file. Returns the file path.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "logging to file");
    Ok(path)
}

/// Install a subscriber writing to stderr. A subscriber that is already set wins.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
