//! Log initialization.
//!
//! The terminal is owned by the display while the editor runs, so log events are
//! written only to a file, `vitrine.log`, rolled daily under `$HOME/.vitrine/logs`.
//!
//! Filtering follows the `VITRINE_LOG` environment variable using the directive
//! syntax of [`EnvFilter`], e.g. `VITRINE_LOG=vitrine::editor=debug`, and defaults
//! to `info`.

use crate::error::{Error, Result};
use crate::sys::{self, AsString};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "VITRINE_LOG";
const LOG_FILE: &str = "vitrine.log";
const DEFAULT_FILTER: &str = "info";

/// Returns the directory in which log files are written.
pub fn log_dir() -> PathBuf {
    sys::home_dir().join(".vitrine").join("logs")
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`Err`] if the log directory could not be created.
pub fn init() -> Result<()> {
    let dir = log_dir();
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir.as_string(), e))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(&dir, LOG_FILE))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    // Initialization may fail only if a subscriber was already installed, which is
    // harmless.
    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(())
}
