//! Log setup.
//!
//! The TUI owns the terminal, so the subscriber writes to a file instead of
//! stderr. `RUST_LOG` takes precedence over the configured level.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Path used when `logging.file` is not configured.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("sonicflow.log")
}

/// Install the global subscriber. Returns the log file path when logging is active.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings.file.clone().unwrap_or_else(default_log_path);

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("sonicflow: logging disabled, cannot open {path:?}: {e}");
            return None;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
