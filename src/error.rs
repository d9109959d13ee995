//! Error types shared across the player.

use std::path::PathBuf;

use thiserror::Error;

/// Player errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Nothing in an ingestion batch matched a supported extension.
    #[error("No supported audio files found in selection")]
    NoSupportedFiles,

    /// A playback command needed a loaded source but none is present.
    #[error("No track loaded")]
    NothingLoaded,

    /// Opening a track's file failed.
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decoder rejected a track's content.
    #[error("Failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// No usable audio output device.
    #[error("Audio output unavailable: {0}")]
    Output(String),

    /// Reading tags failed.
    #[error("Tag read failed: {0}")]
    Tags(#[from] lofty::error::LoftyError),

    /// Embedded picture exceeds the configured limit.
    #[error("Cover art too large ({0} bytes, max {1} bytes)")]
    ArtTooLarge(usize, usize),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration loaded but failed validation.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for player operations.
pub type Result<T> = std::result::Result<T, Error>;
