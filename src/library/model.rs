use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a queued track, unique for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u64);

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

impl TrackId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file offered for ingestion: its name plus where its bytes live.
///
/// Only `name` is inspected by the queue; the path is handed through
/// untouched to the audio backend and the art extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
}

impl SourceFile {
    /// Build from a path, using its final component as the name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// Shared handle to a file's content. Cloning never copies the file.
pub type FileHandle = Arc<SourceFile>;

/// Embedded picture bytes pulled out of a track's tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl CoverArt {
    /// File extension matching the MIME type, for writing the image out.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "jpg",
        }
    }
}

/// Cover art resource. Released when the last handle is dropped.
pub type ArtRef = Arc<CoverArt>;

/// A queued track.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    /// File name without its extension.
    pub name: String,
    /// Upper-cased extension, e.g. `MP3`.
    pub kind: String,
    pub file: FileHandle,
    /// Set once enrichment finds embedded art.
    pub art: Option<ArtRef>,
}
