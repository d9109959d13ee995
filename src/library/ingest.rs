use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{SourceFile, Track, TrackId};

/// Case-insensitive `.ext` suffix match against the configured extensions.
pub(crate) fn is_supported(name: &str, extensions: &[String]) -> bool {
    let name = name.to_ascii_lowercase();
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .any(|e| name.ends_with(&format!(".{e}")))
}

/// `name` with its last extension stripped.
pub(crate) fn display_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => name,
    }
}

/// Upper-cased text after the last dot.
pub(crate) fn kind_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_ascii_uppercase()
}

/// Filter a batch down to supported files and turn them into tracks sorted by name.
pub fn tracks_from(files: Vec<SourceFile>, extensions: &[String]) -> Vec<Track> {
    let mut tracks: Vec<Track> = files
        .into_iter()
        .filter(|f| is_supported(&f.name, extensions))
        .map(|f| Track {
            id: TrackId::next(),
            name: display_name(&f.name).to_string(),
            kind: kind_of(&f.name),
            file: Arc::new(f),
            art: None,
        })
        .collect();

    tracks.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    tracks
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand user-supplied paths into candidate files.
///
/// Folders are walked according to `settings`; plain files pass through.
/// No extension filtering happens here so that an all-unsupported batch can
/// be reported by the registry.
pub fn collect_files(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<SourceFile> {
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            files.push(SourceFile::from_path(root.clone()));
            continue;
        }
        if !root.is_dir() {
            tracing::warn!(path = %root.display(), "skipping path that is neither file nor folder");
            continue;
        }

        let mut walker = WalkDir::new(root).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            if entry.file_type().is_file() {
                files.push(SourceFile::from_path(entry.into_path()));
            }
        }
    }

    tracing::debug!(candidates = files.len(), "expanded ingestion paths");
    files
}

/// Split pasted or typed text into paths, one per line.
///
/// Terminals often wrap dropped paths in quotes or prefix them with `file://`.
pub fn parse_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .map(|l| l.trim_matches(|c| c == '\'' || c == '"'))
        .map(|l| l.strip_prefix("file://").unwrap_or(l))
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect()
}
