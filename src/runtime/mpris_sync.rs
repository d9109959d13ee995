use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::enrich::ArtQueue;
use crate::library::{ArtRef, TrackId};
use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::player::{Controller, MediaBackend};

/// The active cover written out so media-session clients can load it by URL.
pub struct ArtFile {
    dir: PathBuf,
    current: Option<(TrackId, PathBuf)>,
}

impl ArtFile {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, current: None }
    }

    /// Write `art` for `id`, replacing the previous file. Returns a `file://` URL.
    pub fn write(&mut self, id: TrackId, art: &ArtRef) -> Option<String> {
        if let Some((cur, path)) = &self.current {
            if *cur == id {
                return Some(file_url(path));
            }
        }
        self.clear();

        let path = self.dir.join(format!(
            "sonicflow-cover-{}-{id}.{}",
            std::process::id(),
            art.extension()
        ));
        if let Err(e) = fs::write(&path, &art.data) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write cover art");
            return None;
        }
        let url = file_url(&path);
        self.current = Some((id, path));
        Some(url)
    }

    /// Remove the written file, if any.
    pub fn clear(&mut self) {
        if let Some((_, path)) = self.current.take() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), error = %e, "failed to remove cover art file");
            }
        }
    }
}

impl Drop for ArtFile {
    fn drop(&mut self) {
        self.clear();
    }
}

fn file_url(path: &std::path::Path) -> String {
    format!("file://{}", path.display())
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    track: Option<TrackId>,
    has_art: bool,
    status: PlaybackStatus,
    duration: Option<Duration>,
}

/// Pushes player changes to the media session, only when something visible changed.
pub struct MprisSync {
    art: ArtFile,
    last: Option<Snapshot>,
}

impl MprisSync {
    pub fn new(art_dir: PathBuf) -> Self {
        Self {
            art: ArtFile::new(art_dir),
            last: None,
        }
    }

    pub fn update<M: MediaBackend, Q: ArtQueue>(
        &mut self,
        mpris: &MprisHandle,
        player: &Controller<M, Q>,
    ) {
        let transport = player.transport();
        mpris.set_position(transport.current_time);

        let track = player.current_track();
        let snapshot = Snapshot {
            track: track.map(|t| t.id),
            has_art: player.active_art().is_some(),
            status: PlaybackStatus::from(player.state()),
            duration: transport.duration,
        };
        if self.last.as_ref() == Some(&snapshot) {
            return;
        }

        let art_url = match (track, player.active_art()) {
            (Some(t), Some(art)) => self.art.write(t.id, art),
            _ => {
                self.art.clear();
                None
            }
        };
        mpris.set_track_metadata(track, art_url, transport.duration);
        mpris.set_playback(snapshot.status);
        self.last = Some(snapshot);
    }
}
