use crate::error::{Error, Result};

use super::ingest::tracks_from;
use super::model::{ArtRef, SourceFile, Track, TrackId};

/// The ordered queue of tracks and their cover art.
#[derive(Debug, Default)]
pub struct Registry {
    tracks: Vec<Track>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the supported files of a batch, sorted by name, after the existing queue.
    ///
    /// Returns the appended tracks. A batch with nothing supported leaves the
    /// queue untouched and yields [`Error::NoSupportedFiles`].
    pub fn ingest(&mut self, files: Vec<SourceFile>, extensions: &[String]) -> Result<Vec<Track>> {
        let offered = files.len();
        let added = tracks_from(files, extensions);
        if added.is_empty() {
            tracing::info!(offered, "ingestion batch had no supported files");
            return Err(Error::NoSupportedFiles);
        }

        tracing::info!(offered, accepted = added.len(), "tracks added to queue");
        self.tracks.extend(added.iter().cloned());
        Ok(added)
    }

    /// Remove a track by id, releasing its art. Unknown ids are ignored.
    ///
    /// Returns the index the track occupied.
    pub fn remove(&mut self, id: TrackId) -> Option<usize> {
        let index = self.position(id)?;
        let removed = self.tracks.remove(index);
        release_art(removed.id, removed.art);
        Some(index)
    }

    /// Release every track's art and empty the queue.
    pub fn clear(&mut self) {
        for track in self.tracks.drain(..) {
            release_art(track.id, track.art);
        }
    }

    /// Attach art to a track, releasing whatever it held before.
    ///
    /// Returns `false` (and drops `art`) when the track is no longer queued.
    pub fn set_art(&mut self, id: TrackId, art: ArtRef) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                let previous = track.art.replace(art);
                release_art(id, previous);
                true
            }
            None => {
                tracing::trace!(track = %id, "art arrived for a track no longer queued");
                false
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn release_art(id: TrackId, art: Option<ArtRef>) {
    if let Some(art) = art {
        tracing::trace!(track = %id, bytes = art.data.len(), "releasing cover art");
        drop(art);
    }
}
