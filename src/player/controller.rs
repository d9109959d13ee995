//! The playback controller: queue, cursor, transport and active cover art.
//!
//! Every command is a synchronous `&mut self` call and leaves the cursor
//! either `None` or a valid index into the queue. Commands that make no
//! sense in the current state (empty queue, stale index) do nothing.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::enrich::{ArtQueue, Enriched};
use crate::error::Result;
use crate::library::{ArtRef, Registry, SourceFile, Track, TrackId};

use super::media::{MediaBackend, MediaEvent};
use super::navigation::{self, AfterRemoval, NextStep, PrevStep};
use super::types::{PlaybackState, RepeatMode, Transport};

pub struct Controller<M, Q> {
    registry: Registry,
    extensions: Vec<String>,
    cursor: Option<usize>,
    transport: Transport,
    active_art: Option<ArtRef>,
    media: M,
    art_queue: Q,
    rng: StdRng,
}

impl<M: MediaBackend, Q: ArtQueue> Controller<M, Q> {
    /// `extensions` is the set of file extensions accepted by [`Controller::ingest`].
    pub fn new(media: M, art_queue: Q, extensions: Vec<String>) -> Self {
        Self {
            registry: Registry::new(),
            extensions,
            cursor: None,
            transport: Transport::default(),
            active_art: None,
            media,
            art_queue,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the randomness used by shuffle.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.transport.shuffle = shuffle;
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.transport.repeat = repeat;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn tracks(&self) -> &[Track] {
        self.registry.tracks()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.registry.get(i))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Art shown for the current track, if resolved.
    pub fn active_art(&self) -> Option<&ArtRef> {
        self.active_art.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        match (self.cursor, self.transport.playing) {
            (None, _) => PlaybackState::Empty,
            (Some(_), false) => PlaybackState::Loaded,
            (Some(_), true) => PlaybackState::Playing,
        }
    }

    /// Append the supported files of a batch and queue them for art extraction.
    ///
    /// Returns how many tracks were added; a batch with nothing supported is
    /// reported as [`crate::error::Error::NoSupportedFiles`] and changes nothing.
    pub fn ingest(&mut self, files: Vec<SourceFile>) -> Result<usize> {
        let added = self.registry.ingest(files, &self.extensions)?;
        for track in &added {
            self.art_queue.submit(track);
        }
        Ok(added.len())
    }

    /// Remove the track at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) {
        if let Some(id) = self.registry.get(index).map(|t| t.id) {
            self.remove(id);
        }
    }

    /// Remove a track by id, keeping the cursor on a valid track.
    pub fn remove(&mut self, id: TrackId) {
        let Some(index) = self.registry.remove(id) else {
            return;
        };

        let fix = navigation::after_removal(
            index,
            self.cursor,
            self.registry.len(),
            self.transport.shuffle,
            &mut self.rng,
        );
        tracing::debug!(track = %id, index, ?fix, "track removed");

        match fix {
            AfterRemoval::Reset => self.reset(),
            AfterRemoval::Switch(next) => {
                self.transport.playing = true;
                self.switch_to(next);
            }
            AfterRemoval::Shift(next) => self.cursor = Some(next),
            AfterRemoval::Keep => {}
        }
    }

    /// Empty the queue, releasing all art, and return to the empty state.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.reset();
        tracing::info!("queue cleared");
    }

    /// Apply a finished extraction. Results for tracks no longer queued are dropped.
    pub fn on_art_resolved(&mut self, enriched: Enriched) {
        let Enriched { id, art } = enriched;
        if !self.registry.set_art(id, art.clone()) {
            return;
        }
        if self.current_track().is_some_and(|t| t.id == id) {
            self.active_art = Some(art);
        }
    }

    /// Play/pause. From the empty state this starts the first track.
    pub fn toggle_play(&mut self) {
        match self.state() {
            PlaybackState::Empty => {
                if !self.registry.is_empty() {
                    self.transport.playing = true;
                    self.switch_to(0);
                }
            }
            PlaybackState::Loaded => self.start_output(),
            PlaybackState::Playing => {
                self.media.pause();
                self.transport.playing = false;
            }
        }
    }

    /// Start playing the track at `index` from the beginning.
    pub fn select(&mut self, index: usize) {
        if index >= self.registry.len() {
            tracing::debug!(index, len = self.registry.len(), "ignoring out-of-range selection");
            return;
        }
        self.transport.playing = true;
        self.switch_to(index);
    }

    pub fn next(&mut self) {
        let step = navigation::next_index(
            self.cursor,
            self.registry.len(),
            self.transport.shuffle,
            self.transport.repeat,
            &mut self.rng,
        );
        match step {
            Some(NextStep::Go(index)) => {
                self.transport.playing = true;
                self.switch_to(index);
            }
            Some(NextStep::Stop) => {
                self.media.pause();
                self.transport.playing = false;
            }
            None => {}
        }
    }

    pub fn prev(&mut self) {
        let step = navigation::prev_index(
            self.cursor,
            self.registry.len(),
            self.transport.current_time,
        );
        match step {
            Some(PrevStep::Restart) => self.restart_current(),
            Some(PrevStep::Go(index)) => {
                self.transport.playing = true;
                self.switch_to(index);
            }
            None => {}
        }
    }

    pub fn on_track_ended(&mut self) {
        if self.cursor.is_none() {
            return;
        }
        if self.transport.repeat == RepeatMode::One {
            self.restart_current();
        } else {
            self.next();
        }
    }

    /// Jump to `position`, clamped to the known duration.
    pub fn seek(&mut self, position: Duration) {
        if self.cursor.is_none() {
            return;
        }
        let position = self.transport.clamp_time(position);
        self.media.seek(position);
        self.transport.current_time = position;
    }

    /// Scrub relative to the current position.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let step = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs >= 0 {
            self.transport.current_time.saturating_add(step)
        } else {
            self.transport.current_time.saturating_sub(step)
        };
        self.seek(target);
    }

    /// Direct volume input. Zero counts as muted, anything else unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.transport.volume = volume;
        self.transport.muted = volume == 0.0;
        self.media.set_volume(volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.transport.volume + delta);
    }

    /// Silence or restore output without touching the stored volume.
    pub fn toggle_mute(&mut self) {
        self.transport.muted = !self.transport.muted;
        self.media.set_volume(self.transport.effective_volume());
    }

    pub fn toggle_shuffle(&mut self) {
        self.transport.shuffle = !self.transport.shuffle;
    }

    pub fn cycle_repeat(&mut self) {
        self.transport.repeat = self.transport.repeat.cycle();
    }

    /// Drain and apply the backend's pending events.
    pub fn pump_media(&mut self) {
        for event in self.media.poll_events() {
            self.handle_media_event(event);
        }
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.cursor.is_none() {
            return;
        }
        match event {
            MediaEvent::TimeUpdate(t) => {
                self.transport.current_time = self.transport.clamp_time(t);
            }
            MediaEvent::LoadedMetadata(d) => {
                self.transport.duration = Some(d);
                self.transport.current_time = self.transport.clamp_time(self.transport.current_time);
            }
            MediaEvent::Ended => self.on_track_ended(),
        }
    }

    /// Point the cursor at `index` and restart the backend on that track.
    fn switch_to(&mut self, index: usize) {
        let Some(track) = self.registry.get(index).cloned() else {
            return;
        };

        self.cursor = Some(index);
        self.transport.reset_position();

        // Supersede the previous track's art before anything else can observe it.
        self.active_art = track.art.clone();
        if self.active_art.is_none() {
            self.art_queue.prioritize(&track);
        }

        if let Err(e) = self.media.load(&track.file) {
            tracing::warn!(track = %track.id, error = %e, "failed to load track");
            self.transport.playing = false;
            return;
        }
        self.media.set_volume(self.transport.effective_volume());

        tracing::info!(track = %track.id, name = %track.name, index, "track selected");
        if self.transport.playing {
            self.start_output();
        }
    }

    fn restart_current(&mut self) {
        self.media.seek(Duration::ZERO);
        self.transport.current_time = Duration::ZERO;
        self.start_output();
    }

    fn start_output(&mut self) {
        match self.media.play() {
            Ok(()) => self.transport.playing = true,
            Err(e) => {
                tracing::warn!(error = %e, "playback failed to start");
                self.transport.playing = false;
            }
        }
    }

    fn reset(&mut self) {
        self.cursor = None;
        self.transport.playing = false;
        self.transport.reset_position();
        self.active_art = None;
        self.media.unload();
    }
}
