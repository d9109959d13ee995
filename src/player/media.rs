//! The seam between the controller and whatever actually makes sound.

use std::time::Duration;

use crate::error::Result;
use crate::library::SourceFile;

/// Notifications from the backend, delivered by [`MediaBackend::poll_events`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved.
    TimeUpdate(Duration),
    /// The loaded source's length became known.
    LoadedMetadata(Duration),
    /// The loaded source played to its end.
    Ended,
}

/// Audio output driven by the controller.
///
/// A freshly loaded source is paused at position zero.
pub trait MediaBackend {
    /// Replace the current source. Pending seeks and volume ramps for the old one are dropped.
    fn load(&mut self, file: &SourceFile) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    /// Drop the current source entirely.
    fn unload(&mut self);
    /// Events since the previous call, oldest first.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}
