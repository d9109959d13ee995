//! Playback control: transport state machine and navigation policy.
//!
//! `Controller` owns the queue and the cursor and drives a [`MediaBackend`];
//! `navigation` holds the pure next/previous/removal rules it applies.

mod controller;
mod media;
mod navigation;
mod types;

pub use controller::Controller;
pub use media::{MediaBackend, MediaEvent};
pub use types::{PlaybackState, RepeatMode, Transport};
