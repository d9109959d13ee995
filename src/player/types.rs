//! Transport state and the small enums around it.

use std::time::Duration;

use crate::config::RepeatSetting;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    None,
    /// Wrap around to the first track.
    All,
    /// Repeat the current track when it ends.
    One,
}

impl RepeatMode {
    /// `None -> All -> One -> None`.
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(s: RepeatSetting) -> Self {
        match s {
            RepeatSetting::None => Self::None,
            RepeatSetting::All => Self::All,
            RepeatSetting::One => Self::One,
        }
    }
}

/// Coarse state derived from the cursor and the playing flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track selected.
    Empty,
    /// A track is selected but not playing.
    Loaded,
    Playing,
}

/// Transport controls and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub playing: bool,
    pub current_time: Duration,
    /// `None` until the backend reports it.
    pub duration: Option<Duration>,
    /// Stored level in `[0, 1]`; muting never changes it.
    pub volume: f32,
    pub muted: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            playing: false,
            current_time: Duration::ZERO,
            duration: None,
            volume: 1.0,
            muted: false,
            shuffle: false,
            repeat: RepeatMode::None,
        }
    }
}

impl Transport {
    /// Level actually sent to the output.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Clamp `t` into `[0, duration]`; only the lower bound applies while the duration is unknown.
    pub fn clamp_time(&self, t: Duration) -> Duration {
        match self.duration {
            Some(d) => t.min(d),
            None => t,
        }
    }

    /// Forget the loaded source's position and length.
    pub(crate) fn reset_position(&mut self) {
        self.current_time = Duration::ZERO;
        self.duration = None;
    }
}
