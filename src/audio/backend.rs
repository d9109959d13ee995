use std::path::PathBuf;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::{Error, Result};
use crate::library::SourceFile;
use crate::player::{MediaBackend, MediaEvent};

use super::sink::{SinkOutput, create_sink_at};

/// The track currently in the sink.
struct Loaded {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
    /// Added to the sink position after a seek rebuilt the sink mid-file.
    offset: Duration,
    duration_reported: bool,
}

impl Loaded {
    fn position(&self) -> Duration {
        self.offset + self.sink.get_pos()
    }
}

/// Plays tracks on the default output device.
pub struct RodioBackend<O: SinkOutput = OutputStream> {
    output: O,
    loaded: Option<Loaded>,
    playing: bool,
    volume: f32,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().map_err(|e| Error::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which garbles the terminal.
        stream.log_on_drop(false);
        Ok(Self::with_output(stream))
    }
}

impl<O: SinkOutput> RodioBackend<O> {
    pub(super) fn with_output(output: O) -> Self {
        Self {
            output,
            loaded: None,
            playing: false,
            volume: 1.0,
        }
    }

    fn stop_current(&mut self) {
        if let Some(old) = self.loaded.take() {
            old.sink.stop();
        }
        self.playing = false;
    }

    /// Seek by rebuilding the sink, for decoders that cannot seek in place
    /// and for sinks whose source already played out.
    fn rebuild_at(&mut self, position: Duration) -> Result<()> {
        let Some(current) = self.loaded.as_mut() else {
            return Err(Error::NothingLoaded);
        };
        let (sink, _) = create_sink_at(&self.output, &current.path, position)?;
        sink.set_volume(self.volume);
        if self.playing {
            sink.play();
        }
        current.sink.stop();
        current.sink = sink;
        current.offset = position;
        Ok(())
    }
}

impl<O: SinkOutput> MediaBackend for RodioBackend<O> {
    fn load(&mut self, file: &SourceFile) -> Result<()> {
        self.stop_current();
        let (sink, duration) = create_sink_at(&self.output, &file.path, Duration::ZERO)?;
        sink.set_volume(self.volume);
        tracing::debug!(path = ?file.path, ?duration, "source loaded");
        self.loaded = Some(Loaded {
            path: file.path.clone(),
            sink,
            duration,
            offset: Duration::ZERO,
            duration_reported: false,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let loaded = self.loaded.as_ref().ok_or(Error::NothingLoaded)?;
        if loaded.sink.empty() {
            // Played out: start over from the beginning.
            self.rebuild_at(Duration::ZERO)?;
        }
        let loaded = self.loaded.as_ref().ok_or(Error::NothingLoaded)?;
        loaded.sink.play();
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(loaded) = &self.loaded {
            loaded.sink.pause();
        }
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        // A drained sink accepts seeks without doing anything.
        if !loaded.sink.empty() {
            match loaded.sink.try_seek(position.saturating_sub(loaded.offset)) {
                Ok(()) => return,
                Err(e) => tracing::debug!(error = %e, "in-place seek failed, rebuilding sink"),
            }
        }
        if let Err(e) = self.rebuild_at(position) {
            tracing::warn!(error = %e, "seek failed");
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(loaded) = &self.loaded {
            loaded.sink.set_volume(volume);
        }
    }

    fn unload(&mut self) {
        self.stop_current();
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if !loaded.duration_reported {
            if let Some(d) = loaded.duration {
                events.push(MediaEvent::LoadedMetadata(d));
            }
            loaded.duration_reported = true;
        }
        events.push(MediaEvent::TimeUpdate(loaded.position()));

        if self.playing && loaded.sink.empty() {
            self.playing = false;
            events.push(MediaEvent::Ended);
        }
        events
    }
}

impl<O: SinkOutput> Drop for RodioBackend<O> {
    fn drop(&mut self) {
        self.stop_current();
    }
}
