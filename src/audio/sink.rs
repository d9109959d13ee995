//! Opening and decoding track files into `rodio` sources and sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::{Error, Result};

pub(super) type FileSource = Decoder<BufReader<File>>;

/// Where new sinks get connected.
pub trait SinkOutput {
    fn new_sink(&self) -> Sink;
}

impl SinkOutput for OutputStream {
    fn new_sink(&self) -> Sink {
        Sink::connect_new(self.mixer())
    }
}

/// Open and decode `path`.
pub(super) fn open_source(path: &Path) -> Result<FileSource> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Returns the sink and the source's total length, when the decoder knows it.
pub(super) fn create_sink_at(
    output: &impl SinkOutput,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>)> {
    let source = open_source(path)?;
    let total = source.total_duration();

    let sink = output.new_sink();
    sink.pause();
    // `skip_duration` also works for sources that cannot seek; zero is a no-op.
    sink.append(source.skip_duration(start_at));
    Ok((sink, total))
}
