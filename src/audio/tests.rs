use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use rodio::Sink;
use rodio::queue::SourcesQueueOutput;
use tempfile::NamedTempFile;

use super::backend::RodioBackend;
use super::sink::{SinkOutput, open_source};
use crate::error::Error;
use crate::library::SourceFile;
use crate::player::{MediaBackend, MediaEvent};

/// Sinks that are not attached to a device; the test pulls their samples.
#[derive(Clone, Default)]
struct Detached(Rc<RefCell<Vec<SourcesQueueOutput>>>);

impl SinkOutput for Detached {
    fn new_sink(&self) -> Sink {
        let (sink, output) = Sink::new();
        self.0.borrow_mut().push(output);
        sink
    }
}

impl Detached {
    /// Pull enough samples from every sink to play any short source to its end.
    fn drain(&self) {
        for output in self.0.borrow_mut().iter_mut() {
            for _ in 0..4096 {
                output.next();
            }
        }
    }
}

/// Mono 16-bit PCM at 8 kHz with `samples` frames.
fn write_wav(path: &Path, samples: u32) {
    let data_len = samples * 2;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&16000u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..samples {
        bytes.extend_from_slice(&((i as i16) * 100).to_le_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

fn played_out_backend(dir: &Path) -> (RodioBackend<Detached>, Detached) {
    let path = dir.join("short.wav");
    write_wav(&path, 64);

    let output = Detached::default();
    let mut backend = RodioBackend::with_output(output.clone());
    backend.load(&SourceFile::from_path(path)).unwrap();
    backend.play().unwrap();
    output.drain();
    assert!(backend.poll_events().contains(&MediaEvent::Ended));
    (backend, output)
}

fn ended(backend: &mut RodioBackend<Detached>) -> bool {
    backend.poll_events().contains(&MediaEvent::Ended)
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.mp3");
    match open_source(&path) {
        Err(Error::Open { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected open error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn undecodable_file_is_a_decode_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"definitely not audio").unwrap();
    match open_source(file.path()) {
        Err(Error::Decode { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected decode error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn seek_to_start_after_the_end_replays_the_track() {
    let dir = tempfile::tempdir().unwrap();
    let (mut backend, output) = played_out_backend(dir.path());

    backend.seek(Duration::ZERO);
    backend.play().unwrap();
    assert!(!ended(&mut backend));

    output.drain();
    assert!(ended(&mut backend));
}

#[test]
fn play_after_the_end_starts_over() {
    let dir = tempfile::tempdir().unwrap();
    let (mut backend, output) = played_out_backend(dir.path());

    backend.play().unwrap();
    let events = backend.poll_events();
    assert!(!events.contains(&MediaEvent::Ended));
    assert!(events.contains(&MediaEvent::TimeUpdate(Duration::ZERO)));

    output.drain();
    assert!(ended(&mut backend));
}

#[test]
fn play_without_a_source_fails() {
    let mut backend = RodioBackend::with_output(Detached::default());
    assert!(matches!(backend.play(), Err(Error::NothingLoaded)));
    assert!(backend.poll_events().is_empty());
}
