use super::*;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::library::{SourceFile, TrackId};

fn make_track() -> Track {
    Track {
        id: TrackId::next(),
        name: "Test Title".to_string(),
        kind: "MP3".to_string(),
        file: Arc::new(SourceFile::from_path(PathBuf::from("/tmp/music/Test Title.mp3"))),
        art: None,
    }
}

fn iface() -> (PlayerIface, Arc<Mutex<SharedState>>, Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    (iface, state, rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };

    let track = make_track();
    handle.set_track_metadata(
        Some(&track),
        Some("file:///tmp/cover.png".to_string()),
        Some(Duration::from_micros(1_234_567)),
    );

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.art_url.as_deref(), Some("file:///tmp/cover.png"));
        assert_eq!(s.length, Some(Duration::from_micros(1_234_567)));
        assert_eq!(
            s.track_id.as_deref(),
            Some(format!("/org/mpris/MediaPlayer2/track/{}", track.id).as_str())
        );
    }
    assert!(notify_rx.try_recv().is_ok());

    handle.set_track_metadata(None, Some("file:///stale.png".to_string()), None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let (iface, state, _rx) = iface();

    for (status, expected) in [
        (PlaybackStatus::Stopped, "Stopped"),
        (PlaybackStatus::Playing, "Playing"),
        (PlaybackStatus::Paused, "Paused"),
    ] {
        state.lock().unwrap().playback = status;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn player_state_maps_to_playback_status() {
    assert_eq!(PlaybackStatus::from(PlaybackState::Empty), PlaybackStatus::Stopped);
    assert_eq!(PlaybackStatus::from(PlaybackState::Loaded), PlaybackStatus::Paused);
    assert_eq!(PlaybackStatus::from(PlaybackState::Playing), PlaybackStatus::Playing);
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface();
    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.art_url = Some("file:///tmp/cover.jpg".to_string());
        s.length = Some(Duration::from_secs(42));
        s.track_id = Some("/org/mpris/MediaPlayer2/track/1".to_string());
    }

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_a_track() {
    let (iface, _state, _rx) = iface();
    assert!(iface.metadata().is_empty());
}

#[test]
fn set_position_only_applies_to_the_current_track() {
    let (iface, state, rx) = iface();
    state.lock().unwrap().track_id = Some("/org/mpris/MediaPlayer2/track/3".to_string());

    let other = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/4").unwrap();
    iface.set_position(other, 1_000_000);
    assert!(rx.try_recv().is_err());

    let current = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/3").unwrap();
    iface.set_position(current, 2_500_000);
    assert_eq!(
        rx.try_recv().unwrap(),
        ControlCmd::SetPosition(Duration::from_millis(2500))
    );
}

#[test]
fn transport_methods_forward_commands() {
    let (iface, _state, rx) = iface();
    iface.play_pause();
    iface.next();
    iface.previous();
    iface.seek(-5_000_000);
    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Seek(-5_000_000)
        ]
    );
}
