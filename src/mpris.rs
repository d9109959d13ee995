//! MPRIS2 media-session integration over the D-Bus session bus.
//!
//! The service runs on its own thread. Incoming method calls become
//! [`ControlCmd`]s for the event loop; the event loop pushes now-playing
//! state back through [`MprisHandle`].

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_io::block_on;
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::player::PlaybackState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.sonicflow";
const ARTIST: &str = "Local Library";
const ALBUM: &str = "SonicFlow";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Absolute position in the current track.
    SetPosition(Duration),
    /// Relative offset in microseconds.
    Seek(i64),
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl From<PlaybackState> for PlaybackStatus {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Empty => Self::Stopped,
            PlaybackState::Loaded => Self::Paused,
            PlaybackState::Playing => Self::Playing,
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackStatus,
    title: Option<String>,
    art_url: Option<String>,
    length: Option<Duration>,
    track_id: Option<String>,
    position: Duration,
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publishes now-playing state to the media session.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    /// Describe the current track, or clear the metadata with `None`.
    pub fn set_track_metadata(
        &self,
        track: Option<&Track>,
        art_url: Option<String>,
        length: Option<Duration>,
    ) {
        {
            let mut s = lock(&self.state);
            s.title = track.map(|t| t.name.clone());
            s.track_id = track.map(|t| format!("{OBJECT_PATH}/track/{}", t.id));
            s.art_url = track.and(art_url);
            s.length = track.and(length);
        }
        let _ = self.notify.send(());
    }

    pub fn set_playback(&self, playback: PlaybackStatus) {
        lock(&self.state).playback = playback;
        let _ = self.notify.send(());
    }

    /// Position is polled by clients, so this does not emit a change signal.
    pub fn set_position(&self, position: Duration) {
        lock(&self.state).position = position;
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise in a terminal.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "SonicFlow"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        let _ = self.tx.send(ControlCmd::Seek(offset));
    }

    fn set_position(&self, track_id: ObjectPath<'_>, position: i64) {
        let current = lock(&self.state).track_id.clone();
        if current.as_deref() != Some(track_id.as_str()) || position < 0 {
            return;
        }
        let _ = self
            .tx
            .send(ControlCmd::SetPosition(Duration::from_micros(position as u64)));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match lock(&self.state).playback {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        lock(&self.state).position.as_micros() as i64
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let s = lock(&self.state);
        let mut map = HashMap::new();

        let Some(title) = s.title.clone() else {
            return map;
        };
        let entries = [
            ("xesam:title", owned(title)),
            ("xesam:artist", owned(vec![ARTIST.to_string()])),
            ("xesam:album", owned(ALBUM.to_string())),
            (
                "mpris:trackid",
                s.track_id
                    .as_deref()
                    .and_then(|p| ObjectPath::try_from(p).ok())
                    .and_then(owned),
            ),
            ("mpris:artUrl", s.art_url.clone().and_then(owned)),
            (
                "mpris:length",
                s.length.and_then(|d| owned(d.as_micros() as i64)),
            ),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        map
    }
}

/// Register the service on the session bus. Failures are logged and leave the player usable.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("mpris".to_string())
        .spawn(move || {
            block_on(async move {
                if let Err(e) = serve(tx, state_for_thread, notify_rx).await {
                    tracing::warn!(error = %e, "MPRIS unavailable");
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "failed to start MPRIS thread");
    }

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    tracing::info!(name = BUS_NAME, "MPRIS service registered");

    let player: InterfaceRef<PlayerIface> = object_server.interface(OBJECT_PATH).await?;

    // Runs until the handle is dropped at shutdown.
    while notify.recv().is_ok() {
        while notify.try_recv().is_ok() {}
        let iface = player.get().await;
        let emitter = player.signal_emitter();
        if let Err(e) = iface.playback_status_changed(emitter).await {
            tracing::debug!(error = %e, "failed to signal playback status");
        }
        if let Err(e) = iface.metadata_changed(emitter).await {
            tracing::debug!(error = %e, "failed to signal metadata");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
