use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::config;
use crate::enrich::{ArtQueue, Enriched};
use crate::library::parse_paths;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Controller, MediaBackend, PlaybackState};
use crate::runtime::mpris_sync::MprisSync;
use crate::runtime::startup::{Player, add_paths};
use crate::ui::{self, View};

/// Channels and session state the loop polls every tick.
pub struct Inputs<'a> {
    pub art_rx: &'a Receiver<Enriched>,
    pub control_rx: &'a Receiver<ControlCmd>,
    pub mpris: &'a MprisHandle,
    pub mpris_sync: &'a mut MprisSync,
}

/// Main terminal event loop: applies enrichment results, media and MPRIS
/// events, draws, then handles one input event. Returns when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    mut inputs: Inputs<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(enriched) = inputs.art_rx.try_recv() {
            player.on_art_resolved(enriched);
        }
        player.pump_media();

        while let Ok(cmd) = inputs.control_rx.try_recv() {
            tracing::debug!(?cmd, "media session command");
            if handle_control_cmd(cmd, player) {
                return Ok(());
            }
        }

        app.follow(player.cursor());
        app.clamp_selection(player.tracks().len());
        inputs.mpris_sync.update(inputs.mpris, player);

        let view = View {
            tracks: player.tracks(),
            cursor: player.cursor(),
            transport: player.transport(),
            art: player.active_art(),
        };
        terminal.draw(|f| ui::draw(f, app, &view, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, player) {
                        break;
                    }
                }
                Event::Paste(text) => {
                    add_paths(player, app, &parse_paths(&text), &settings.library);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply a media-session command. Returns true when the player should quit.
fn handle_control_cmd<M: MediaBackend, Q: ArtQueue>(
    cmd: ControlCmd,
    player: &mut Controller<M, Q>,
) -> bool {
    let playing = player.state() == PlaybackState::Playing;
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play if !playing => player.toggle_play(),
        // Stop keeps the track loaded, like pause.
        ControlCmd::Pause | ControlCmd::Stop if playing => player.toggle_play(),
        ControlCmd::PlayPause => player.toggle_play(),
        ControlCmd::Next => player.next(),
        ControlCmd::Prev => player.prev(),
        ControlCmd::SetPosition(position) => player.seek(position),
        ControlCmd::Seek(offset_micros) => {
            let now = player.transport().current_time;
            let delta = Duration::from_micros(offset_micros.unsigned_abs());
            let target = if offset_micros >= 0 {
                now.saturating_add(delta)
            } else {
                now.saturating_sub(delta)
            };
            player.seek(target);
        }
        ControlCmd::Play | ControlCmd::Pause | ControlCmd::Stop => {}
    }
    false
}

/// Handle one key press. Returns true when the player should quit.
fn handle_key_event<M: MediaBackend, Q: ArtQueue>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Controller<M, Q>,
) -> bool {
    if app.mode == InputMode::AddPath {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Enter => {
                let text = app.take_input();
                add_paths(player, app, &parse_paths(&text), &settings.library);
            }
            KeyCode::Char(c) if !c.is_control() => app.push_char(c),
            _ => {}
        }
        return false;
    }

    let len = player.tracks().len();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code != KeyCode::Char('g') {
        app.reset_prefix();
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle_play(),
        KeyCode::Enter => {
            if len > 0 {
                app.follow_playback = true;
                player.select(app.selected);
            }
        }
        KeyCode::Char('j') => app.next(len),
        KeyCode::Char('k') => app.prev(len),
        KeyCode::Char('g') => {
            if app.press_g() {
                app.select_first();
            }
        }
        KeyCode::Char('G') => app.select_last(len),
        KeyCode::Up => player.adjust_volume(settings.controls.volume_step),
        KeyCode::Down => player.adjust_volume(-settings.controls.volume_step),
        KeyCode::Left if ctrl => player.prev(),
        KeyCode::Right if ctrl => player.next(),
        KeyCode::Char('h') => player.prev(),
        KeyCode::Char('l') => player.next(),
        KeyCode::Left => player.seek_by(-(settings.controls.scrub_seconds as i64)),
        KeyCode::Right => player.seek_by(settings.controls.scrub_seconds as i64),
        KeyCode::Char('m') => player.toggle_mute(),
        KeyCode::Char('s') => player.toggle_shuffle(),
        KeyCode::Char('r') => player.cycle_repeat(),
        KeyCode::Char('d') => {
            player.remove_at(app.selected);
            app.clamp_selection(player.tracks().len());
        }
        KeyCode::Char('c') => {
            player.clear();
            app.select_first();
            app.follow_playback = true;
        }
        KeyCode::Char('a') => app.enter_add_mode(),
        KeyCode::Esc => app.clear_notice(),
        _ => {}
    }
    false
}
