//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::{ArtRef, Track};
use crate::player::{RepeatMode, Transport};

/// Borrowed snapshot of the player for one frame.
pub struct View<'a> {
    pub tracks: &'a [Track],
    pub cursor: Option<usize>,
    pub transport: &'a Transport,
    pub art: Option<&'a ArtRef>,
}

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("up/down", "volume"),
    ("m", "mute"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("a", "add path"),
    ("d", "remove"),
    ("c", "clear"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    // Scrubbing sits right after track navigation.
    parts.insert(5, format!("[left/right] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

/// Format a `Duration` as `M:SS`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `0:00` while the length is unknown.
pub fn format_duration(d: Option<Duration>) -> String {
    format_time(d.unwrap_or(Duration::ZERO))
}

fn repeat_text(repeat: RepeatMode) -> &'static str {
    match repeat {
        RepeatMode::None => "Repeat: off",
        RepeatMode::All => "Repeat: all",
        RepeatMode::One => "Repeat: one",
    }
}

fn volume_text(transport: &Transport) -> String {
    if transport.muted {
        "Muted".to_string()
    } else {
        format!("Vol {:.0}%", transport.volume * 100.0)
    }
}

fn art_text(art: Option<&ArtRef>) -> String {
    match art {
        Some(a) => format!("Cover: {} ({} KiB)", a.extension().to_uppercase(), a.data.len().div_ceil(1024)),
        None => "Cover: none".to_string(),
    }
}

/// Lines of the now-playing box.
fn now_playing_lines(view: &View<'_>) -> Vec<Line<'static>> {
    let t = view.transport;
    let Some(track) = view.cursor.and_then(|i| view.tracks.get(i)) else {
        let hint = if view.tracks.is_empty() {
            "No tracks. Press [a] or paste a path to add music."
        } else {
            "Stopped. Press [space] to start."
        };
        return vec![Line::from(hint)];
    };

    let state = if t.playing { "Playing" } else { "Paused" };
    vec![
        Line::from(format!("{state}: {} [{}]", track.name, track.kind)),
        Line::from(format!(
            "{} / {} • {} • Shuffle: {} • {} • {}",
            format_time(t.current_time),
            format_duration(t.duration),
            volume_text(t),
            if t.shuffle { "on" } else { "off" },
            repeat_text(t.repeat),
            art_text(view.art),
        )),
    ]
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    view: &View<'_>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" sonicflow ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let now_playing = Paragraph::new(now_playing_lines(view))
        .block(
            Block::bordered()
                .padding(Padding::left(1))
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    // Only build ListItems for the visible window.
    {
        let total = view.tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let start = sel.saturating_sub(half).min(total - list_height);
            (start, start + list_height)
        };

        let items: Vec<ListItem> = view.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let marker = if view.cursor == Some(start + offset) { "♪ " } else { "  " };
                ListItem::new(format!("{marker}{} ({})", track.name, track.kind))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" queue ({total}) ")),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let (title, message) = match app.mode {
        InputMode::AddPath => (" add path (enter adds, esc cancels) ", format!("{}_", app.input)),
        InputMode::Normal => (" messages ", app.notice.clone().unwrap_or_default()),
    };
    let prompt = Paragraph::new(message).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::left(1)),
    );
    frame.render_widget(prompt, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
