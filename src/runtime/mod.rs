use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::enrich::Enriched;
use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let log_path = logging::init(&settings.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting");

    let (art_tx, art_rx) = mpsc::channel::<Enriched>();
    let mut player = startup::build_player(&settings, art_tx)?;
    let mut app = App::new();

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    startup::add_paths(&mut player, &mut app, &paths, &settings.library);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    let mut mpris_sync = mpris_sync::MprisSync::new(env::temp_dir());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        event_loop::Inputs {
            art_rx: &art_rx,
            control_rx: &control_rx,
            mpris: &mpris,
            mpris_sync: &mut mpris_sync,
        },
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("shutting down");
    run_result
}
