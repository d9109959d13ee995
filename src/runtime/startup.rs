use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::app::App;
use crate::audio::RodioBackend;
use crate::config::{self, LibrarySettings};
use crate::enrich::{ArtQueue, Enriched, Enricher, LoftyExtractor};
use crate::error::Result;
use crate::library::collect_files;
use crate::player::{Controller, MediaBackend, RepeatMode};

pub type Player = Controller<RodioBackend, Enricher>;

/// Open the audio output, start the enrichment workers and apply playback defaults.
pub fn build_player(settings: &config::Settings, results: Sender<Enriched>) -> Result<Player> {
    let media = RodioBackend::new()?;
    let extractor = Arc::new(LoftyExtractor::new(settings.enrichment.max_art_bytes));
    let enricher = Enricher::spawn(extractor, settings.enrichment.workers, results);

    Ok(Controller::new(media, enricher, settings.library.extensions.clone())
        .with_volume(settings.audio.initial_volume)
        .with_shuffle(settings.playback.shuffle)
        .with_repeat(RepeatMode::from(settings.playback.repeat)))
}

/// Expand `paths` and append what they contain, reporting the outcome as a notice.
pub fn add_paths<M: MediaBackend, Q: ArtQueue>(
    player: &mut Controller<M, Q>,
    app: &mut App,
    paths: &[PathBuf],
    library: &LibrarySettings,
) {
    if paths.is_empty() {
        return;
    }
    let files = collect_files(paths, library);
    match player.ingest(files) {
        Ok(n) => app.set_notice(format!("Added {n} track(s)")),
        Err(e) => app.set_notice(e.to_string()),
    }
}
