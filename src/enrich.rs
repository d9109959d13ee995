//! Asynchronous enrichment of queued tracks with embedded cover art.

mod extract;
mod pipeline;

pub use extract::{ArtExtractor, LoftyExtractor};
pub use pipeline::{ArtQueue, Enriched, Enricher};
