//! Track registry: the queue of loaded tracks and how files get into it.
//!
//! `ingest` turns user-supplied paths into candidate files, `Registry` owns
//! the ordered queue and each track's cover art.

mod ingest;
mod model;
mod registry;

pub use ingest::{collect_files, parse_paths};
pub use model::*;
pub use registry::Registry;
