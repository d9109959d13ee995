//! Background cover-art extraction.
//!
//! A small pool of threads drains a shared job queue. Every track is
//! attempted at most once; results travel back over a channel and are
//! applied by whoever owns the controller.

use std::collections::{HashSet, VecDeque};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::library::{ArtRef, FileHandle, Track, TrackId};

use super::extract::ArtExtractor;

/// Successful extraction for one track.
#[derive(Debug, Clone)]
pub struct Enriched {
    pub id: TrackId,
    pub art: ArtRef,
}

/// Where the controller sends tracks that need art.
pub trait ArtQueue {
    /// Queue a newly added track.
    fn submit(&self, track: &Track);
    /// Move a track ahead of everything else still waiting.
    fn prioritize(&self, track: &Track);
}

struct Job {
    id: TrackId,
    file: FileHandle,
}

#[derive(Default)]
struct Jobs {
    pending: VecDeque<Job>,
    accepted: HashSet<TrackId>,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    jobs: Mutex<Jobs>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Jobs> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Worker pool extracting art off the event loop.
pub struct Enricher {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl Enricher {
    /// Start `workers` threads (at least one) sending results to `results`.
    pub fn spawn(
        extractor: Arc<dyn ArtExtractor>,
        workers: usize,
        results: Sender<Enriched>,
    ) -> Self {
        let shared = Arc::new(Shared::default());

        let workers = (0..workers.max(1))
            .map(|n| {
                let shared = shared.clone();
                let extractor = extractor.clone();
                let results = results.clone();
                thread::Builder::new()
                    .name(format!("enrich-{n}"))
                    .spawn(move || worker_loop(&shared, extractor.as_ref(), &results))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!(error = %e, "failed to start enrichment worker");
                    None
                }
            })
            .collect();

        Self { shared, workers }
    }

    /// Jobs accepted but not yet picked up by a worker.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.shared.lock().pending.len()
    }
}

impl ArtQueue for Enricher {
    fn submit(&self, track: &Track) {
        let mut jobs = self.shared.lock();
        if !jobs.accepted.insert(track.id) {
            return;
        }
        jobs.pending.push_back(Job {
            id: track.id,
            file: track.file.clone(),
        });
        drop(jobs);
        self.shared.ready.notify_one();
    }

    fn prioritize(&self, track: &Track) {
        let mut jobs = self.shared.lock();
        if jobs.accepted.insert(track.id) {
            jobs.pending.push_front(Job {
                id: track.id,
                file: track.file.clone(),
            });
        } else if let Some(pos) = jobs.pending.iter().position(|j| j.id == track.id) {
            if let Some(job) = jobs.pending.remove(pos) {
                jobs.pending.push_front(job);
            }
        } else {
            // Already running or finished; one attempt per track.
            return;
        }
        tracing::debug!(track = %track.id, "art extraction prioritized");
        drop(jobs);
        self.shared.ready.notify_one();
    }
}

impl Drop for Enricher {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.ready.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: &Shared, extractor: &dyn ArtExtractor, results: &Sender<Enriched>) {
    loop {
        let job = {
            let mut jobs = shared.lock();
            loop {
                if jobs.shutdown {
                    return;
                }
                if let Some(job) = jobs.pending.pop_front() {
                    break job;
                }
                jobs = shared
                    .ready
                    .wait(jobs)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        match extractor.extract(&job.file) {
            Ok(Some(art)) => {
                tracing::debug!(track = %job.id, bytes = art.data.len(), mime = %art.mime_type, "cover art extracted");
                let enriched = Enriched {
                    id: job.id,
                    art: Arc::new(art),
                };
                if results.send(enriched).is_err() {
                    // Receiver gone: the player is shutting down.
                    return;
                }
            }
            Ok(None) => {
                tracing::debug!(track = %job.id, "no embedded art");
            }
            Err(e) => {
                tracing::debug!(track = %job.id, error = %e, "art extraction failed");
            }
        }
    }
}
