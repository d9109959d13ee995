//! Next/previous selection rules, kept free of side effects.

use std::time::Duration;

use rand::Rng;

use super::types::RepeatMode;

/// Past this point "previous" restarts the current track instead.
pub const RESTART_THRESHOLD: Duration = Duration::from_secs(3);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NextStep {
    Go(usize),
    /// Ran off the end without wrapping.
    Stop,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrevStep {
    /// Rewind the current track, keeping the cursor.
    Restart,
    Go(usize),
}

/// What the cursor must do after a removal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AfterRemoval {
    /// The queue is empty now.
    Reset,
    /// The active track went away; switch to this index.
    Switch(usize),
    /// An earlier track went away; same track, new index.
    Shift(usize),
    Keep,
}

/// `None` for an empty queue.
///
/// Shuffle draws uniformly over the whole queue and may pick the current track again.
pub fn next_index<R: Rng + ?Sized>(
    cursor: Option<usize>,
    len: usize,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> Option<NextStep> {
    if len == 0 {
        return None;
    }
    if shuffle {
        return Some(NextStep::Go(rng.gen_range(0..len)));
    }

    let next = cursor.map_or(0, |c| c + 1);
    if next < len {
        Some(NextStep::Go(next))
    } else if repeat == RepeatMode::All {
        Some(NextStep::Go(0))
    } else {
        Some(NextStep::Stop)
    }
}

/// `None` for an empty queue. Wrapping below zero ignores the repeat mode.
pub fn prev_index(cursor: Option<usize>, len: usize, current_time: Duration) -> Option<PrevStep> {
    if len == 0 {
        return None;
    }
    if current_time > RESTART_THRESHOLD {
        return Some(PrevStep::Restart);
    }
    match cursor {
        Some(c) if c > 0 => Some(PrevStep::Go(c - 1)),
        _ => Some(PrevStep::Go(len - 1)),
    }
}

/// Cursor fix-up once the track at `removed` is gone and `remaining` tracks are left.
pub fn after_removal<R: Rng + ?Sized>(
    removed: usize,
    cursor: Option<usize>,
    remaining: usize,
    shuffle: bool,
    rng: &mut R,
) -> AfterRemoval {
    match cursor {
        Some(c) if c == removed => {
            if remaining == 0 {
                AfterRemoval::Reset
            } else if shuffle {
                AfterRemoval::Switch(rng.gen_range(0..remaining))
            } else if removed < remaining {
                AfterRemoval::Switch(removed)
            } else {
                AfterRemoval::Switch(0)
            }
        }
        Some(c) if c > removed => AfterRemoval::Shift(c - 1),
        _ => AfterRemoval::Keep,
    }
}
