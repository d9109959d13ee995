//! Audio output through `rodio`.
//!
//! [`RodioBackend`] is the [`crate::player::MediaBackend`] used at runtime.
//! It owns the output stream and one sink for the loaded track.

mod backend;
mod sink;

pub use backend::RodioBackend;

#[cfg(test)]
mod tests;
