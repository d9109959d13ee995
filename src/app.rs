//! Application module: the terminal view model used by the UI and runtime.
//!
//! `App` only tracks what the screen needs on top of the player: the
//! highlighted row, the path prompt and the last notice.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
