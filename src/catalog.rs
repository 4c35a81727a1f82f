//! Static music catalog: tracks, composers and the loader.
//!
//! The catalog is a single JSON file consumed read-only at startup.
//! Tracks reference composers by id; the core never mutates either.

mod load;
mod model;

pub use load::*;
pub use model::*;

#[cfg(test)]
mod tests;
