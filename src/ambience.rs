//! Procedural vinyl surface noise.
//!
//! Two signals are synthesized in real time while music plays: a continuous
//! filtered pink-noise bed ("hiss") and sparse random impulses ("crackle").
//! The `AmbienceEngine` mixes them behind a single master gain that fades in
//! when playback starts and out when it stops, like a stylus dropping onto
//! and lifting off a record.

mod crackle;
mod engine;
mod noise;

pub use crackle::Crackle;
pub use engine::AmbienceEngine;
pub use noise::{PINK_BUFFER_LEN, pink_noise};

#[cfg(test)]
mod tests;
