//! Playback transport: the deck (media element) abstraction and the
//! controller that owns playlist position and mirrored playback state.
//!
//! The controller never computes time or playing flags on its own; it
//! re-derives everything from the lifecycle events its deck emits, so the
//! reported state cannot drift from actual playback.

mod controller;
mod deck;
mod sink;
mod thread;
mod types;

pub use controller::TransportController;
pub use deck::{Deck, RodioDeck};
pub use types::{DeckEvent, Levels, LevelsHandle, PlaybackState};
