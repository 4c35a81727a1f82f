//! Transport-related small types and handles.
//!
//! This module defines the deck lifecycle events, the mirrored playback
//! state and the shared levels handle consumed by the ambience engine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Lifecycle signals emitted by a deck. The controller applies them in the
/// order the deck emits them; they are the only way its state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeckEvent {
    /// Playback actually started.
    Play,
    /// Playback actually paused.
    Pause,
    /// Position progressed (or was forced by a seek/rebuild).
    TimeUpdate(Duration),
    /// Real duration became known from the resource's own metadata.
    MetadataLoaded(Duration),
    /// The resource reached its natural end.
    Ended,
}

/// Commands a deck accepts. Failures are swallowed and logged by the deck;
/// a rejected play simply never emits `DeckEvent::Play`.
#[derive(Debug)]
pub enum DeckCmd {
    Load(String),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    SetMuted(bool),
    Quit,
}

/// Mirrored playback state. `current_time` and `duration` track the deck's
/// authoritative values; `duration` starts from the catalog fallback until
/// real metadata arrives.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: Duration,
    pub duration: Duration,
    pub volume: f32,
    pub is_muted: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 0.7,
            is_muted: false,
        }
    }
}

impl PlaybackState {
    /// Volume after the mute flag is applied; what the ambience bed follows.
    pub fn effective_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.volume }
    }
}

/// The explicit shared object composing transport and ambience: the
/// controller writes it, the ambience engine polls it. Owned by whoever
/// wires the two together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levels {
    pub playing: bool,
    pub volume: f32,
}

pub type LevelsHandle = Arc<Mutex<Levels>>;
