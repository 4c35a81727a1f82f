//! The transport controller: playlist position, transport operations and
//! the state mirror fed by deck events.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::catalog::Track;
use crate::config::PlaybackSettings;

use super::deck::Deck;
use super::types::{DeckEvent, Levels, LevelsHandle, PlaybackState};

pub struct TransportController {
    deck: Box<dyn Deck>,
    events: Receiver<DeckEvent>,

    playlist: Vec<Arc<Track>>,
    /// Position in `playlist`; `None` until something is selected. When a
    /// track is current and a member of the playlist, this points at it.
    index: Option<usize>,
    current: Option<Arc<Track>>,

    state: PlaybackState,
    levels: LevelsHandle,

    /// `prev` restarts the current track instead of stepping back once this
    /// much of it has played.
    restart_threshold: Duration,
}

impl TransportController {
    pub fn new(
        deck: Box<dyn Deck>,
        events: Receiver<DeckEvent>,
        levels: LevelsHandle,
        settings: &PlaybackSettings,
    ) -> Self {
        let mut controller = Self {
            deck,
            events,
            playlist: Vec::new(),
            index: None,
            current: None,
            state: PlaybackState {
                volume: settings.initial_volume,
                ..PlaybackState::default()
            },
            levels,
            restart_threshold: settings.restart_threshold(),
        };
        controller.deck.set_volume(settings.initial_volume);
        controller.publish_levels();
        controller
    }

    // --- state snapshot -------------------------------------------------

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.current.as_ref()
    }

    pub fn playlist(&self) -> &[Arc<Track>] {
        &self.playlist
    }

    pub fn playlist_index(&self) -> Option<usize> {
        self.index
    }

    // --- transport operations -------------------------------------------

    /// Start playback of the current track. No-op without one.
    pub fn play(&mut self) {
        if self.current.is_some() {
            self.deck.play();
        }
    }

    pub fn pause(&mut self) {
        self.deck.pause();
    }

    pub fn toggle_play(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to `position`. The mirror is updated immediately so callers see
    /// the seek before the deck's own event confirms it.
    pub fn seek(&mut self, position: Duration) {
        self.deck.seek(position);
        self.state.current_time = position;
    }

    /// Set the volume. Raising it above zero always clears mute.
    pub fn set_volume(&mut self, volume: f32) {
        self.state.volume = volume;
        self.deck.set_volume(volume);
        if volume > 0.0 && self.state.is_muted {
            self.state.is_muted = false;
            self.deck.set_muted(false);
        }
        self.publish_levels();
    }

    /// Flip mute. The stored volume is preserved either way.
    pub fn toggle_mute(&mut self) {
        self.state.is_muted = !self.state.is_muted;
        self.deck.set_muted(self.state.is_muted);
        self.publish_levels();
    }

    /// Load and play `track`. If it is a member of the playlist the index
    /// follows it; an ad-hoc track outside the list leaves the index alone.
    pub fn play_track(&mut self, track: Arc<Track>) {
        if let Some(pos) = self.playlist.iter().position(|t| t.id == track.id) {
            self.index = Some(pos);
        }
        self.load_and_play(track);
    }

    /// Advance to the next track, wrapping around to the start.
    pub fn play_next(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        let next = match self.index {
            Some(i) => (i + 1) % self.playlist.len(),
            None => 0,
        };
        self.index = Some(next);
        self.load_and_play(self.playlist[next].clone());
    }

    /// Go back one track, wrapping around to the end — unless the current
    /// track has played past the restart threshold, in which case it
    /// restarts from zero (the usual double-tap-to-go-back convention).
    pub fn play_prev(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        if self.state.current_time > self.restart_threshold {
            self.seek(Duration::ZERO);
            return;
        }
        let prev = match self.index {
            Some(i) if i > 0 => i - 1,
            _ => self.playlist.len() - 1,
        };
        self.index = Some(prev);
        self.load_and_play(self.playlist[prev].clone());
    }

    /// Replace the playlist wholesale. With nothing selected yet, the first
    /// track of the new list becomes current (without playing it).
    pub fn set_playlist(&mut self, tracks: Vec<Arc<Track>>) {
        self.playlist = tracks;
        if self.current.is_none() && !self.playlist.is_empty() {
            let first = self.playlist[0].clone();
            self.index = Some(0);
            self.state.duration = first.catalog_duration();
            self.current = Some(first);
        }
    }

    // --- event mirror ---------------------------------------------------

    /// Drain pending deck events and mirror them into the state snapshot.
    /// Must be pumped regularly; auto-advance happens here.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                DeckEvent::Play => {
                    self.state.is_playing = true;
                    self.publish_levels();
                }
                DeckEvent::Pause => {
                    self.state.is_playing = false;
                    self.publish_levels();
                }
                DeckEvent::TimeUpdate(pos) => {
                    self.state.current_time = pos;
                }
                DeckEvent::MetadataLoaded(duration) => {
                    self.state.duration = duration;
                }
                DeckEvent::Ended => {
                    self.state.is_playing = false;
                    self.publish_levels();
                    // Auto-advance, but never wrap on a natural end: the
                    // last track leaves the player at rest.
                    if let Some(i) = self.index {
                        if i + 1 < self.playlist.len() {
                            self.index = Some(i + 1);
                            self.load_and_play(self.playlist[i + 1].clone());
                        }
                    }
                }
            }
        }
    }

    // --- internals ------------------------------------------------------

    fn load_and_play(&mut self, track: Arc<Track>) {
        // Catalog duration is only a placeholder until the deck probes the
        // real metadata.
        self.state.duration = track.catalog_duration();
        self.state.current_time = Duration::ZERO;
        self.deck.load(&track.audio_url);
        self.current = Some(track);
        self.deck.play();
    }

    fn publish_levels(&self) {
        if let Ok(mut levels) = self.levels.lock() {
            *levels = Levels {
                playing: self.state.is_playing,
                volume: self.state.effective_volume(),
            };
        }
    }
}
