//! The deck seam: one playable resource at a time, driven imperatively,
//! reporting back through lifecycle events.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_deck_thread;
use super::types::{DeckCmd, DeckEvent};

/// The media element of the player. Exactly one resource is loaded at a
/// time; every operation is fire-and-forget and failures are swallowed by
/// the implementation (a rejected play never emits `DeckEvent::Play`).
pub trait Deck {
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
}

/// Production deck backed by a rodio worker thread.
pub struct RodioDeck {
    tx: Sender<DeckCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioDeck {
    /// Spawn the worker and return the deck plus the event stream the
    /// transport controller must drain.
    pub fn spawn() -> (Self, Receiver<DeckEvent>) {
        let (tx, rx) = mpsc::channel::<DeckCmd>();
        let (event_tx, event_rx) = mpsc::channel::<DeckEvent>();
        let join = spawn_deck_thread(rx, event_tx);
        (
            Self {
                tx,
                join: Mutex::new(Some(join)),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: DeckCmd) {
        // The worker outlives every sender except during teardown, where
        // dropped commands are harmless.
        let _ = self.tx.send(cmd);
    }
}

impl Deck for RodioDeck {
    fn load(&mut self, url: &str) {
        self.send(DeckCmd::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.send(DeckCmd::Play);
    }

    fn pause(&mut self) {
        self.send(DeckCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(DeckCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(DeckCmd::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.send(DeckCmd::SetMuted(muted));
    }
}

impl Drop for RodioDeck {
    fn drop(&mut self) {
        let _ = self.tx.send(DeckCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
