//! The ambience engine: master-gain envelope state machine plus the worker
//! thread that owns the rodio graph.
//!
//! The envelope logic lives in [`EngineState`], a pure structure driven by
//! `(now, playing, volume)` snapshots that emits [`Action`]s. The worker
//! thread reads the shared levels on a fixed tick and interprets the actions
//! against two sinks (hiss bed, crackle impulses). Keeping the decision core
//! pure means every fade and idempotency property is testable without an
//! audio device.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamBuilder, Sink, Source};

use crate::config::AmbienceSettings;
use crate::transport::LevelsHandle;

use super::crackle::Crackle;
use super::noise::{PINK_BUFFER_LEN, pink_noise};

/// Worker tick; also the resolution of the gain envelope.
const TICK: Duration = Duration::from_millis(25);

/// Time constant for in-flight volume changes, matching a 100 ms
/// smoothing target rather than an instant (clicky) jump.
const GLIDE_TAU: f32 = 0.1;

const SAMPLE_RATE: u32 = 44_100;

enum AmbienceCmd {
    Quit,
}

/// What the worker must do to the audio graph after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Action {
    StartSources,
    StopSources,
    SetGain(f32),
}

struct Ramp {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
}

impl Ramp {
    fn value_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_sub(self.start).as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t.clamp(0.0, 1.0)
    }

    fn done(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

/// Pure envelope/transition state machine over Silent and Active.
pub(super) struct EngineState {
    fade_in: Duration,
    fade_out: Duration,
    sources_live: bool,
    last_playing: bool,
    last_now: Duration,
    gain: f32,
    ramp: Option<Ramp>,
    stopping: bool,
}

impl EngineState {
    pub(super) fn new(settings: &AmbienceSettings) -> Self {
        Self {
            fade_in: settings.fade_in(),
            fade_out: settings.fade_out(),
            sources_live: false,
            last_playing: false,
            last_now: Duration::ZERO,
            gain: 0.0,
            ramp: None,
            stopping: false,
        }
    }

    #[cfg(test)]
    pub(super) fn sources_live(&self) -> bool {
        self.sources_live
    }

    #[cfg(test)]
    pub(super) fn gain(&self) -> f32 {
        self.gain
    }

    /// Advance the state machine to `now` against the observed levels.
    pub(super) fn step(&mut self, now: Duration, playing: bool, volume: f32) -> Vec<Action> {
        let mut actions = Vec::new();
        let dt = now.saturating_sub(self.last_now);
        self.last_now = now;

        if playing && !self.last_playing {
            // Silent -> Active. A resume during a fade-out cancels the
            // pending ramp but must not start a second pair of sources.
            if !self.sources_live {
                self.sources_live = true;
                actions.push(Action::StartSources);
            }
            self.stopping = false;
            self.gain = 0.0;
            self.ramp = Some(Ramp {
                from: 0.0,
                to: volume,
                start: now,
                duration: self.fade_in,
            });
        } else if !playing && self.last_playing && self.sources_live {
            // Active -> Silent: ramp down, release sources once it lands.
            self.ramp = Some(Ramp {
                from: self.gain,
                to: 0.0,
                start: now,
                duration: self.fade_out,
            });
            self.stopping = true;
        }
        self.last_playing = playing;

        if let Some(ramp) = &self.ramp {
            self.gain = ramp.value_at(now);
            let done = ramp.done(now);
            actions.push(Action::SetGain(self.gain));
            if done {
                self.ramp = None;
                if self.stopping {
                    self.stopping = false;
                    self.sources_live = false;
                    actions.push(Action::StopSources);
                }
            }
        } else if playing && self.sources_live && (self.gain - volume).abs() > 1e-4 {
            // Volume moved while active: glide instead of jumping.
            let alpha = 1.0 - (-dt.as_secs_f32() / GLIDE_TAU).exp();
            self.gain += (volume - self.gain) * alpha;
            if (self.gain - volume).abs() < 1e-3 {
                self.gain = volume;
            }
            actions.push(Action::SetGain(self.gain));
        }

        actions
    }
}

/// Owns the surface-noise worker thread.
///
/// The engine reads the shared `LevelsHandle` each tick; no direct calls are
/// needed once it is running. If no audio output device exists it degrades
/// to permanent silence instead of failing.
pub struct AmbienceEngine {
    tx: Sender<AmbienceCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AmbienceEngine {
    pub fn spawn(levels: LevelsHandle, settings: AmbienceSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AmbienceCmd>();
        let join = thread::spawn(move || run_worker(rx, levels, settings));
        Self {
            tx,
            join: Mutex::new(Some(join)),
        }
    }

    /// Stop the worker, releasing any live sources.
    pub fn shutdown(&self) {
        let _ = self.tx.send(AmbienceCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for AmbienceEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(rx: Receiver<AmbienceCmd>, levels: LevelsHandle, settings: AmbienceSettings) {
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(mut s) => {
            // rodio logs to stderr when OutputStream is dropped; keep quiet.
            s.log_on_drop(false);
            Some(s)
        }
        Err(e) => {
            log::warn!("no audio output for ambience, staying silent: {e}");
            None
        }
    };

    let mut hiss: Option<Sink> = None;
    let mut crackle: Option<Sink> = None;
    let mut state = EngineState::new(&settings);
    let epoch = Instant::now();

    loop {
        match rx.recv_timeout(TICK) {
            Ok(AmbienceCmd::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let (playing, volume) = match levels.lock() {
            Ok(l) => (l.playing, l.volume),
            Err(_) => break,
        };

        for action in state.step(epoch.elapsed(), playing, volume) {
            match action {
                Action::StartSources => {
                    let Some(stream) = stream.as_ref() else {
                        continue;
                    };
                    let bed = SamplesBuffer::new(1, SAMPLE_RATE, pink_noise(PINK_BUFFER_LEN))
                        .repeat_infinite()
                        .low_pass(settings.lowpass_hz)
                        .amplify(settings.noise_gain);
                    let hiss_sink = Sink::connect_new(stream.mixer());
                    hiss_sink.set_volume(0.0);
                    hiss_sink.append(bed);

                    let crackle_sink = Sink::connect_new(stream.mixer());
                    crackle_sink.set_volume(0.0);
                    crackle_sink.append(Crackle::new(settings.crackle_gain));

                    hiss = Some(hiss_sink);
                    crackle = Some(crackle_sink);
                }
                Action::StopSources => {
                    if let Some(s) = hiss.take() {
                        s.stop();
                    }
                    if let Some(s) = crackle.take() {
                        s.stop();
                    }
                }
                Action::SetGain(g) => {
                    if let Some(s) = &hiss {
                        s.set_volume(g);
                    }
                    if let Some(s) = &crackle {
                        s.set_volume(g);
                    }
                }
            }
        }
    }

    // Teardown: nothing may keep playing after the engine goes away.
    if let Some(s) = hiss.take() {
        s.stop();
    }
    if let Some(s) = crackle.take() {
        s.stop();
    }
}
