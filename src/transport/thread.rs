//! The deck worker thread: owns the output stream and the current sink,
//! keeps position accounting and reports lifecycle events.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::{create_sink_at, probe_duration};
use super::types::{DeckCmd, DeckEvent};

/// How often the worker reports progress and checks for track end.
const TICK: Duration = Duration::from_millis(250);

pub(super) fn spawn_deck_thread(
    rx: Receiver<DeckCmd>,
    events: Sender<DeckEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream: Option<OutputStream> = match OutputStreamBuilder::open_default_stream() {
            Ok(mut s) => {
                // rodio logs to stderr when OutputStream is dropped; keep quiet.
                s.log_on_drop(false);
                Some(s)
            }
            Err(e) => {
                // No device: the deck stays inert and every transport
                // operation degrades to a logged no-op.
                log::warn!("no audio output device, playback disabled: {e}");
                None
            }
        };

        let mut resource: Option<PathBuf> = None;
        let mut sink: Option<Sink> = None;
        let mut playing = false;

        // Volume and mute are coupled only at the sink: the stored volume
        // survives a mute because muting just drives the sink to zero.
        let mut volume: f32 = 1.0;
        let mut muted = false;

        // Position accounting: wall-clock while playing plus what had
        // accumulated before the last pause/seek.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let effective = |volume: f32, muted: bool| if muted { 0.0 } else { volume };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(DeckCmd::Load(url)) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    playing = false;
                    started_at = None;
                    accumulated = Duration::ZERO;

                    let path = PathBuf::from(&url);
                    if let Some(d) = probe_duration(&path) {
                        let _ = events.send(DeckEvent::MetadataLoaded(d));
                    }

                    if let Some(stream) = stream.as_ref() {
                        if let Some(new_sink) = create_sink_at(stream, &path, Duration::ZERO) {
                            new_sink.set_volume(effective(volume, muted));
                            sink = Some(new_sink);
                        }
                    }
                    resource = Some(path);
                }

                Ok(DeckCmd::Play) => {
                    // A play with nothing loaded is rejected silently; the
                    // playing flag only flips when the sink really starts.
                    if let Some(s) = &sink {
                        if !playing {
                            s.play();
                            playing = true;
                            started_at = Some(Instant::now());
                            let _ = events.send(DeckEvent::Play);
                        }
                    } else {
                        log::debug!("play ignored: no resource loaded");
                    }
                }

                Ok(DeckCmd::Pause) => {
                    if let Some(s) = &sink {
                        if playing {
                            s.pause();
                            playing = false;
                            if let Some(st) = started_at.take() {
                                accumulated += st.elapsed();
                            }
                            let _ = events.send(DeckEvent::Pause);
                        }
                    }
                }

                Ok(DeckCmd::Seek(pos)) => {
                    // Scrubbing: rebuild the sink and skip into the file.
                    let Some(path) = resource.clone() else {
                        continue;
                    };
                    let Some(stream) = stream.as_ref() else {
                        continue;
                    };
                    if let Some(s) = sink.take() {
                        s.stop();
                    }

                    if let Some(new_sink) = create_sink_at(stream, &path, pos) {
                        new_sink.set_volume(effective(volume, muted));
                        if playing {
                            new_sink.play();
                            started_at = Some(Instant::now());
                        } else {
                            started_at = None;
                        }
                        sink = Some(new_sink);
                        accumulated = pos;
                        let _ = events.send(DeckEvent::TimeUpdate(pos));
                    } else {
                        playing = false;
                        started_at = None;
                    }
                }

                Ok(DeckCmd::SetVolume(v)) => {
                    volume = v;
                    if let Some(s) = &sink {
                        s.set_volume(effective(volume, muted));
                    }
                }

                Ok(DeckCmd::SetMuted(m)) => {
                    muted = m;
                    if let Some(s) = &sink {
                        s.set_volume(effective(volume, muted));
                    }
                }

                Ok(DeckCmd::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    if !playing {
                        continue;
                    }
                    let Some(s) = &sink else {
                        continue;
                    };

                    if s.empty() {
                        // Natural end of the resource.
                        playing = false;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        sink = None;
                        let _ = events.send(DeckEvent::Ended);
                    } else {
                        let pos =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        let _ = events.send(DeckEvent::TimeUpdate(pos));
                    }
                }
            }
        }
    })
}
