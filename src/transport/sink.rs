//! Utilities for creating `rodio` sinks from audio resources.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

/// Create a paused `Sink` for the resource at `path` starting at `start_at`.
///
/// Returns `None` (after logging) when the file cannot be opened or decoded;
/// a missing resource is a silent stall, not a crash.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Option<Sink> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("failed to open {path:?}: {e}");
            return None;
        }
    };

    let source = match Decoder::new(BufReader::new(file)) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("failed to decode {path:?}: {e}");
            return None;
        }
    };

    let sink = Sink::connect_new(handle.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Some(sink)
}

/// Probe the real duration of the resource via its tags/properties.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    use lofty::file::AudioFile;
    use lofty::probe::Probe;

    let tagged = Probe::open(path)
        .and_then(|p| p.read())
        .map_err(|e| log::debug!("no readable metadata for {path:?}: {e}"))
        .ok()?;
    Some(tagged.properties().duration())
}
