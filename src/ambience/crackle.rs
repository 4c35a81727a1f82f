//! Sparse impulse source simulating dust pops on a record.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rodio::{ChannelCount, SampleRate, Source};

/// Per-sample probability of an impulse. At 44.1 kHz this lands a couple of
/// dozen audible pops per second-of-samples, most far below full amplitude.
const IMPULSE_PROBABILITY: f64 = 0.0006;

const CHANNELS: ChannelCount = 1;
const SAMPLE_RATE: SampleRate = 44_100;

/// Infinite mono source of random-signed impulses scaled by `gain`.
///
/// Each output sample draws once: on a hit it emits a single sample of
/// random amplitude in `[-gain, gain]`, otherwise silence.
pub struct Crackle {
    rng: StdRng,
    gain: f32,
}

impl Crackle {
    pub fn new(gain: f32) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            gain,
        }
    }
}

impl Iterator for Crackle {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.rng.random_bool(IMPULSE_PROBABILITY) {
            Some(self.rng.random_range(-1.0..1.0f32) * self.gain)
        } else {
            Some(0.0)
        }
    }
}

impl Source for Crackle {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> ChannelCount {
        CHANNELS
    }

    fn sample_rate(&self) -> SampleRate {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
