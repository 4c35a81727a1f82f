//! Pink-noise generation for the hiss bed.

use rand::Rng;

/// Default buffer length for the looped hiss bed. Several multiples of a few
/// thousand samples, long enough that looping it does not read as a pattern.
pub const PINK_BUFFER_LEN: usize = 4096 * 4;

/// Generate `len` samples of pink noise in `[-1, 1]`.
///
/// White noise is run through a 6-pole recursive coloring filter (Paul
/// Kellet's economy approximation of a -3dB/octave spectrum) and scaled down
/// to a safe amplitude. Randomness is intentional; the only deterministic
/// property is the output length.
pub fn pink_noise(len: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    let mut out = Vec::with_capacity(len);

    let (mut b0, mut b1, mut b2, mut b3, mut b4, mut b5, mut b6) =
        (0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32);

    for _ in 0..len {
        let white: f32 = rng.random_range(-1.0..1.0);
        b0 = 0.99886 * b0 + white * 0.0555179;
        b1 = 0.99332 * b1 + white * 0.0750759;
        b2 = 0.96900 * b2 + white * 0.1538520;
        b3 = 0.86650 * b3 + white * 0.3104856;
        b4 = 0.55000 * b4 + white * 0.5329522;
        b5 = -0.7616 * b5 - white * 0.0168980;
        let sample = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362) * 0.11;
        b6 = white * 0.115926;
        out.push(sample.clamp(-1.0, 1.0));
    }

    out
}
