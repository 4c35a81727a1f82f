use std::time::Duration;

use super::crackle::Crackle;
use super::engine::{Action, EngineState};
use super::noise::{PINK_BUFFER_LEN, pink_noise};
use crate::config::AmbienceSettings;

fn settings() -> AmbienceSettings {
    AmbienceSettings::default()
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn pink_noise_stays_within_unit_range() {
    let buf = pink_noise(PINK_BUFFER_LEN);
    assert_eq!(buf.len(), PINK_BUFFER_LEN);
    assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn pink_noise_length_is_deterministic() {
    assert_eq!(pink_noise(0).len(), 0);
    assert_eq!(pink_noise(1).len(), 1);
    assert_eq!(pink_noise(12_345).len(), 12_345);
}

#[test]
fn pink_noise_is_not_silence() {
    let buf = pink_noise(8192);
    let energy: f32 = buf.iter().map(|s| s * s).sum();
    assert!(energy > 0.0);
}

#[test]
fn crackle_is_sparse_and_bounded() {
    let gain = 0.08;
    let samples: Vec<f32> = Crackle::new(gain).take(44_100).collect();

    let hits = samples.iter().filter(|s| **s != 0.0).count();
    // Expected ~26 impulses per 44100 draws; leave generous slack.
    assert!(hits > 0, "no impulses in a full second of samples");
    assert!(hits < 1_000, "far too many impulses: {hits}");
    assert!(samples.iter().all(|s| s.abs() <= gain));
}

#[test]
fn fade_in_ramps_from_zero_to_target_volume() {
    let mut state = EngineState::new(&settings());

    let actions = state.step(ms(0), true, 0.7);
    assert!(actions.contains(&Action::StartSources));
    assert!(state.sources_live());
    assert_eq!(state.gain(), 0.0);

    // Halfway through the 1500 ms fade-in.
    state.step(ms(750), true, 0.7);
    assert!((state.gain() - 0.35).abs() < 1e-3);

    // At (and past) the fade-in duration the target is reached.
    state.step(ms(1500), true, 0.7);
    assert!((state.gain() - 0.7).abs() < 1e-6);
    state.step(ms(2000), true, 0.7);
    assert!((state.gain() - 0.7).abs() < 1e-6);
}

#[test]
fn fade_out_reaches_zero_and_releases_sources() {
    let mut state = EngineState::new(&settings());
    state.step(ms(0), true, 0.7);
    state.step(ms(1500), true, 0.7);

    // Pause: 500 ms ramp down, then both sources released.
    state.step(ms(2000), false, 0.7);
    let actions = state.step(ms(2500), false, 0.7);
    assert!((state.gain() - 0.0).abs() < 1e-6);
    assert!(actions.contains(&Action::StopSources));
    assert!(!state.sources_live());

    // Nothing more happens once silent.
    assert!(state.step(ms(3000), false, 0.7).is_empty());
}

#[test]
fn rapid_resume_does_not_double_start_sources() {
    let mut state = EngineState::new(&settings());
    state.step(ms(0), true, 0.7);
    state.step(ms(1500), true, 0.7);

    // Pause, then resume while the fade-out is still in flight.
    state.step(ms(2000), false, 0.7);
    let actions = state.step(ms(2100), true, 0.7);

    assert!(
        !actions.contains(&Action::StartSources),
        "second Active entry must not start another source pair"
    );
    assert!(state.sources_live());

    // The pending fade-out was canceled; the new fade-in lands on target
    // and no release ever happens.
    let actions = state.step(ms(2100 + 1500), true, 0.7);
    assert!((state.gain() - 0.7).abs() < 1e-6);
    assert!(!actions.contains(&Action::StopSources));
}

#[test]
fn resume_after_full_stop_starts_fresh_sources() {
    let mut state = EngineState::new(&settings());
    state.step(ms(0), true, 0.7);
    state.step(ms(1500), true, 0.7);
    state.step(ms(2000), false, 0.7);
    state.step(ms(2500), false, 0.7);
    assert!(!state.sources_live());

    let actions = state.step(ms(5000), true, 0.7);
    assert!(actions.contains(&Action::StartSources));
}

#[test]
fn volume_retarget_glides_instead_of_jumping() {
    let mut state = EngineState::new(&settings());
    state.step(ms(0), true, 0.8);
    state.step(ms(1500), true, 0.8);
    assert!((state.gain() - 0.8).abs() < 1e-6);

    // Drop the volume; one tick later the gain has moved but not snapped.
    let actions = state.step(ms(1525), true, 0.2);
    assert_eq!(actions.len(), 1);
    let g = state.gain();
    assert!(g < 0.8 && g > 0.2, "gain should be mid-glide, got {g}");

    // It keeps converging monotonically.
    let mut prev = g;
    for i in 1..40 {
        state.step(ms(1525 + i * 25), true, 0.2);
        assert!(state.gain() <= prev + 1e-6);
        prev = state.gain();
    }
    assert!((state.gain() - 0.2).abs() < 1e-3);
}

#[test]
fn fade_in_restarts_from_zero_on_each_activation() {
    let mut state = EngineState::new(&settings());
    state.step(ms(0), true, 0.7);
    state.step(ms(1500), true, 0.7);
    state.step(ms(2000), false, 0.7);
    state.step(ms(2500), false, 0.7);

    // New activation starts its ramp at zero, not at the old gain.
    state.step(ms(4000), true, 0.7);
    assert_eq!(state.gain(), 0.0);
    state.step(ms(4750), true, 0.7);
    assert!((state.gain() - 0.35).abs() < 1e-3);
}
