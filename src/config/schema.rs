use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/platter/config.toml` or `~/.config/platter/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PLATTER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub ambience: AmbienceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback: PlaybackSettings::default(),
            ambience: AmbienceSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume applied to the deck on startup, in `[0, 1]`.
    pub initial_volume: f32,
    /// `prev` restarts the current track instead of moving back when more
    /// than this many seconds have already played.
    pub restart_threshold_secs: u64,
}

impl PlaybackSettings {
    pub fn restart_threshold(&self) -> Duration {
        Duration::from_secs(self.restart_threshold_secs)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            restart_threshold_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AmbienceSettings {
    /// Whether the vinyl surface-noise bed runs at all.
    pub enabled: bool,
    /// Gain of the continuous hiss bed, in `[0, 1]`.
    pub noise_gain: f32,
    /// Gain of the sparse crackle impulses, in `[0, 1]`.
    pub crackle_gain: f32,
    /// Fade-in when playback starts (milliseconds). Long on purpose: it
    /// emulates a stylus settling onto the record surface.
    pub fade_in_ms: u64,
    /// Fade-out when playback stops (milliseconds).
    pub fade_out_ms: u64,
    /// Lowpass cutoff applied to the hiss bed to soften the top end.
    pub lowpass_hz: u32,
}

impl AmbienceSettings {
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

impl Default for AmbienceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            noise_gain: 0.06,
            crackle_gain: 0.08,
            fade_in_ms: 1500,
            fade_out_ms: 500,
            lowpass_hz: 8000,
        }
    }
}
