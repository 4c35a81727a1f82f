//! Catalog data types: `Track`, `Composer` and their supporting pieces.

use std::time::Duration;

use serde::Deserialize;

/// A string carried in both Chinese and English, as the catalog ships it.
#[derive(Debug, Clone, Deserialize)]
pub struct BilingualText {
    pub zh: String,
    pub en: String,
}

/// Musical-period tag shared by tracks and composers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Baroque,
    Classical,
    Romantic,
    Impressionist,
    Modern,
}

impl Category {
    /// Rough date range for the period, for display purposes.
    pub fn period_label(self) -> &'static str {
        match self {
            Category::Baroque => "1600-1750",
            Category::Classical => "1750-1820",
            Category::Romantic => "1820-1900",
            Category::Impressionist => "1875-1925",
            Category::Modern => "1900-",
        }
    }
}

/// Free-text background material attached to a track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackHistory {
    pub background: String,
    pub context: String,
    pub analysis: Option<String>,
}

/// One catalog entry. Immutable once loaded; the player holds it behind
/// an `Arc` and never copies or mutates it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: BilingualText,
    /// Foreign key into the composer list.
    pub composer: String,
    pub opus: Option<String>,
    pub year: Option<i32>,
    /// Duration in seconds as the catalog states it. Only a fallback:
    /// once the file's real metadata is probed that value wins.
    pub duration: f64,
    pub category: Category,
    pub audio_url: String,
    pub cover_image: Option<String>,
    pub history: TrackHistory,
}

impl Track {
    /// Catalog duration as a `Duration`. Non-finite or negative values
    /// collapse to zero rather than panicking.
    pub fn catalog_duration(&self) -> Duration {
        if self.duration.is_finite() && self.duration > 0.0 {
            Duration::from_secs_f64(self.duration)
        } else {
            Duration::ZERO
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composer {
    pub id: String,
    pub name: BilingualText,
    pub period: Category,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    pub nationality: String,
    pub portrait: Option<String>,
    pub biography: String,
    pub famous_works: Vec<String>,
}

/// The whole catalog file: ordered tracks plus the composer list they
/// reference. Track order is playlist order.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub composers: Vec<Composer>,
}

impl Catalog {
    /// Resolve a track's composer reference.
    pub fn composer_for(&self, track: &Track) -> Option<&Composer> {
        self.composers.iter().find(|c| c.id == track.composer)
    }
}
