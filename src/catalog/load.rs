//! Catalog loading and validation.
//!
//! `Catalog::load` reads one JSON file and checks referential integrity
//! before the player ever sees it: duplicate ids and dangling composer
//! references are load errors, not runtime surprises.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::model::Catalog;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id in catalog: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("track {track} references unknown composer {composer}")]
    UnknownComposer { track: String, composer: String },
}

impl Catalog {
    /// Load and validate a catalog from `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog: Catalog = serde_json::from_reader(BufReader::new(file))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a catalog from an in-memory JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut track_ids = HashSet::new();
        for t in &self.tracks {
            if !track_ids.insert(t.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "track",
                    id: t.id.clone(),
                });
            }
        }

        let mut composer_ids = HashSet::new();
        for c in &self.composers {
            if !composer_ids.insert(c.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "composer",
                    id: c.id.clone(),
                });
            }
        }

        for t in &self.tracks {
            if !composer_ids.contains(t.composer.as_str()) {
                return Err(CatalogError::UnknownComposer {
                    track: t.id.clone(),
                    composer: t.composer.clone(),
                });
            }
        }

        Ok(())
    }
}
