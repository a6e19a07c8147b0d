//! Deserializable representation of the model catalog dataset.
//!
//! A [`Snapshot`] mirrors the JSON document (`last_updated`, `total_pages`,
//! `total_models`, `models`). Once loaded it is shared behind an `Arc` and
//! never mutated; a refresh publishes a new snapshot instead.

use crate::catalog::error::LoadError;
use crate::catalog::schema::DatasetSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One catalog record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
    pub sizes: Vec<String>,
    pub url: String,
}

/// The full dataset as of the last load.
///
/// `total_pages` and `total_models` are passed through from the source
/// document. `entries` is authoritative: `total_models` is informational and
/// may disagree with `entries.len()`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_updated: String,
    pub total_pages: u64,
    pub total_models: u64,
    #[serde(rename = "models")]
    pub entries: Vec<ModelEntry>,
}

impl ModelEntry {
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|cap| cap == capability)
    }

    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|candidate| candidate == size)
    }
}

impl Snapshot {
    /// Parse and validate a dataset document.
    ///
    /// `origin` labels the document in errors (usually a path).
    pub fn from_json_slice(bytes: &[u8], origin: &str) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_slice(bytes).map_err(|error| LoadError::Parse {
            origin: origin.to_string(),
            error,
        })?;
        Self::from_value(document, origin)
    }

    /// Validate an already-parsed document against the bundled schema and
    /// decode it.
    pub fn from_value(document: Value, origin: &str) -> Result<Self, LoadError> {
        DatasetSchema::shared()?.check(&document, origin)?;
        serde_json::from_value(document).map_err(|error| LoadError::Shape {
            origin: origin.to_string(),
            error,
        })
    }

    /// First entry whose name equals `name` exactly.
    pub fn find(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read, validate, and decode a dataset from disk.
pub fn load_snapshot_from_path(path: &Path) -> Result<Snapshot, LoadError> {
    let origin = path.display().to_string();
    let data = fs::read(path).map_err(|error| LoadError::Io {
        origin: origin.clone(),
        error,
    })?;
    Snapshot::from_json_slice(&data, &origin)
}
