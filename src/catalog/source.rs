//! Where catalog documents come from.
//!
//! The store only needs raw bytes and a label for error messages, so sources
//! stay trivial and tests can swap in an in-memory document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Provider of the raw dataset document.
pub trait DatasetSource: Send + Sync {
    /// Human-readable label used in load errors and logs.
    fn describe(&self) -> String;

    /// Read the current document bytes.
    fn read(&self) -> io::Result<Vec<u8>>;
}

/// Dataset stored as a JSON file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Dataset held in memory, e.g. bundled into a binary or built by a test.
#[derive(Clone, Debug)]
pub struct StaticSource {
    label: String,
    document: Vec<u8>,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, document: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            document: document.into(),
        }
    }

    /// Serialize `value` as the document.
    pub fn from_value(label: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::new(label, value.to_string())
    }
}

impl DatasetSource for StaticSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.document.clone())
    }
}
