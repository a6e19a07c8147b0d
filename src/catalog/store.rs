//! Load-once cache for the catalog snapshot.
//!
//! The store owns a [`DatasetSource`] and publishes at most one
//! `Arc<Snapshot>` at a time. Readers grab the current `Arc` without locking;
//! `reload` swaps the published value out wholesale, so a reader either holds
//! the old snapshot in full or sees the new one in full.

use crate::catalog::error::LoadError;
use crate::catalog::model::Snapshot;
use crate::catalog::source::{DatasetSource, FileSource};
use arc_swap::ArcSwapOption;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Cached, replaceable view of one dataset source.
pub struct CatalogStore {
    source: Box<dyn DatasetSource>,
    current: ArcSwapOption<Snapshot>,
    // Serializes reads of the source; readers of `current` never take it.
    load_gate: Mutex<()>,
}

impl CatalogStore {
    pub fn new(source: impl DatasetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: ArcSwapOption::empty(),
            load_gate: Mutex::new(()),
        }
    }

    /// Store backed by a JSON file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    /// Label of the underlying source.
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Read the source now and publish the result.
    ///
    /// Unlike [`CatalogStore::snapshot`] this always hits the source. On
    /// failure the previously published snapshot (if any) is left untouched.
    pub fn load(&self) -> Result<Arc<Snapshot>, LoadError> {
        let _gate = self.load_gate.lock().unwrap_or_else(|err| err.into_inner());
        self.load_locked()
    }

    /// The cached snapshot, loading it on first use.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, LoadError> {
        if let Some(snapshot) = self.current.load_full() {
            return Ok(snapshot);
        }

        let _gate = self.load_gate.lock().unwrap_or_else(|err| err.into_inner());
        // Another caller may have finished loading while we waited.
        if let Some(snapshot) = self.current.load_full() {
            return Ok(snapshot);
        }
        self.load_locked()
    }

    /// Drop the cached snapshot; the next `snapshot()` reads the source again.
    ///
    /// Waits for an in-flight load so its result cannot outlive the
    /// invalidation.
    pub fn reload(&self) {
        let _gate = self.load_gate.lock().unwrap_or_else(|err| err.into_inner());
        let previous = self.current.swap(None);
        debug!(
            source = %self.source.describe(),
            was_loaded = previous.is_some(),
            "model catalog invalidated"
        );
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    fn load_locked(&self) -> Result<Arc<Snapshot>, LoadError> {
        let origin = self.source.describe();
        let bytes = self.source.read().map_err(|error| LoadError::Io {
            origin: origin.clone(),
            error,
        })?;
        let snapshot = match Snapshot::from_json_slice(&bytes, &origin) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(err) => {
                warn!(source = %origin, error = %err, "model catalog load failed");
                return Err(err);
            }
        };

        if snapshot.total_models != snapshot.len() as u64 {
            debug!(
                source = %origin,
                declared = snapshot.total_models,
                actual = snapshot.len(),
                "total_models disagrees with entry count"
            );
        }
        info!(
            source = %origin,
            models = snapshot.len(),
            last_updated = %snapshot.last_updated,
            "model catalog loaded"
        );

        self.current.store(Some(Arc::clone(&snapshot)));
        Ok(snapshot)
    }
}
