//! Query facade used by the transports.
//!
//! [`CatalogQuery`] pulls the current snapshot from a shared
//! [`CatalogStore`], runs the predicate engine over it in snapshot order, and
//! slices the result. Facets always scan the whole snapshot.

use crate::catalog::{CatalogStore, ModelEntry, QueryError, Snapshot};
use crate::filter::FilterSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Validated `limit`/`offset` pair.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Listing response: snapshot metadata plus one page of matches.
///
/// `total_models` counts every match before pagination, not the page size.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsPage {
    pub last_updated: String,
    pub total_pages: u64,
    pub total_models: usize,
    pub models: Vec<ModelEntry>,
}

/// Entry point for lookups, filtered listings, and facets.
#[derive(Clone)]
pub struct CatalogQuery {
    store: Arc<CatalogStore>,
}

impl Pagination {
    /// Reject negative values instead of letting them clamp silently.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, QueryError> {
        let limit = limit.map(|value| non_negative("limit", value)).transpose()?;
        let offset = offset
            .map(|value| non_negative("offset", value))
            .transpose()?
            .unwrap_or(0);
        Ok(Self { limit, offset })
    }

    /// Restrict `items` to `[offset, offset + limit)`; out-of-range bounds clamp.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(items.len()),
            None => items.len(),
        };
        &items[start..end]
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, QueryError> {
    usize::try_from(value).map_err(|_| QueryError::InvalidArgument { name, value })
}

impl CatalogQuery {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// The full snapshot, unfiltered, metadata included.
    pub fn get_all(&self) -> Result<Arc<Snapshot>, QueryError> {
        Ok(self.store.snapshot()?)
    }

    /// Exact, case-sensitive lookup; the first entry wins on duplicate names.
    pub fn get_by_name(&self, name: &str) -> Result<Option<ModelEntry>, QueryError> {
        let snapshot = self.store.snapshot()?;
        Ok(snapshot.find(name).cloned())
    }

    /// Matching entries in snapshot order, paginated.
    pub fn filter(
        &self,
        spec: Option<&FilterSpec>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ModelEntry>, QueryError> {
        let page = Pagination::new(limit, offset)?;
        let snapshot = self.store.snapshot()?;
        let matched = filter_entries(&snapshot.entries, spec);
        Ok(page.apply(&matched).iter().copied().cloned().collect())
    }

    /// Listing with snapshot metadata and the pre-pagination match count.
    pub fn list(
        &self,
        spec: Option<&FilterSpec>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<ModelsPage, QueryError> {
        let page = Pagination::new(limit, offset)?;
        let snapshot = self.store.snapshot()?;
        let matched = filter_entries(&snapshot.entries, spec);
        Ok(ModelsPage {
            last_updated: snapshot.last_updated.clone(),
            total_pages: snapshot.total_pages,
            total_models: matched.len(),
            models: page.apply(&matched).iter().copied().cloned().collect(),
        })
    }

    /// Every capability tag in the catalog, sorted and deduplicated.
    pub fn unique_capabilities(&self) -> Result<Vec<String>, QueryError> {
        let snapshot = self.store.snapshot()?;
        Ok(distinct_sorted(
            snapshot.entries.iter().flat_map(|entry| &entry.capabilities),
        ))
    }

    /// Every size label in the catalog, sorted and deduplicated.
    pub fn unique_sizes(&self) -> Result<Vec<String>, QueryError> {
        let snapshot = self.store.snapshot()?;
        Ok(distinct_sorted(
            snapshot.entries.iter().flat_map(|entry| &entry.sizes),
        ))
    }

    /// Invalidate the cached snapshot; see [`CatalogStore::reload`].
    pub fn reload(&self) {
        self.store.reload();
    }
}

/// Entries matching `spec`, preserving input order. `None` keeps everything.
pub fn filter_entries<'a>(
    entries: &'a [ModelEntry],
    spec: Option<&FilterSpec>,
) -> Vec<&'a ModelEntry> {
    match spec {
        Some(spec) if !spec.is_empty() => {
            let predicate = spec.predicate();
            entries.iter().filter(|entry| predicate.matches(entry)).collect()
        }
        _ => entries.iter().collect(),
    }
}

fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
