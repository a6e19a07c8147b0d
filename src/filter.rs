//! Predicate engine: turns a [`FilterSpec`] into a per-entry match decision.
//!
//! Distinct criteria combine with AND. Within a criterion:
//! - `name_contains` / `description_contains`: case-insensitive substring.
//! - `capabilities`: the entry must carry ALL listed tags.
//! - `sizes`: the entry must carry AT LEAST ONE listed size.
//!
//! Absent criteria, and empty `capabilities`/`sizes` lists, impose no
//! constraint. Tag and size comparisons are exact string equality.

use crate::catalog::ModelEntry;
use serde::{Deserialize, Serialize};

/// Caller-supplied filter criteria. Every field is optional.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn description_contains(mut self, needle: impl Into<String>) -> Self {
        self.description_contains = Some(needle.into());
        self
    }

    pub fn capabilities<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(required.into_iter().map(Into::into).collect());
        self
    }

    pub fn sizes<I, S>(mut self, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = Some(accepted.into_iter().map(Into::into).collect());
        self
    }

    /// True when the spec constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.name_contains.is_none()
            && self.description_contains.is_none()
            && self.capabilities.as_deref().is_none_or(<[String]>::is_empty)
            && self.sizes.as_deref().is_none_or(<[String]>::is_empty)
    }

    /// Prepare the spec for repeated evaluation (lowercases needles once).
    pub fn predicate(&self) -> Predicate<'_> {
        Predicate {
            name: self.name_contains.as_deref().map(str::to_lowercase),
            description: self.description_contains.as_deref().map(str::to_lowercase),
            capabilities: self.capabilities.as_deref().unwrap_or_default(),
            sizes: self.sizes.as_deref().unwrap_or_default(),
        }
    }

    pub fn matches(&self, entry: &ModelEntry) -> bool {
        self.predicate().matches(entry)
    }
}

/// A [`FilterSpec`] ready to test many entries.
#[derive(Debug)]
pub struct Predicate<'a> {
    name: Option<String>,
    description: Option<String>,
    capabilities: &'a [String],
    sizes: &'a [String],
}

impl Predicate<'_> {
    pub fn matches(&self, entry: &ModelEntry) -> bool {
        self.name
            .as_deref()
            .is_none_or(|needle| contains_folded(&entry.name, needle))
            && self
                .description
                .as_deref()
                .is_none_or(|needle| contains_folded(&entry.description, needle))
            && has_all(&entry.capabilities, self.capabilities)
            && has_any(&entry.sizes, self.sizes)
    }
}

/// Convenience for one-off checks; `None` matches everything.
pub fn matches(entry: &ModelEntry, spec: Option<&FilterSpec>) -> bool {
    spec.is_none_or(|spec| spec.matches(entry))
}

// `needle` is already lowercased.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

fn has_all(have: &[String], required: &[String]) -> bool {
    required.iter().all(|tag| have.contains(tag))
}

// An empty `accepted` list means the criterion is absent.
fn has_any(have: &[String], accepted: &[String]) -> bool {
    accepted.is_empty() || accepted.iter().any(|size| have.contains(size))
}
