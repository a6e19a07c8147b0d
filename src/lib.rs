//! Shared library for the model catalog query helpers.
//!
//! The crate holds one immutable snapshot of model metadata (name,
//! description, capability tags, size variants, URL) and answers exact
//! lookups, filtered and paginated listings, and facet queries over it.
//! Public functions here form the contract the binaries depend on: dataset
//! path resolution, store construction, and the query facade.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod filter;
pub mod logging;
pub mod query;
pub mod request;

pub use catalog::{
    CatalogStore, DatasetSchema, DatasetSource, FileSource, LoadError, ModelEntry, QueryError,
    Snapshot, StaticSource, load_snapshot_from_path,
};
pub use filter::{FilterSpec, Predicate};
pub use query::{CatalogQuery, ModelsPage, Pagination, filter_entries};
pub use request::{Payload, Request, Response, ServeStats, dispatch, handle_line, serve_lines};

/// Dataset location relative to the repository root.
pub const DEFAULT_DATASET: &str = "data/models.json";
const SCHEMA_SENTINEL: &str = "schema/model_catalog.schema.json";

/// Environment variable naming the dataset file directly.
pub const DATASET_ENV: &str = "MODEL_CATALOG_PATH";
/// Environment variable naming the repository root.
pub const ROOT_ENV: &str = "MODEL_CATALOG_ROOT";

fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(SCHEMA_SENTINEL).is_file() && candidate.join(DEFAULT_DATASET).is_file()
}

fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository root that holds the bundled dataset.
///
/// Search order: `MODEL_CATALOG_ROOT` if it points at a real checkout, then
/// the directories above the current executable, then the build-time hint.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("MODEL_CATALOG_ROOT_HINT") {
        if let Some(root) = repo_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate the model catalog repository root. Set {ROOT_ENV} to the checkout or {DATASET_ENV} to a dataset file."
    );
}

/// `data/models.json` under `repo_root`.
pub fn default_dataset_path(repo_root: &Path) -> PathBuf {
    repo_root.join(DEFAULT_DATASET)
}

/// Pick the dataset file: explicit flag, then `MODEL_CATALOG_PATH`, then the
/// repository default.
pub fn resolve_dataset_path(cli_override: Option<&Path>) -> Result<PathBuf> {
    let env_override = env::var_os(DATASET_ENV).map(PathBuf::from);
    choose_dataset_path(cli_override, env_override.as_deref(), find_repo_root)
}

fn choose_dataset_path(
    cli_override: Option<&Path>,
    env_override: Option<&Path>,
    repo_root: impl FnOnce() -> Result<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        if path.as_os_str().is_empty() {
            bail!("dataset path must not be empty");
        }
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_override.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    Ok(default_dataset_path(&repo_root()?))
}

/// Split comma- or whitespace-delimited lists (`--capability chat,tools`).
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
