//! Line-oriented query service over stdin/stdout.
//!
//! Reads NDJSON requests (see `model_catalog::request`) and writes one JSON
//! response per line, so the catalog can sit behind any process-spawning
//! transport:
//!
//!   printf '{"query":"sizes"}\n' | catalog-serve --dataset data/models.json
//!
//! The dataset is loaded before the first request; a broken dataset aborts
//! startup with a non-zero exit. Per-request failures are reported inline.

use anyhow::{Context, Result};
use clap::Parser;
use model_catalog::logging::init_tracing;
use model_catalog::{CatalogQuery, CatalogStore, resolve_dataset_path, serve_lines};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalog-serve")]
#[command(about = "Answer NDJSON catalog queries on stdin, one JSON response per line")]
struct Cli {
    /// Dataset file (or set MODEL_CATALOG_PATH).
    #[arg(long)]
    dataset: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let dataset = resolve_dataset_path(cli.dataset.as_deref())?;

    let store = Arc::new(CatalogStore::from_path(&dataset));
    let snapshot = store
        .load()
        .with_context(|| format!("loading dataset {}", dataset.display()))?;
    info!(
        dataset = %dataset.display(),
        models = snapshot.len(),
        "catalog-serve ready"
    );

    let query = CatalogQuery::new(store);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = serve_lines(&query, stdin.lock(), stdout.lock()).context("serving requests")?;
    info!(
        requests = stats.requests,
        failures = stats.failures,
        "input closed"
    );
    Ok(())
}
