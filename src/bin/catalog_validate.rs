//! Validate a model catalog dataset before publishing it.
//!
//! Usage:
//!   catalog-validate --file data/models.json
//!   catalog-validate < models.json
//!   catalog-validate --file models.json --schema schema/model_catalog.schema.json
//!
//! Prints a one-line summary on success. Schema violations are listed on
//! stderr and the process exits non-zero.

use anyhow::{Context, Result, bail};
use clap::Parser;
use model_catalog::logging::init_tracing;
use model_catalog::{DatasetSchema, Snapshot};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, stdin};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "catalog-validate")]
#[command(about = "Validate a model catalog dataset")]
struct Cli {
    /// Dataset file; reads stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Additional schema to check the document against.
    #[arg(long)]
    schema: Option<PathBuf>,
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
    let (bytes, origin) = read_input(cli.file.as_ref())?;

    let document: Value =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {origin}"))?;
    if let Some(schema_path) = &cli.schema {
        DatasetSchema::from_path(schema_path)?.check(&document, &origin)?;
    }
    let snapshot = Snapshot::from_value(document, &origin)?;

    if snapshot.total_models != snapshot.len() as u64 {
        warn!(
            declared = snapshot.total_models,
            actual = snapshot.len(),
            "total_models does not match the number of models"
        );
    }
    let duplicates = duplicate_names(&snapshot);
    if !duplicates.is_empty() {
        warn!(
            names = ?duplicates,
            "duplicate model names; lookups return the first entry"
        );
    }

    println!(
        "{origin}: ok ({} models, last_updated {}, total_pages {})",
        snapshot.len(),
        snapshot.last_updated,
        snapshot.total_pages
    );
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<(Vec<u8>, String)> {
    match file {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("reading dataset {}", path.display()))?;
            Ok((bytes, path.display().to_string()))
        }
        None => {
            let mut buf = Vec::new();
            stdin()
                .read_to_end(&mut buf)
                .context("reading dataset from stdin")?;
            if buf.iter().all(u8::is_ascii_whitespace) {
                bail!("No input provided on stdin");
            }
            Ok((buf, "<stdin>".to_string()))
        }
    }
}

fn duplicate_names(snapshot: &Snapshot) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for entry in &snapshot.entries {
        if !seen.insert(entry.name.as_str()) {
            duplicates.insert(entry.name.as_str());
        }
    }
    duplicates.into_iter().collect()
}
