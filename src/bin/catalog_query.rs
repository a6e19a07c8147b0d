//! One-shot query CLI over the model catalog.
//!
//! Usage:
//!   catalog-query models --name-contains qwen --capability tools --limit 5
//!   catalog-query model llama3.1
//!   catalog-query capabilities
//!   catalog-query sizes --dataset data/models.json
//!
//! Results are printed as JSON on stdout (`null` for an unknown model name);
//! diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use model_catalog::logging::init_tracing;
use model_catalog::{CatalogQuery, CatalogStore, FilterSpec, resolve_dataset_path, split_list};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "catalog-query")]
#[command(about = "Query the model catalog and print JSON")]
struct Cli {
    /// Dataset file (defaults to MODEL_CATALOG_PATH, then data/models.json).
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: QueryCommand,
}

#[derive(Subcommand, Debug)]
enum QueryCommand {
    /// List models matching the filter, with snapshot metadata.
    Models(ModelsArgs),
    /// Look up one model by exact name.
    Model { name: String },
    /// Distinct capability tags across the catalog.
    Capabilities,
    /// Distinct size labels across the catalog.
    Sizes,
}

#[derive(Args, Debug)]
struct ModelsArgs {
    /// Case-insensitive substring of the model name.
    #[arg(long)]
    name_contains: Option<String>,
    /// Case-insensitive substring of the description.
    #[arg(long)]
    description_contains: Option<String>,
    /// Required capability; repeat or comma-separate. All must match.
    #[arg(long = "capability")]
    capabilities: Vec<String>,
    /// Accepted size; repeat or comma-separate. Any may match.
    #[arg(long = "size")]
    sizes: Vec<String>,
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,
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
    let query = CatalogQuery::new(Arc::new(CatalogStore::from_path(dataset)));

    match cli.command {
        QueryCommand::Models(args) => {
            let spec = args.filter_spec();
            let page = query.list(spec.as_ref(), args.limit, args.offset)?;
            print_json(&page, cli.pretty)
        }
        QueryCommand::Model { name } => print_json(&query.get_by_name(&name)?, cli.pretty),
        QueryCommand::Capabilities => print_json(&query.unique_capabilities()?, cli.pretty),
        QueryCommand::Sizes => print_json(&query.unique_sizes()?, cli.pretty),
    }
}

impl ModelsArgs {
    fn filter_spec(&self) -> Option<FilterSpec> {
        let spec = FilterSpec {
            name_contains: self.name_contains.clone(),
            description_contains: self.description_contains.clone(),
            capabilities: flatten_list(&self.capabilities),
            sizes: flatten_list(&self.sizes),
        };
        (!spec.is_empty()).then_some(spec)
    }
}

fn flatten_list(raw: &[String]) -> Option<Vec<String>> {
    let values: Vec<String> = raw.iter().flat_map(|value| split_list(value)).collect();
    (!values.is_empty()).then_some(values)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serializing query result")?;
    println!("{rendered}");
    Ok(())
}
