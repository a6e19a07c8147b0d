// Bakes a fallback repository root into the binaries so `catalog-*` can find
// `data/models.json` when run from outside the checkout.
use std::env;
use std::path::PathBuf;

const SENTINELS: [&str; 2] = ["schema/model_catalog.schema.json", "data/models.json"];

fn main() {
    println!("cargo:rerun-if-env-changed=MODEL_CATALOG_ROOT_HINT");
    // The schema is embedded with include_str!; the dataset only matters as a sentinel.
    for sentinel in SENTINELS {
        println!("cargo:rerun-if-changed={sentinel}");
    }

    let Some(raw_hint) = env::var("MODEL_CATALOG_ROOT_HINT")
        .ok()
        .or_else(|| env::var("CARGO_MANIFEST_DIR").ok())
    else {
        return;
    };

    let candidate = PathBuf::from(raw_hint);
    let root = candidate.canonicalize().unwrap_or(candidate);
    if SENTINELS.iter().all(|sentinel| root.join(sentinel).is_file()) {
        println!("cargo:rustc-env=MODEL_CATALOG_ROOT_HINT={}", root.display());
    } else {
        println!(
            "cargo:warning=MODEL_CATALOG_ROOT_HINT {} lacks the catalog dataset; no root baked in",
            root.display()
        );
    }
}
