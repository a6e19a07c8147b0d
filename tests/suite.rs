// Integration suite for the catalog core: loading from disk, the query
// facade's filtering/pagination/facet contract, and reload behavior.
mod support;

use anyhow::Result;
use model_catalog::{
    CatalogQuery, CatalogStore, FilterSpec, LoadError, ModelEntry, QueryError, Snapshot,
    filter_entries, load_snapshot_from_path,
};
use serde_json::json;
use std::sync::Arc;
use support::{DatasetDir, bundled_dataset, llama_document};

fn query_for(dataset: &DatasetDir) -> CatalogQuery {
    CatalogQuery::new(Arc::new(CatalogStore::from_path(&dataset.path)))
}

fn names(entries: &[ModelEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.name.as_str()).collect()
}

#[test]
fn bundled_dataset_loads_and_validates() -> Result<()> {
    let snapshot = load_snapshot_from_path(&bundled_dataset())?;
    assert!(!snapshot.is_empty());
    assert!(!snapshot.last_updated.is_empty());
    for entry in &snapshot.entries {
        assert!(!entry.name.is_empty());
        assert!(!entry.sizes.is_empty(), "{} has no sizes", entry.name);
    }
    Ok(())
}

#[test]
fn llama_scenarios() -> Result<()> {
    let dataset = DatasetDir::new(&llama_document())?;
    let query = query_for(&dataset);

    let by_name = query.filter(Some(&FilterSpec::new().name_contains("llama3")), None, None)?;
    assert_eq!(names(&by_name), ["llama3:8b", "llama3:70b"]);

    let all_caps = query.filter(
        Some(&FilterSpec::new().capabilities(["chat", "tools"])),
        None,
        None,
    )?;
    assert_eq!(names(&all_caps), ["llama3:8b"]);

    let any_size = query.filter(Some(&FilterSpec::new().sizes(["8b", "70b"])), None, None)?;
    assert_eq!(names(&any_size), ["llama3:8b", "llama3:70b"]);

    let second_page = query.filter(None, Some(1), Some(1))?;
    assert_eq!(names(&second_page), ["llama3:70b"]);

    assert_eq!(
        query.get_by_name("llama3:8b")?.map(|entry| entry.sizes),
        Some(vec!["8b".to_string()])
    );
    assert!(query.get_by_name("missing")?.is_none());

    assert_eq!(query.unique_capabilities()?, ["chat", "tools"]);
    Ok(())
}

#[test]
fn duplicate_names_resolve_to_first_entry() -> Result<()> {
    let mut document = llama_document();
    document["models"][1]["name"] = json!("llama3:8b");
    let dataset = DatasetDir::new(&document)?;
    let query = query_for(&dataset);

    let found = query.get_by_name("llama3:8b")?.expect("entry present");
    assert_eq!(found.sizes, ["8b"]);
    let matches = query.filter(Some(&FilterSpec::new().name_contains("8b")), None, None)?;
    assert_eq!(matches.len(), 2);
    Ok(())
}

#[test]
fn facets_ignore_filters_in_flight() -> Result<()> {
    let dataset = DatasetDir::new(&bundled_document()?)?;
    let query = query_for(&dataset);
    let capabilities = query.unique_capabilities()?;
    let sizes = query.unique_sizes()?;

    let narrow = FilterSpec::new().name_contains("llava");
    let page = query.list(Some(&narrow), Some(1), None)?;
    assert_eq!(page.total_models, 1);

    assert_eq!(query.unique_capabilities()?, capabilities);
    assert_eq!(query.unique_sizes()?, sizes);

    let mut sorted = sizes.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sizes, sorted);
    Ok(())
}

#[test]
fn pagination_length_matches_formula() -> Result<()> {
    let dataset = DatasetDir::new(&bundled_document()?)?;
    let query = query_for(&dataset);
    let spec = FilterSpec::new().capabilities(["tools"]);
    let matched = query.filter(Some(&spec), None, None)?.len() as i64;
    assert!(matched > 0);

    for limit in 0..=matched + 2 {
        for offset in 0..=matched + 2 {
            let page = query.filter(Some(&spec), Some(limit), Some(offset))?;
            let expected = limit.min((matched - offset).max(0));
            assert_eq!(page.len() as i64, expected, "limit={limit} offset={offset}");
        }
    }
    Ok(())
}

#[test]
fn filtering_is_order_preserving_and_idempotent() -> Result<()> {
    let snapshot = load_snapshot_from_path(&bundled_dataset())?;
    let spec = FilterSpec::new().sizes(["7b", "8b"]);

    let once: Vec<ModelEntry> = filter_entries(&snapshot.entries, Some(&spec))
        .into_iter()
        .cloned()
        .collect();
    let twice: Vec<ModelEntry> = filter_entries(&once, Some(&spec))
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(once, twice);

    let positions: Vec<usize> = once
        .iter()
        .map(|hit| {
            snapshot
                .entries
                .iter()
                .position(|entry| entry == hit)
                .expect("hit comes from snapshot")
        })
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let empty_lists = FilterSpec::new()
        .capabilities(Vec::<String>::new())
        .sizes(Vec::<String>::new());
    assert_eq!(
        filter_entries(&snapshot.entries, Some(&empty_lists)).len(),
        snapshot.len()
    );
    Ok(())
}

#[test]
fn negative_arguments_are_rejected() -> Result<()> {
    let dataset = DatasetDir::new(&llama_document())?;
    let query = query_for(&dataset);
    assert!(matches!(
        query.list(None, Some(-2), None),
        Err(QueryError::InvalidArgument { name: "limit", .. })
    ));
    assert!(matches!(
        query.filter(None, None, Some(-1)),
        Err(QueryError::InvalidArgument { name: "offset", .. })
    ));
    Ok(())
}

#[test]
fn load_errors_propagate_by_kind() -> Result<()> {
    let dataset = DatasetDir::new(&llama_document())?;

    dataset.write_raw("{\"last_updated\": ")?;
    let err = CatalogStore::from_path(&dataset.path).snapshot().unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "{err}");

    dataset.write(&json!({"last_updated": "x", "total_pages": 1, "total_models": 0}))?;
    let err = CatalogStore::from_path(&dataset.path).snapshot().unwrap_err();
    assert!(matches!(err, LoadError::Schema { .. }), "{err}");

    let missing = dataset.dir.path().join("absent.json");
    let err = CatalogStore::from_path(&missing).snapshot().unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");

    let query = CatalogQuery::new(Arc::new(CatalogStore::from_path(&missing)));
    assert!(matches!(query.get_all(), Err(QueryError::Load(LoadError::Io { .. }))));
    Ok(())
}

#[test]
fn reload_picks_up_replaced_dataset() -> Result<()> {
    let dataset = DatasetDir::new(&llama_document())?;
    let query = query_for(&dataset);
    let before = query.get_all()?;
    assert_eq!(before.len(), 2);

    let mut replaced = llama_document();
    replaced["last_updated"] = json!("2025-03-01T00:00:00+00:00");
    replaced["models"]
        .as_array_mut()
        .expect("models array")
        .push(json!({
            "name": "phi3",
            "description": "Lightweight model from Microsoft",
            "capabilities": [],
            "sizes": ["3.8b", "14b"],
            "url": "https://ollama.com/library/phi3"
        }));
    dataset.write(&replaced)?;

    // Cached until reloaded.
    assert_eq!(query.get_all()?.len(), 2);
    query.reload();
    assert!(!query.store().is_loaded());

    let after = query.get_all()?;
    assert_eq!(after.len(), 3);
    assert_eq!(after.last_updated, "2025-03-01T00:00:00+00:00");
    // The snapshot handed out earlier is unchanged.
    assert_eq!(before.len(), 2);
    assert!(query.unique_sizes()?.contains(&"3.8b".to_string()));
    Ok(())
}

#[test]
fn reload_with_same_file_is_content_equal() -> Result<()> {
    let dataset = DatasetDir::new(&llama_document())?;
    let store = CatalogStore::from_path(&dataset.path);
    let first: Snapshot = (*store.load()?).clone();
    store.reload();
    let second = store.snapshot()?;
    assert_eq!(first, *second);
    Ok(())
}

fn bundled_document() -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(bundled_dataset())?;
    Ok(serde_json::from_str(&raw)?)
}
