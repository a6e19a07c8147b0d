//! Model catalog data and its load lifecycle.
//!
//! `model` mirrors the dataset document, `schema` validates it, `source`
//! abstracts where the bytes come from, and `store` caches the published
//! snapshot. Query logic lives in [`crate::query`].

pub mod error;
pub mod model;
pub mod schema;
pub mod source;
pub mod store;

pub use error::{LoadError, QueryError};
pub use model::{ModelEntry, Snapshot, load_snapshot_from_path};
pub use schema::DatasetSchema;
pub use source::{DatasetSource, FileSource, StaticSource};
pub use store::CatalogStore;
