//! Error types surfaced by the catalog store and query facade.
//!
//! Load failures carry the origin of the dataset (a path or a source label) so
//! transports can report them without extra context. Missing names are not
//! errors: lookups return `None`.

use std::fmt;
use std::io;

/// The dataset could not be read or did not have the expected shape.
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be read (missing file, permissions, ...).
    Io { origin: String, error: io::Error },
    /// The source is not valid JSON.
    Parse {
        origin: String,
        error: serde_json::Error,
    },
    /// The document parsed but violates the dataset schema.
    Schema {
        origin: String,
        violations: Vec<String>,
    },
    /// The document passed schema validation but could not be decoded into
    /// the typed snapshot.
    Shape {
        origin: String,
        error: serde_json::Error,
    },
    /// The dataset schema itself failed to compile.
    InvalidSchema(String),
}

/// Errors returned by [`crate::CatalogQuery`] operations.
#[derive(Debug)]
pub enum QueryError {
    /// A caller-supplied argument is out of range (negative limit/offset).
    InvalidArgument { name: &'static str, value: i64 },
    /// The snapshot needed to answer the query could not be loaded.
    Load(LoadError),
}

impl LoadError {
    /// Label of the dataset source that failed, when known.
    pub fn origin(&self) -> Option<&str> {
        match self {
            LoadError::Io { origin, .. }
            | LoadError::Parse { origin, .. }
            | LoadError::Schema { origin, .. }
            | LoadError::Shape { origin, .. } => Some(origin.as_str()),
            LoadError::InvalidSchema(_) => None,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { origin, error } => {
                write!(f, "failed to read model catalog {origin}: {error}")
            }
            LoadError::Parse { origin, error } => {
                write!(f, "model catalog {origin} is not valid JSON: {error}")
            }
            LoadError::Schema { origin, violations } => write!(
                f,
                "model catalog {origin} failed schema validation:\n{}",
                violations.join("\n")
            ),
            LoadError::Shape { origin, error } => {
                write!(f, "model catalog {origin} has an unexpected shape: {error}")
            }
            LoadError::InvalidSchema(detail) => {
                write!(f, "model catalog schema failed to compile: {detail}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { error, .. } => Some(error),
            LoadError::Parse { error, .. } | LoadError::Shape { error, .. } => Some(error),
            LoadError::Schema { .. } | LoadError::InvalidSchema(_) => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidArgument { name, value } => {
                write!(f, "{name} must not be negative, got {value}")
            }
            QueryError::Load(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::InvalidArgument { .. } => None,
            QueryError::Load(err) => Some(err),
        }
    }
}

impl From<LoadError> for QueryError {
    fn from(err: LoadError) -> Self {
        QueryError::Load(err)
    }
}
