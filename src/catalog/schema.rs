//! JSON Schema check for model catalog documents.
//!
//! The dataset is validated structurally before typed decoding so a malformed
//! document reports every violation at once instead of the first serde error.
//! The bundled schema lives in `schema/model_catalog.schema.json`.

use crate::catalog::error::LoadError;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

const BUNDLED_SCHEMA: &str = include_str!("../../schema/model_catalog.schema.json");

/// Compiled validator for catalog documents.
pub struct DatasetSchema {
    compiled: JSONSchema,
}

impl DatasetSchema {
    /// Compile the schema shipped with the crate.
    pub fn bundled() -> Result<Self, LoadError> {
        let raw: Value = serde_json::from_str(BUNDLED_SCHEMA)
            .map_err(|err| LoadError::InvalidSchema(err.to_string()))?;
        Self::compile(&raw)
    }

    /// Process-wide instance of the bundled schema, compiled on first use.
    pub fn shared() -> Result<&'static Self, LoadError> {
        static SHARED: OnceLock<Result<DatasetSchema, String>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                Self::bundled().map_err(|err| match err {
                    LoadError::InvalidSchema(detail) => detail,
                    other => other.to_string(),
                })
            })
            .as_ref()
            .map_err(|msg| LoadError::InvalidSchema(msg.clone()))
    }

    /// Compile a schema stored on disk (used by `catalog-validate --schema`).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|err| {
            LoadError::InvalidSchema(format!("opening {}: {err}", path.display()))
        })?;
        let raw: Value = serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            LoadError::InvalidSchema(format!("parsing {}: {err}", path.display()))
        })?;
        Self::compile(&raw)
    }

    pub fn compile(raw: &Value) -> Result<Self, LoadError> {
        let compiled =
            JSONSchema::compile(raw).map_err(|err| LoadError::InvalidSchema(err.to_string()))?;
        Ok(Self { compiled })
    }

    /// Every schema violation in `document`; empty when it conforms.
    pub fn violations(&self, document: &Value) -> Vec<String> {
        match self.compiled.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| {
                    let pointer = err.instance_path.to_string();
                    if pointer.is_empty() {
                        err.to_string()
                    } else {
                        format!("{pointer}: {err}")
                    }
                })
                .collect(),
        }
    }

    /// Validate `document`, attributing failures to `origin`.
    pub fn check(&self, document: &Value, origin: &str) -> Result<(), LoadError> {
        let violations = self.violations(document);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(LoadError::Schema {
                origin: origin.to_string(),
                violations,
            })
        }
    }
}
