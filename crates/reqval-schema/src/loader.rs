//! # Schema Set Loading
//!
//! Builds a [`SchemaSet`] from a document mapping segment names to JSON
//! Schema documents:
//!
//! ```yaml
//! params:
//!   type: object
//!   required: [productId]
//!   properties:
//!     productId: { type: string, pattern: "^[0-9a-fA-F]{24}$" }
//! body:
//!   type: object
//!   required: [name, price]
//! ```
//!
//! The format is chosen from the file extension: `.yaml`/`.yml` for YAML,
//! anything else is parsed as JSON. Segments are registered in key order of
//! the parsed mapping, which is sorted.

use std::path::Path;

use reqval_core::{ConfigError, SchemaSet};
use serde_json::Value;
use thiserror::Error;

use crate::json_schema::JsonSchema;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read schema set {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema set {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("schema set document must be a mapping of segment name to schema, found {found}")]
    NotAMapping { found: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Compile every entry of an already parsed document.
pub fn schema_set_from_document(document: &Value) -> Result<SchemaSet, LoadError> {
    let Value::Object(entries) = document else {
        return Err(LoadError::NotAMapping {
            found: kind_of(document),
        });
    };

    let mut builder = SchemaSet::builder();
    for (segment, schema) in entries {
        let compiled = JsonSchema::compile(schema).map_err(|e| match e {
            ConfigError::InvalidSchema { reason, .. } => ConfigError::InvalidSchema {
                segment: segment.clone(),
                reason,
            },
            other => other,
        })?;
        builder = builder.segment(segment, compiled);
    }
    Ok(builder.build()?)
}

/// Read, parse, and compile a schema set file.
pub fn load_schema_set(path: &Path) -> Result<SchemaSet, LoadError> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: shown.clone(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let document: Value = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| LoadError::Parse {
            path: shown.clone(),
            reason: format!("invalid YAML: {e}"),
        })?,
        _ => serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            path: shown.clone(),
            reason: format!("invalid JSON: {e}"),
        })?,
    };

    let schemas = schema_set_from_document(&document)?;
    tracing::info!(
        path = %shown,
        segments = schemas.len(),
        "loaded schema set"
    );
    Ok(schemas)
}
