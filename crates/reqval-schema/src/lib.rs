//! # reqval-schema: Schema Adapters
//!
//! Implementations of [`reqval_core::Schema`] for two rule languages:
//!
//! - **Builder schemas** ([`string`], [`number`], [`boolean`], [`object`]) that
//!   validate *and normalize*: trimming, case folding, numeric string
//!   conversion, precision rounding, identifier canonicalization.
//! - **JSON Schema** ([`JsonSchema`]): validation only, backed by the
//!   `jsonschema` crate. Values pass through unchanged.
//!
//! Both report every violated rule by default. Schema sets described as
//! JSON/YAML documents are loaded with [`load_schema_set`].
//!
//! ## Example
//!
//! ```
//! use reqval_core::{RequestSegments, SchemaSet, validate};
//! use reqval_schema::{number, object, object_id, string};
//! use serde_json::json;
//!
//! let schemas = SchemaSet::builder()
//!     .segment("params", object().required("id", object_id()))
//!     .segment(
//!         "body",
//!         object()
//!             .required("name", string().trim())
//!             .required("price", number().min(0.0).precision(2)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let request = RequestSegments::new()
//!     .with("params", json!({"id": "507F1F77BCF86CD799439011"}))
//!     .with("body", json!({"name": " Widget ", "price": 3.145}));
//!
//! let values = validate(&schemas, &request).into_result().unwrap();
//! assert_eq!(values.get("body").unwrap()["name"], "Widget");
//! assert_eq!(values.get("body").unwrap()["price"], 3.15);
//! ```

mod collect;

pub mod boolean;
pub mod json_schema;
pub mod loader;
pub mod number;
pub mod object;
pub mod string;

pub use boolean::BooleanSchema;
pub use json_schema::JsonSchema;
pub use loader::{load_schema_set, schema_set_from_document, LoadError};
pub use number::{round_to_precision, NumberSchema};
pub use object::ObjectSchema;
pub use string::StringSchema;

/// Pattern of a 24 hex-character object identifier.
pub const OBJECT_ID_PATTERN: &str = "^[0-9a-fA-F]{24}$";

pub fn string() -> StringSchema {
    StringSchema::new()
}

pub fn number() -> NumberSchema {
    NumberSchema::new()
}

pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

/// 24 hex-character identifier, canonicalized to lowercase.
pub fn object_id() -> StringSchema {
    StringSchema::new().lowercase().object_id_pattern()
}
