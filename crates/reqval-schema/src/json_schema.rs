//! # JSON Schema Adapter
//!
//! Wraps a compiled `jsonschema` validator (Draft 2020-12) as a
//! [`Schema`]. JSON Schema only judges values, so a passing value is
//! returned unchanged.
//!
//! Every violation becomes one [`Issue`](reqval_core::Issue):
//!
//! - `path` is the violation's instance pointer in dotted form
//!   (`/address/city` becomes `address.city`, with `~1` and `~0` unescaped).
//! - `kind` is `jsonschema.<keyword>`, the keyword being the last named
//!   token of the schema path (`minimum`, `required`, `type`, ...).
//! - `message` quotes the field label followed by the validator's text.
//!
//! Remote `$ref` targets are never fetched. Schemas must be self-contained
//! (local `#/$defs/...` references resolve normally).

use std::fmt;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use reqval_core::{ConfigError, IssueList, Schema, ValidationContext};
use serde_json::Value;

/// Refuses every external reference so compilation never touches the network.
struct NoRemoteRefs;

impl Retrieve for NoRemoteRefs {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external reference {} is not allowed", uri.as_str()).into())
    }
}

#[derive(Clone)]
pub struct JsonSchema {
    validator: Arc<Validator>,
    source: Arc<Value>,
}

impl JsonSchema {
    /// Compile a JSON Schema document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchema`] when the document is not a
    /// valid schema or references an external document.
    pub fn compile(schema: &Value) -> Result<Self, ConfigError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(NoRemoteRefs);
        let validator = opts
            .build(schema)
            .map_err(|e| ConfigError::InvalidSchema {
                segment: schema_title(schema),
                reason: e.to_string(),
            })?;
        Ok(Self {
            validator: Arc::new(validator),
            source: Arc::new(schema.clone()),
        })
    }

    /// The schema document this validator was compiled from.
    pub fn source(&self) -> &Value {
        &self.source
    }
}

fn schema_title(schema: &Value) -> String {
    schema
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("json-schema")
        .to_string()
}

/// Split a JSON pointer into unescaped tokens.
fn pointer_tokens(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .filter(|t| !t.is_empty())
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// The keyword that failed: last schema path token that is not an index.
fn keyword(schema_path: &str) -> String {
    pointer_tokens(schema_path)
        .into_iter()
        .rev()
        .find(|t| t.parse::<usize>().is_err())
        .unwrap_or_else(|| "schema".to_string())
}

impl Schema for JsonSchema {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        let mut issues = Vec::new();
        for error in self.validator.iter_errors(value) {
            let at = pointer_tokens(&error.instance_path.to_string())
                .into_iter()
                .fold(ctx.clone(), |c, token| c.child(token));
            let kind = format!("jsonschema.{}", keyword(&error.schema_path.to_string()));
            issues.push(at.issue(&kind, error.to_string()));
            if ctx.abort_early() {
                break;
            }
        }
        match IssueList::from_vec(issues) {
            Some(issues) => Err(issues),
            None => Ok(value.clone()),
        }
    }

    fn describe(&self) -> String {
        format!("json-schema<{}>", schema_title(&self.source))
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
