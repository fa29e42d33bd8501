//! # Object Schema
//!
//! Validates a JSON object key by key. Each declared key carries its own
//! schema and is validated under a child context, so issues from nested
//! schemas carry dotted paths (`address.city`) and labels
//! (`req.body.address.city`).
//!
//! The sanitized object contains the sanitized value of every declared key
//! that was present. Unknown keys are rejected with `object.unknown` unless
//! [`ObjectSchema::allow_unknown`] is set, in which case they are copied
//! through untouched.

use std::sync::Arc;

use reqval_core::{IssueList, Schema, ValidationContext};
use serde_json::{Map, Value};

use crate::collect::IssueCollector;

#[derive(Clone)]
struct Field {
    key: String,
    schema: Arc<dyn Schema>,
    required: bool,
}

#[derive(Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
    allow_unknown: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a key that must be present.
    pub fn required<S: Schema + 'static>(self, key: &str, schema: S) -> Self {
        self.field(key, Arc::new(schema), true)
    }

    /// Declare a key that may be absent.
    pub fn optional<S: Schema + 'static>(self, key: &str, schema: S) -> Self {
        self.field(key, Arc::new(schema), false)
    }

    /// Declare a key with a shared schema. Redeclaring a key replaces it.
    pub fn field(mut self, key: &str, schema: Arc<dyn Schema>, required: bool) -> Self {
        let field = Field {
            key: key.to_string(),
            schema,
            required,
        };
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Keep undeclared keys instead of reporting them.
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key)
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        let Value::Object(input) = value else {
            return Err(ctx.issue("object.base", "must be of type object").into());
        };

        let mut issues = IssueCollector::new(ctx.abort_early());
        let mut output = Map::new();

        for field in &self.fields {
            if issues.should_stop() {
                break;
            }
            let child = ctx.child(field.key.as_str());
            match input.get(&field.key) {
                Some(raw) => match field.schema.validate(raw, &child) {
                    Ok(clean) => {
                        output.insert(field.key.clone(), clean);
                    }
                    Err(found) => issues.extend(found),
                },
                None if field.required => issues.push(child.issue("any.required", "is required")),
                None => {}
            }
        }

        for (key, raw) in input {
            if self.declares(key) {
                continue;
            }
            if self.allow_unknown {
                output.insert(key.clone(), raw.clone());
            } else if !issues.should_stop() {
                issues.push(ctx.child(key.as_str()).issue("object.unknown", "is not allowed"));
            }
        }

        issues.finish(Value::Object(output))
    }

    fn describe(&self) -> String {
        let keys: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let marker = if f.required { "" } else { "?" };
                format!("{}{marker}: {}", f.key, f.schema.describe())
            })
            .collect();
        format!("object {{ {} }}", keys.join(", "))
    }
}

impl std::fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("fields", &self.keys().collect::<Vec<_>>())
            .field("allow_unknown", &self.allow_unknown)
            .finish()
    }
}
