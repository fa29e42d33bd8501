//! # Schema Capability and Schema Sets
//!
//! [`Schema`] is the only thing the engine knows about validation rules: give
//! it a raw value and a [`ValidationContext`], get back either the sanitized
//! value or a non-empty [`IssueList`]. Concrete rule languages (builder-style
//! schemas, JSON Schema, ...) are adapters implementing this trait.
//!
//! [`SchemaSet`] is the ordered, immutable binding of segment names to
//! schemas, built once through [`SchemaSetBuilder`] and shared across
//! requests.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::ConfigError;
use crate::issue::IssueList;
use crate::segment::SegmentName;

/// A validator and normalizer for one value.
///
/// Implementations must:
/// - report every violated rule unless [`ValidationContext::abort_early`] is set;
/// - return the normalized form of the input on success (trimmed strings,
///   rounded numbers, canonical identifiers), or the input unchanged when
///   there is nothing to normalize;
/// - be pure: the same value and context always give the same result.
pub trait Schema: Send + Sync {
    /// Validate `value`, returning its sanitized form or every issue found.
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList>;

    /// Short description for logs and `Debug` output.
    fn describe(&self) -> String {
        "schema".to_string()
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        (**self).validate(value, ctx)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        (**self).validate(value, ctx)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Ordered mapping from segment name to schema.
///
/// Cloning is cheap (reference counted) and the set is `Send + Sync`, so one
/// instance built at route registration serves every concurrent request.
#[derive(Clone)]
pub struct SchemaSet {
    entries: Arc<[(SegmentName, Arc<dyn Schema>)]>,
}

impl SchemaSet {
    pub fn builder() -> SchemaSetBuilder {
        SchemaSetBuilder::default()
    }

    /// Number of bound segments. Never zero.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; an empty set is rejected at build time.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound segments and their schemas, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&SegmentName, &dyn Schema)> {
        self.entries.iter().map(|(name, schema)| (name, schema.as_ref()))
    }

    pub fn segment_names(&self) -> impl Iterator<Item = &SegmentName> {
        self.entries.iter().map(|(name, _)| name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Schema> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, schema)| schema.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, schema)| (name.as_str(), schema.describe())),
            )
            .finish()
    }
}

/// Builder for [`SchemaSet`].
///
/// Errors are recorded as they occur and reported by [`build`](Self::build),
/// so a whole set can be declared in one expression.
#[derive(Default)]
pub struct SchemaSetBuilder {
    entries: Vec<(SegmentName, Arc<dyn Schema>)>,
    seen: HashSet<String>,
    error: Option<ConfigError>,
}

impl SchemaSetBuilder {
    /// Bind `schema` to the segment `name`.
    pub fn segment<S: Schema + 'static>(self, name: &str, schema: S) -> Self {
        self.segment_arc(name, Arc::new(schema))
    }

    /// Bind an already shared schema to the segment `name`.
    pub fn segment_arc(mut self, name: &str, schema: Arc<dyn Schema>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match SegmentName::new(name) {
            Ok(segment) => {
                if self.seen.insert(segment.as_str().to_string()) {
                    self.entries.push((segment, schema));
                } else {
                    self.error = Some(ConfigError::DuplicateSegment(name.to_string()));
                }
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Finish the set, failing on the first recorded error or when no segment was bound.
    pub fn build(self) -> Result<SchemaSet, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.entries.is_empty() {
            return Err(ConfigError::EmptySchemaSet);
        }
        Ok(SchemaSet {
            entries: self.entries.into(),
        })
    }
}
