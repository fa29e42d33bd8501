//! # Validation Engine
//!
//! [`validate`] runs every schema of a [`SchemaSet`] against the matching
//! segment of a request and folds the per-segment results into one
//! [`Outcome`].
//!
//! ## Invariants
//!
//! - Every bound segment is validated, in schema set order, whether or not an
//!   earlier segment failed.
//! - Schemas are asked for all issues (`abort_early = false`).
//! - An absent segment is reported as `any.required` on that segment; it is
//!   never skipped.
//! - The result is all-or-nothing: `Sanitized` carries every bound segment,
//!   `Invalid` carries exactly the failed ones.
//! - No state survives the call.

use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::RequestValidationError;
use crate::issue::IssueList;
use crate::schema::SchemaSet;
use crate::segment::{SegmentMap, SegmentStore};

/// Rule code reported for an absent segment or field.
pub const REQUIRED: &str = "any.required";

/// Terminal result of one engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every segment passed. Values are to be written back onto the request.
    Sanitized(SegmentMap<Value>),
    /// At least one segment failed. Only failed segments are listed.
    Invalid(SegmentMap<IssueList>),
}

impl Outcome {
    pub fn is_sanitized(&self) -> bool {
        matches!(self, Self::Sanitized(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn sanitized(&self) -> Option<&SegmentMap<Value>> {
        match self {
            Self::Sanitized(values) => Some(values),
            Self::Invalid(_) => None,
        }
    }

    pub fn issues(&self) -> Option<&SegmentMap<IssueList>> {
        match self {
            Self::Sanitized(_) => None,
            Self::Invalid(issues) => Some(issues),
        }
    }

    /// Sanitized values, or the aggregated 400 error.
    pub fn into_result(self) -> Result<SegmentMap<Value>, RequestValidationError> {
        match self {
            Self::Sanitized(values) => Ok(values),
            Self::Invalid(issues) => Err(RequestValidationError::new(issues)),
        }
    }
}

/// Validate every segment bound in `schemas` against `request`.
pub fn validate<S>(schemas: &SchemaSet, request: &S) -> Outcome
where
    S: SegmentStore + ?Sized,
{
    let mut sanitized = SegmentMap::with_capacity(schemas.len());
    let mut failed = SegmentMap::new();

    for (name, schema) in schemas.iter() {
        let ctx = ValidationContext::for_segment(name);
        let result = match request.segment(name.as_str()) {
            Some(raw) => schema.validate(raw, &ctx),
            None => Err(IssueList::from(ctx.issue(REQUIRED, "is required"))),
        };

        match result {
            Ok(value) => {
                // Values are only useful while nothing has failed.
                if failed.is_empty() {
                    sanitized.insert(name.clone(), value);
                }
            }
            Err(issues) => {
                tracing::debug!(
                    segment = %name,
                    schema = %schema.describe(),
                    issues = issues.len(),
                    "segment failed validation"
                );
                failed.insert(name.clone(), issues);
            }
        }
    }

    if failed.is_empty() {
        Outcome::Sanitized(sanitized)
    } else {
        Outcome::Invalid(failed)
    }
}
