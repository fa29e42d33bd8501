//! # Error Types
//!
//! Exactly two error classes exist:
//!
//! - [`RequestValidationError`]: user input did not satisfy the schema set.
//!   Always recoverable, always status 400, always carries per-segment detail.
//! - [`ConfigError`]: the schema set itself is wrong. Raised while building
//!   the set (or the adapter that consumes it), never while serving requests.

use serde::Serialize;
use thiserror::Error;

use crate::issue::IssueList;
use crate::segment::SegmentMap;

/// HTTP-style status code carried by every validation failure.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Summary message of every aggregated validation failure.
pub const INVALID_REQUEST_MESSAGE: &str = "Request data is invalid. See details.";

/// Aggregated validation failure across all segments of one request.
///
/// Serializes to `{ "status": 400, "message": "...", "details": { <segment>: [<issue>...] } }`
/// with segments in schema set order.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct RequestValidationError {
    /// Status classification. Always [`STATUS_BAD_REQUEST`].
    pub status: u16,
    /// Human-readable summary.
    pub message: String,
    /// Issues of every failed segment, keyed by segment name.
    pub details: SegmentMap<IssueList>,
}

impl RequestValidationError {
    /// Wrap the per-segment issues of a failed validation.
    pub fn new(details: SegmentMap<IssueList>) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: INVALID_REQUEST_MESSAGE.to_string(),
            details,
        }
    }

    /// True for input-driven failures. Validation failures are never server errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Total number of field-level issues across all segments.
    pub fn issue_count(&self) -> usize {
        self.details.values().map(IssueList::len).sum()
    }

    /// Names of the failed segments, in schema set order.
    pub fn failed_segments(&self) -> Vec<&str> {
        self.details.keys().map(|name| name.as_str()).collect()
    }
}

/// Programmer error in a schema set or in the adapter consuming it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A segment name is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid segment name {0:?}: expected non-empty [A-Za-z0-9_-]")]
    InvalidSegmentName(String),

    /// The same segment was bound twice.
    #[error("segment '{0}' is declared more than once")]
    DuplicateSegment(String),

    /// A schema set without segments validates nothing.
    #[error("schema set declares no segments")]
    EmptySchemaSet,

    /// A schema could not be compiled or is internally inconsistent.
    #[error("invalid schema for '{segment}': {reason}")]
    InvalidSchema {
        /// Segment or field the schema was meant for.
        segment: String,
        /// Why the schema was rejected.
        reason: String,
    },

    /// The consuming adapter has no way to supply this segment.
    #[error("segment '{0}' is not supported by this pipeline")]
    UnsupportedSegment(String),
}
