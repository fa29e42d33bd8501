//! # Validation Context
//!
//! Per-call information handed to a [`Schema`](crate::Schema): which segment
//! is being validated, where inside it the schema currently sits, and whether
//! the schema may stop at the first issue.
//!
//! A context is derived fresh for every segment of every request and nested
//! schemas derive child contexts with [`ValidationContext::child`]. Schemas
//! therefore never need to be mutated (or cloned) to attach labels.

use crate::issue::Issue;
use crate::segment::SegmentName;

/// Prefix of every field label, mirroring how the value is reached on a request.
const LABEL_ROOT: &str = "req";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    segment: SegmentName,
    path: Vec<String>,
    abort_early: bool,
}

impl ValidationContext {
    /// Root context for a segment. Collects all issues.
    pub fn for_segment(segment: &SegmentName) -> Self {
        Self {
            segment: segment.clone(),
            path: Vec::new(),
            abort_early: false,
        }
    }

    /// Same context, stopping at the first issue when `abort_early` is set.
    pub fn with_abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    /// Context for a nested field or array element.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(key.into());
        Self {
            segment: self.segment.clone(),
            path,
            abort_early: self.abort_early,
        }
    }

    pub fn segment(&self) -> &SegmentName {
        &self.segment
    }

    /// Whether schemas may stop after the first issue. The engine never sets it.
    pub fn abort_early(&self) -> bool {
        self.abort_early
    }

    /// Dotted path inside the segment, empty at the root.
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    /// Label quoted in messages, e.g. `req.body.price`.
    pub fn label(&self) -> String {
        let mut label = format!("{LABEL_ROOT}.{}", self.segment);
        for key in &self.path {
            label.push('.');
            label.push_str(key);
        }
        label
    }

    /// Build an issue at this position: `"<label>" <detail>`.
    pub fn issue(&self, kind: &str, detail: impl AsRef<str>) -> Issue {
        Issue::new(
            self.path(),
            kind,
            format!("\"{}\" {}", self.label(), detail.as_ref()),
        )
    }
}
