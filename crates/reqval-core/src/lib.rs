//! # reqval-core: Request Segment Validation Engine
//!
//! A request is viewed as a set of named *segments* (path parameters, query
//! string, body, ...). A [`SchemaSet`] binds one [`Schema`] to each segment
//! the caller cares about. The [`engine`] validates every bound segment,
//! collects every issue from every segment, and produces exactly one of two
//! terminal results:
//!
//! - [`Outcome::Sanitized`]: every segment passed; carries the normalized
//!   value of each segment, to be written back onto the request.
//! - [`Outcome::Invalid`]: at least one segment failed; carries the issues of
//!   the failed segments only. No sanitized value leaks out.
//!
//! ## Key Design Principles
//!
//! 1. **Ordered schema sets.** Segments are declared once, in order, through
//!    [`SchemaSetBuilder`]. Iteration and error aggregation follow that order.
//!
//! 2. **Schemas are a capability, not a library.** The engine only sees the
//!    [`Schema`] trait. Adapters over concrete validation libraries live in
//!    `reqval-schema`.
//!
//! 3. **Configuration errors are not validation errors.** A malformed schema
//!    set fails at construction with [`ConfigError`]; user input can only ever
//!    produce a [`RequestValidationError`] (status 400).
//!
//! 4. **Pure evaluation.** [`engine::validate`] holds no state between calls.
//!    A `SchemaSet` is `Send + Sync` and may be shared by any number of
//!    concurrent requests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `reqval-*` crates.
//! - No HTTP types. Transport glue lives in `reqval-api`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod engine;
pub mod error;
pub mod issue;
pub mod schema;
pub mod segment;
pub mod step;

pub use context::ValidationContext;
pub use engine::{validate, Outcome};
pub use error::{ConfigError, RequestValidationError};
pub use issue::{Issue, IssueList};
pub use schema::{Schema, SchemaSet, SchemaSetBuilder};
pub use segment::{
    RequestSegments, SegmentMap, SegmentName, SegmentStore, BODY, HEADERS, PARAMS, QUERY,
};
pub use step::ValidationStep;
