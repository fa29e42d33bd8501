//! # Middleware
//!
//! - `validate`: schema-driven request validation and sanitization.

pub mod validate;

pub use validate::{validate_request, RequestGuard, SUPPORTED_SEGMENTS};
