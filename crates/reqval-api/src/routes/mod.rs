//! # API Route Modules
//!
//! - `products`: demo product catalog guarded by request validation.

pub mod products;
