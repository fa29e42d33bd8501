//! # reqval-api: Axum Adapter and Demo Service
//!
//! Plugs the `reqval-core` validation step into an Axum router:
//!
//! - [`RequestGuard`] binds a [`SchemaSet`](reqval_core::SchemaSet) to the
//!   HTTP adapter, rejecting segments it cannot extract.
//! - [`validate_request`](middleware::validate_request) is the middleware
//!   (`axum::middleware::from_fn_with_state`) that validates, writes back the
//!   sanitized segments, and either calls the handler or answers 400.
//! - [`ValidatedSegments`](extractors::ValidatedSegments) reads the sanitized
//!   segments in handlers.
//! - [`AppError`] renders every failure as a structured JSON body.
//!
//! The crate also ships a small product catalog service (see
//! [`routes::products`]) used by the `reqval-demo` binary.
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Router → (per route) validate_request → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use reqval_core::ConfigError;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use middleware::RequestGuard;
pub use state::{AppConfig, AppState};

/// Assemble the application router.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a route's schema set cannot be bound.
pub fn app(state: AppState) -> Result<Router, ConfigError> {
    let api = routes::products::router(state.config.body_limit)?
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Ok(Router::new().merge(health).merge(api))
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
