//! # Request Validation Middleware
//!
//! Runs a [`ValidationStep`] in front of a handler. The middleware gathers
//! only the segments the schema set declares:
//!
//! | Segment   | Source                                               |
//! |-----------|------------------------------------------------------|
//! | `params`  | matched path parameters, as strings                  |
//! | `query`   | query string pairs, as strings                       |
//! | `headers` | request headers with visible-ASCII values, lowercase names |
//! | `body`    | JSON body; an empty body leaves the segment absent   |
//!
//! On success the sanitized segments are stored in the request extensions
//! (read them with [`ValidatedSegments`](crate::extractors::ValidatedSegments))
//! and a declared body is replaced with its sanitized JSON, so `Json<T>`
//! handlers see the sanitized value. On failure the handler is never called
//! and the client receives a 400 with per-segment details.
//!
//! Attach the middleware to the route whose parameters it validates:
//!
//! ```ignore
//! let guard = RequestGuard::new(schemas)?;
//! Router::new().route(
//!     "/api/product/{productId}",
//!     post(update_product).layer(from_fn_with_state(guard, validate_request)),
//! );
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, Query, RawPathParams, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use reqval_core::{
    ConfigError, RequestSegments, SchemaSet, ValidationStep, BODY, HEADERS, PARAMS, QUERY,
};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::DEFAULT_BODY_LIMIT;

/// Segments this adapter knows how to extract from an HTTP request.
pub const SUPPORTED_SEGMENTS: [&str; 4] = [PARAMS, QUERY, BODY, HEADERS];

/// A validated, route-bound schema set plus transport settings.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    step: Arc<ValidationStep>,
    body_limit: usize,
}

impl RequestGuard {
    /// Bind a schema set to the HTTP adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedSegment`] if the set declares a
    /// segment the adapter cannot extract.
    pub fn new(schemas: SchemaSet) -> Result<Self, ConfigError> {
        if let Some(name) = schemas
            .segment_names()
            .find(|name| !SUPPORTED_SEGMENTS.contains(&name.as_str()))
        {
            return Err(ConfigError::UnsupportedSegment(name.to_string()));
        }
        Ok(Self {
            step: Arc::new(ValidationStep::new(schemas)),
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }

    /// Maximum body size read by the middleware.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn schemas(&self) -> &SchemaSet {
        self.step.schemas()
    }

    fn declares(&self, segment: &str) -> bool {
        self.step.schemas().contains(segment)
    }

    async fn collect(&self, parts: &mut Parts) -> Result<RequestSegments, AppError> {
        let mut segments = RequestSegments::new();

        if self.declares(PARAMS) {
            let params = match RawPathParams::from_request_parts(parts, &()).await {
                Ok(raw) => raw
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                    .collect(),
                // Routes without parameters still produce an empty object.
                Err(RawPathParamsRejection::MissingPathParams(_)) => Map::new(),
                Err(rejection) => {
                    return Err(AppError::BadRequest(format!(
                        "invalid path parameter: {}",
                        rejection.body_text()
                    )))
                }
            };
            segments.insert(PARAMS, Value::Object(params));
        }

        if self.declares(QUERY) {
            let Query(pairs) = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
                .map_err(|e| AppError::BadRequest(format!("invalid query string: {e}")))?;
            let query = pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
            segments.insert(QUERY, Value::Object(query));
        }

        if self.declares(HEADERS) {
            let headers: Map<String, Value> = parts
                .headers
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), Value::String(value.to_string())))
                })
                .collect();
            segments.insert(HEADERS, Value::Object(headers));
        }

        Ok(segments)
    }

    async fn read_body(&self, body: Body) -> Result<Option<Value>, AppError> {
        let bytes = axum::body::to_bytes(body, self.body_limit)
            .await
            .map_err(|_| AppError::PayloadTooLarge(self.body_limit))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AppError::BadRequest(format!("malformed JSON body: {e}")))
    }
}

/// Axum middleware validating a request against the guard's schema set.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn validate_request(
    State(guard): State<RequestGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let mut segments = guard.collect(&mut parts).await?;

    let body = if guard.declares(BODY) {
        if let Some(value) = guard.read_body(body).await? {
            segments.insert(BODY, value);
        }
        None
    } else {
        Some(body)
    };

    if let Err(err) = guard.step.apply(&mut segments) {
        for segment in err.failed_segments() {
            metrics::counter!("reqval_requests_rejected_total", "segment" => segment.to_string())
                .increment(1);
        }
        tracing::info!(
            method = %parts.method,
            uri = %parts.uri,
            segments = ?err.failed_segments(),
            issues = err.issue_count(),
            "request rejected by validation"
        );
        return Err(err.into());
    }

    let body = match body {
        Some(untouched) => untouched,
        None => match segments.get(BODY) {
            Some(sanitized) => {
                let bytes = serde_json::to_vec(sanitized)
                    .map_err(|e| AppError::Internal(format!("re-encoding body: {e}")))?;
                parts
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
                Body::from(Bytes::from(bytes))
            }
            None => Body::empty(),
        },
    };

    parts.extensions.insert(segments);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
