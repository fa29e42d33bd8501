//! # Custom Extractors
//!
//! [`ValidatedSegments`] hands handlers the sanitized segments stored by
//! [`validate_request`](crate::middleware::validate_request), and
//! [`extract_json`] maps JSON body rejections onto [`AppError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Json;
use reqval_core::RequestSegments;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// Sanitized request segments. Only available behind `validate_request`.
#[derive(Debug, Clone)]
pub struct ValidatedSegments(pub RequestSegments);

impl ValidatedSegments {
    pub fn get(&self, segment: &str) -> Option<&Value> {
        self.0.get(segment)
    }

    /// Deserialize one sanitized segment into a typed value.
    ///
    /// A missing or mismatching segment means the route's schema and the
    /// target type disagree, which is a server error.
    pub fn deserialize<T: DeserializeOwned>(&self, segment: &str) -> Result<T, AppError> {
        let value = self
            .get(segment)
            .ok_or_else(|| AppError::Internal(format!("segment {segment} was not validated")))?;
        T::deserialize(value).map_err(|e| {
            AppError::Internal(format!("segment {segment} does not match handler type: {e}"))
        })
    }

    pub fn to_json(&self) -> Value {
        self.0.to_json()
    }

    pub fn into_inner(self) -> RequestSegments {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ValidatedSegments {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestSegments>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Internal("route is not behind validate_request".to_string()))
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
