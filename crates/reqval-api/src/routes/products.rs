//! # Product Routes
//!
//! Demo catalog exercising the validation middleware:
//!
//! - `GET /` redirects to the product list.
//! - `GET /api/product/list` returns every product.
//! - `POST /api/product/{productId}` updates a product. The path id must be a
//!   24 hex-character identifier (canonicalized to lowercase); the body must
//!   carry `name` and `category` (trimmed) and a non-negative `price`
//!   (rounded to two decimal places).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqval_core::{ConfigError, SchemaSet, BODY, PARAMS};
use reqval_schema::{number, object, object_id, string};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::{extract_json, ValidatedSegments};
use crate::middleware::{validate_request, RequestGuard};
use crate::state::{AppState, Product, ProductUpdate};

pub const LIST_PATH: &str = "/api/product/list";

#[derive(Debug, Deserialize)]
struct ProductParams {
    #[serde(rename = "productId")]
    product_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResponse {
    pub success: String,
}

/// Schemas guarding `POST /api/product/{productId}`.
pub fn update_product_schemas() -> Result<SchemaSet, ConfigError> {
    SchemaSet::builder()
        .segment(PARAMS, object().required("productId", object_id()))
        .segment(
            BODY,
            object()
                .required("name", string().trim())
                .required("category", string().trim())
                .required("price", number().min(0.0).precision(2)),
        )
        .build()
}

/// Build the product router.
pub fn router(body_limit: usize) -> Result<Router<AppState>, ConfigError> {
    let guard = RequestGuard::new(update_product_schemas()?)?.with_body_limit(body_limit);
    Ok(Router::new()
        .route("/", get(index))
        .route(LIST_PATH, get(list_products))
        .route(
            "/api/product/{productId}",
            post(update_product).layer(from_fn_with_state(guard, validate_request)),
        ))
}

/// GET /: redirect to the product list.
async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, LIST_PATH)])
}

/// GET /api/product/list: all products.
async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.list())
}

/// POST /api/product/{productId}: apply a sanitized update.
async fn update_product(
    State(state): State<AppState>,
    segments: ValidatedSegments,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<UpdateResponse>, AppError> {
    let ProductParams { product_id } = segments.deserialize(PARAMS)?;
    let update = extract_json(body)?;

    state
        .catalog
        .update(&product_id, update)
        .ok_or_else(|| AppError::NotFound(format!("Product {product_id} not found!")))?;

    tracing::debug!(product_id = %product_id, "product updated");
    Ok(Json(UpdateResponse {
        success: "Product Updated!".to_string(),
    }))
}
