//! # Integration Tests for reqval-api
//!
//! Drives the full router with `tower::ServiceExt::oneshot`: health checks,
//! the product list, and validated product updates.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reqval_api::state::{AppState, Product};

fn test_app(state: AppState) -> axum::Router {
    reqval_api::app(state).unwrap()
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn first_product(state: &AppState) -> Product {
    state.catalog.list().into_iter().next().unwrap()
}

// -- Health Checks ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_endpoint() {
    let response = test_app(AppState::new())
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_endpoint() {
    let response = test_app(AppState::new())
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Product List -------------------------------------------------------------

#[tokio::test]
async fn test_index_redirects_to_list() {
    let response = test_app(AppState::new())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/product/list"
    );
}

#[tokio::test]
async fn test_list_returns_seeded_products() {
    let response = test_app(AppState::new())
        .oneshot(
            Request::builder()
                .uri("/api/product/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products = body_json(response).await;
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0]["name"], "Product 1");
    assert!(products[0]["_id"].is_string());
}

// -- Product Update -----------------------------------------------------------

#[tokio::test]
async fn test_update_sanitizes_and_stores() {
    let state = AppState::new();
    let product = first_product(&state);
    let uri = format!("/api/product/{}", product.id.to_uppercase());

    let response = test_app(state.clone())
        .oneshot(post_json(
            &uri,
            json!({"name": "  Desk Lamp ", "category": " Lighting ", "price": 19.999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": "Product Updated!"}));

    let stored = state.catalog.get(&product.id).unwrap();
    assert_eq!(stored.name, "Desk Lamp");
    assert_eq!(stored.category, "Lighting");
    assert_eq!(stored.price, Some(20.0));
}

#[tokio::test]
async fn test_update_reports_all_segments() {
    let state = AppState::new();
    let response = test_app(state.clone())
        .oneshot(post_json(
            "/api/product/not-an-id",
            json!({"name": "", "category": "x", "price": -1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let error = &body["error"];
    assert_eq!(error["status"], 400);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["message"], "Request data is invalid. See details.");
    assert_eq!(error["details"]["params"].as_array().unwrap().len(), 1);
    assert_eq!(error["details"]["body"].as_array().unwrap().len(), 2);
    assert_eq!(
        error["details"]["params"][0]["message"],
        "\"req.params.productId\" with value \"not-an-id\" fails to match the ObjectId pattern"
    );

    // Nothing was written.
    assert!(state.catalog.list().iter().all(|p| p.price.is_none()));
}

#[tokio::test]
async fn test_update_requires_body() {
    let state = AppState::new();
    let uri = format!("/api/product/{}", first_product(&state).id);
    let response = test_app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["details"]["body"][0]["kind"], "any.required");
    assert_eq!(body["error"]["details"]["body"][0]["message"], "\"req.body\" is required");
}

#[tokio::test]
async fn test_update_missing_fields() {
    let state = AppState::new();
    let uri = format!("/api/product/{}", first_product(&state).id);
    let response = test_app(state)
        .oneshot(post_json(&uri, json!({"name": "Lamp"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let paths: Vec<&str> = body["error"]["details"]["body"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["category", "price"]);
}

#[tokio::test]
async fn test_update_non_utf8_product_id_is_bad_request() {
    let response = test_app(AppState::new())
        .oneshot(post_json(
            "/api/product/%FF%FE",
            json!({"name": "Lamp", "category": "Lighting", "price": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"].get("details").is_none());
}

#[tokio::test]
async fn test_update_malformed_json() {
    let state = AppState::new();
    let uri = format!("/api/product/{}", first_product(&state).id);
    let response = test_app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_update_unknown_product_is_404() {
    let response = test_app(AppState::new())
        .oneshot(post_json(
            "/api/product/507f1f77bcf86cd799439011",
            json!({"name": "Lamp", "category": "Lighting", "price": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        "Product 507f1f77bcf86cd799439011 not found!"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app(AppState::new())
        .oneshot(
            Request::builder()
                .uri("/api/nothing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
