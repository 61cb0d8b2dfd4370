//! Handler tests for Products domain
//!
//! These tests drive the products router with the stub controller:
//! - every documented operation is routed
//! - stubbed operations answer 501 with the NOT_IMPLEMENTED error body
//! - path and body rejections happen before the controller is reached

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_products::contract::{HttpVerb, PRODUCT_ID_PARAM};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn product_json() -> String {
    json!({"id": 42, "status": "available"}).to_string()
}

fn request(method: &str, uri: &str, body: Option<String>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn assert_not_implemented(request: Request<Body>, operation_id: &str) {
    let app = handlers::router(UnimplementedProducts);

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "NOT_IMPLEMENTED");
    assert_eq!(error.code, 1012);
    assert_eq!(error.message, format!("{} is not implemented", operation_id));
}

#[tokio::test]
async fn test_get_product_is_not_implemented() {
    assert_not_implemented(request("GET", "/products/42", None), "getProduct").await;
}

#[tokio::test]
async fn test_update_product_is_not_implemented() {
    assert_not_implemented(
        request("POST", "/products/42", Some(product_json())),
        "updateProduct",
    )
    .await;
}

#[tokio::test]
async fn test_add_product_is_not_implemented() {
    assert_not_implemented(
        request("POST", "/products", Some(product_json())),
        "addProduct",
    )
    .await;
}

#[tokio::test]
async fn test_every_declared_operation_is_routed() {
    for operation in product_operations() {
        let uri = operation
            .path()
            .replace(&format!("{{{}}}", PRODUCT_ID_PARAM), "1");
        let body = operation.body_reference().map(|_| product_json());
        let method = match operation.verb() {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
        };

        let app = handlers::router(UnimplementedProducts);
        let response = app.oneshot(request(method, &uri, body)).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::NOT_IMPLEMENTED,
            "{} {} should be routed",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_non_integer_product_id_returns_400() {
    let app = handlers::router(UnimplementedProducts);

    let response = app
        .oneshot(request("GET", "/products/abc", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_PATH_PARAM");
}

#[tokio::test]
async fn test_product_id_overflowing_i64_returns_400() {
    let app = handlers::router(UnimplementedProducts);

    let response = app
        .oneshot(request("GET", "/products/9223372036854775808", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undeclared_verb_returns_405() {
    let app = handlers::router(UnimplementedProducts);

    let response = app
        .oneshot(request("DELETE", "/products/1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_get_on_collection_returns_405() {
    let app = handlers::router(UnimplementedProducts);

    let response = app.oneshot(request("GET", "/products", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_add_product_without_body_is_rejected() {
    let app = handlers::router(UnimplementedProducts);

    let response = app
        .oneshot(request("POST", "/products", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
