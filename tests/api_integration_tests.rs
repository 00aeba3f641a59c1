//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use property_cache::{
    api::{create_router, LIST_RESPONSE_KEY},
    cache::{CacheBackend, MemoryBackend, ALL_PROPERTIES_KEY},
    properties::MemoryRecordStore,
    AppState, Config,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

async fn create_test_app(response_ttl: u64) -> (Router, MemoryBackend) {
    let backend = MemoryBackend::new();
    let config = Config {
        response_ttl,
        ..Config::default()
    };
    let state = AppState::new(
        Arc::new(backend.clone()),
        Arc::new(MemoryRecordStore::new()),
        &config,
    )
    .await;
    (create_router(state), backend)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == List Endpoint Tests ==

#[tokio::test]
async fn test_list_empty() {
    let (app, backend) = create_test_app(0).await;

    let (status, json) = send(&app, get("/properties/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "data": [] }));
    assert!(backend.contains(ALL_PROPERTIES_KEY).await);
}

#[tokio::test]
async fn test_list_returns_projected_fields() {
    let (app, _) = create_test_app(0).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/properties/",
            r#"{"title":"Beach house","description":"Sea view","price":3200.5,"location":"Diani"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, json) = send(&app, get("/properties/")).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);

    let record = data[0].as_object().unwrap();
    let mut fields: Vec<&str> = record.keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec!["created_at", "description", "id", "location", "price", "title"]
    );
    assert_eq!(record["title"], "Beach house");
    assert_eq!(record["price"], 3200.5);
}

// == Write Endpoint Tests ==

#[tokio::test]
async fn test_create_update_delete_cycle() {
    let (app, backend) = create_test_app(0).await;

    let (_, created) = send(
        &app,
        json_request(
            "POST",
            "/properties/",
            r#"{"title":"Flat","price":800,"location":"Arusha"}"#,
        ),
    )
    .await;
    let id = created["id"].as_u64().unwrap();

    // Populate, then each write must drop the aggregate
    send(&app, get("/properties/")).await;
    assert!(backend.contains(ALL_PROPERTIES_KEY).await);

    let (status, updated) = send(
        &app,
        json_request("PUT", &format!("/properties/{}", id), r#"{"price":950}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 950.0);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert!(!backend.contains(ALL_PROPERTIES_KEY).await);

    let (_, json) = send(&app, get("/properties/")).await;
    assert_eq!(json["data"][0]["price"], 950.0);

    let (status, deleted) = send(&app, delete(&format!("/properties/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"].as_u64(), Some(id));
    assert!(!backend.contains(ALL_PROPERTIES_KEY).await);

    let (_, json) = send(&app, get("/properties/")).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_invalid_body() {
    let (app, _) = create_test_app(0).await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/properties/",
            r#"{"title":"","price":10,"location":"Gulu"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_update_empty_body_rejected() {
    let (app, _) = create_test_app(0).await;
    send(
        &app,
        json_request(
            "POST",
            "/properties/",
            r#"{"title":"Flat","price":800,"location":"Arusha"}"#,
        ),
    )
    .await;

    let (status, _) = send(&app, json_request("PUT", "/properties/1", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_not_found() {
    let (app, _) = create_test_app(0).await;

    let (status, json) = send(&app, delete("/properties/12")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("12"));
}

#[tokio::test]
async fn test_malformed_json_request() {
    let (app, _) = create_test_app(0).await;

    let response = app
        .oneshot(json_request("POST", "/properties/", r#"{"title"#))
        .await
        .unwrap();

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

// == Response Cache Tests ==

#[tokio::test]
async fn test_response_cache_outlives_aggregate_invalidation() {
    let (app, backend) = create_test_app(900).await;

    let (_, first) = send(&app, get("/properties/")).await;
    assert!(backend.contains(LIST_RESPONSE_KEY).await);

    send(
        &app,
        json_request(
            "POST",
            "/properties/",
            r#"{"title":"Flat","price":800,"location":"Arusha"}"#,
        ),
    )
    .await;

    // The aggregate is gone but the response layer keeps serving its body
    assert!(!backend.contains(ALL_PROPERTIES_KEY).await);
    let (_, second) = send(&app, get("/properties/")).await;
    assert_eq!(first, second);

    // Once the response layer expires, readers see the write
    backend.delete(LIST_RESPONSE_KEY).await.unwrap();
    let (_, third) = send(&app, get("/properties/")).await;
    assert_eq!(third["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_response_cache_header() {
    let (app, _) = create_test_app(900).await;

    let response = app.oneshot(get("/properties/")).await.unwrap();

    assert_eq!(
        response.headers()["cache-control"].to_str().unwrap(),
        "max-age=900"
    );
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
}

// == Metrics and Health Tests ==

#[tokio::test]
async fn test_metrics_endpoint_reports_hits() {
    let (app, _) = create_test_app(0).await;

    // miss + populate, then two hits
    for _ in 0..3 {
        send(&app, get("/properties/")).await;
    }

    let (status, json) = send(&app, get("/cache/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"].as_u64(), Some(2));
    assert_eq!(json["misses"].as_u64(), Some(1));
    let ratio = json["hit_ratio"].as_f64().unwrap();
    assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    assert!(json["diagnostics"]["used_memory_human"].is_string());
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_metrics_before_any_lookup() {
    let (app, _) = create_test_app(0).await;

    let (_, json) = send(&app, get("/cache/metrics")).await;

    assert_eq!(json["hits"].as_u64(), Some(0));
    assert!(json["hit_ratio"].is_null());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(0).await;

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
