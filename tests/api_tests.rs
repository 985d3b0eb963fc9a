//! # HTTP API Tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot` over an
//! in-memory store.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use canvasmail::catalog;
use canvasmail::server::{AppState, ServerConfig, router};
use canvasmail::store::MemoryStore;

fn app() -> Router {
    let state = AppState::with_store(ServerConfig::default(), Arc::new(MemoryStore::new()));
    router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap())
}

fn t1_document() -> Value {
    serde_json::to_value(catalog::instantiate_document("t1").unwrap()).unwrap()
}

#[tokio::test]
async fn save_then_list() {
    let app = app();
    let (status, saved) = send_json(
        &app,
        "POST",
        "/api/templates/save",
        Some(json!({
            "userId": 42,
            "templateId": "t1-copy",
            "name": "Welcome Email",
            "category": "onboarding",
            "content": t1_document(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["userId"], "42");
    assert_eq!(saved["templateId"], "t1-copy");

    let (status, list) = send_json(&app, "GET", "/api/templates/42", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["content"]["pages"][0]["elements"].as_array().unwrap().len(), 3);
    assert_eq!(list[0]["category"], "onboarding");
}

#[tokio::test]
async fn save_is_an_upsert() {
    let app = app();
    for name in ["First", "Second"] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/templates/save",
            Some(json!({
                "userId": "7",
                "templateId": "promo",
                "name": name,
                "content": t1_document(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, list) = send_json(&app, "GET", "/api/templates/7", None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Second");
}

#[tokio::test]
async fn save_missing_fields_is_400() {
    let app = app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/templates/save",
        Some(json!({ "userId": 1, "templateId": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Validation error: missing required field(s): name, content"
    );
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app();
    send_json(
        &app,
        "POST",
        "/api/templates/save",
        Some(json!({
            "userId": 5, "templateId": "a", "name": "A", "content": t1_document(),
        })),
    )
    .await;

    for _ in 0..2 {
        let (status, body) = send_json(&app, "DELETE", "/api/templates/5/a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Template deleted successfully");
    }
    let (_, list) = send_json(&app, "GET", "/api/templates/5", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn update_reports_affected_count() {
    let app = app();
    send_json(
        &app,
        "POST",
        "/api/templates/save",
        Some(json!({
            "userId": 5, "templateId": "a", "name": "A", "content": t1_document(),
        })),
    )
    .await;

    let blank = json!({"pages": [{"elements": []}], "activePageIndex": 0, "zoomLevel": 1});
    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/templates/update",
        Some(json!({"userId": 5, "templateId": "a", "name": "Renamed", "content": blank})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, body) = send_json(
        &app,
        "PUT",
        "/api/templates/update",
        Some(json!({"userId": 5, "templateId": "nope", "name": "X", "content": blank})),
    )
    .await;
    assert_eq!(body["updated"], 0);

    let (_, list) = send_json(&app, "GET", "/api/templates/5", None).await;
    assert_eq!(list[0]["name"], "Renamed");
    assert_eq!(list[0]["content"]["pages"][0]["elements"], json!([]));
}

#[tokio::test]
async fn update_missing_fields_is_400() {
    let app = app();
    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/templates/update",
        Some(json!({"userId": 5, "templateId": "a"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name, content"));
}

#[tokio::test]
async fn catalog_lists_and_instantiates() {
    let app = app();
    let (status, list) = send_json(&app, "GET", "/api/catalog", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["id"], "t1");

    let (status, doc) = send_json(&app, "POST", "/api/catalog/t2/instantiate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["pages"].as_array().unwrap().len(), 1);
    assert_eq!(doc["zoomLevel"], 1.0);

    let (status, body) = send_json(&app, "POST", "/api/catalog/nope/instantiate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn preview_reports_warnings_in_header() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/render/preview")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "document": {
                    "pages": [{"elements": [
                        {"id": "a", "type": "bogus"},
                        {"id": "b", "type": "text", "content": "<p>kept</p>", "width": 100, "height": 20}
                    ]}]
                },
                "zoomLevel": 0.5
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-render-warnings"], "1");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("width:300px;height:400px"));
    assert!(html.contains("<p>kept</p>"));
    assert!(!html.contains(r#"data-element-id="a""#));
}

#[tokio::test]
async fn preview_of_missing_page_is_placeholder() {
    let app = app();
    let (status, html) = send(
        &app,
        "POST",
        "/api/render/preview",
        Some(json!({"document": {"pages": []}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No content to display"));
}

#[tokio::test]
async fn render_tree_is_json() {
    let app = app();
    let (status, tree) = send_json(
        &app,
        "POST",
        "/api/render/tree",
        Some(json!({"document": t1_document()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree["kind"], "page");
    assert_eq!(tree["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(tree["canvas"]["width"], 600.0);
}

#[tokio::test]
async fn export_saved_template() {
    let app = app();
    send_json(
        &app,
        "POST",
        "/api/templates/save",
        Some(json!({
            "userId": 9, "templateId": "w", "name": "Welcome <1>", "content": t1_document(),
        })),
    )
    .await;

    let (status, html) = send(&app, "GET", "/api/templates/9/w/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Welcome &lt;1&gt;</title>"));
    assert!(html.contains(r#"href="https://example.com/start""#));
    assert!(!html.contains("data-element-id"));

    let (status, _) = send(&app, "GET", "/api/templates/9/missing/export", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_posted_document() {
    let app = app();
    let (status, html) = send(
        &app,
        "POST",
        "/api/render/export",
        Some(json!({"document": t1_document(), "title": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches(r#"class="email-page""#).count(), 1);
    assert!(html.contains("Welcome aboard!"));
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    let app = app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/templates/save",
        Some(json!({"userId": true, "templateId": "a", "name": "A", "content": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/render/preview",
        Some(json!({"document": {"pages": [{"elements": [
            {"id": "a", "type": "shape", "width": -5, "height": 10}
        ]}]}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("width"));
}
