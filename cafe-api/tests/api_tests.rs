//! Integration tests for cafe-api endpoints
//!
//! Each test builds the router over a fresh SQLite file and drives it with
//! `oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cafe_api::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: create app over a temp database
async fn setup_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = cafe_common::db::init_database(&dir.path().join("cafe.db"))
        .await
        .expect("Failed to initialize database");
    (dir, build_router(AppState::new(pool, 500)))
}

/// Test helper: send a request and return status plus JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, json)
}

async fn create_cafe(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/cafes", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn review_body(cafe_id: &str, index: [i32; 4]) -> Value {
    json!({
        "cafe_id": cafe_id,
        "member_id": "00000000-0000-0000-0000-000000000042",
        "content": "Nice place",
        "index": {
            "coffee": index[0],
            "space": index[1],
            "price": index[2],
            "noise": index[3],
        },
    })
}

fn orphan_batch(prefix: &str, n: usize) -> Value {
    json!({
        "file_names": (0..n).map(|i| format!("{prefix}-{i}.png")).collect::<Vec<_>>(),
        "file_types": vec!["image"; n],
        "domains": vec!["review"; n],
        "urls": (0..n).map(|i| format!("https://bucket.example/{prefix}/{i}.png")).collect::<Vec<_>>(),
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cafe-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Cafes and reviews
// =============================================================================

#[tokio::test]
async fn test_create_and_get_cafe() {
    let (_dir, app) = setup_app().await;
    let id = create_cafe(&app, "Moss & Mug").await;

    let (status, body) = send(&app, "GET", &format!("/api/cafes/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Moss & Mug");
    assert_eq!(body["types"]["dominant_type"], "NONE");
    assert_eq!(body["themes"]["current_theme"], Value::Null);
}

#[tokio::test]
async fn test_empty_cafe_name_rejected() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/cafes", Some(json!({ "name": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_cafe_is_404() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/cafes/00000000-0000-0000-0000-00000000dead",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_review_classifies_cafe() {
    let (_dir, app) = setup_app().await;
    let cafe_id = create_cafe(&app, "Penny Pour").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(review_body(&cafe_id, [3, 3, 4, 3])),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cafe"]["types"]["price_total"], 4);
    assert_eq!(body["cafe"]["types"]["dominant_type"], "COST_EFFECTIVE");
    assert_eq!(body["review"]["index"]["price"], 4);
}

#[tokio::test]
async fn test_out_of_range_index_rejected() {
    let (_dir, app) = setup_app().await;
    let cafe_id = create_cafe(&app, "Penny Pour").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(review_body(&cafe_id, [3, 3, 4, 0])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INDEX_OUT_OF_RANGE");

    let (_, cafe) = send(&app, "GET", &format!("/api/cafes/{cafe_id}"), None).await;
    assert_eq!(cafe["version"], 0);
}

#[tokio::test]
async fn test_review_images_and_theme() {
    let (_dir, app) = setup_app().await;
    let cafe_id = create_cafe(&app, "Gallery Grounds").await;

    let mut body = review_body(&cafe_id, [5, 4, 2, 1]);
    body["image_urls"] = json!(["A", "B", "B"]);
    body["theme"] = json!("rooftop");
    let (status, created) = send(&app, "POST", "/api/reviews", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["images"].as_array().unwrap().len(), 2);
    assert_eq!(created["review"]["theme"], "ETC");
    assert_eq!(created["cafe"]["themes"]["current_theme"], "ETC");

    let review_id = created["review"]["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/reviews/{review_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["images"][0]["url"], "A");
    assert_eq!(fetched["images"][1]["url"], "B");
}

#[tokio::test]
async fn test_too_many_images_rejected() {
    let (_dir, app) = setup_app().await;
    let cafe_id = create_cafe(&app, "Gallery Grounds").await;

    let mut body = review_body(&cafe_id, [5, 4, 2, 1]);
    body["image_urls"] = json!(["A", "B", "C", "D"]);
    let (status, error) = send(&app, "POST", "/api/reviews", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "TOO_MANY_IMAGES");
}

#[tokio::test]
async fn test_update_review_index() {
    let (_dir, app) = setup_app().await;
    let cafe_id = create_cafe(&app, "Fickle Filter").await;
    let (_, created) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(review_body(&cafe_id, [1, 1, 1, 2])),
    )
    .await;
    let review_id = created["review"]["id"].as_str().unwrap();
    let uri = format!("/api/reviews/{review_id}/index");

    let (status, error) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "coffee": 6, "space": 1, "price": 1, "noise": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "INDEX_OUT_OF_RANGE");

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "coffee": 5, "space": 1, "price": 1, "noise": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["index"]["coffee"], 5);
}

// =============================================================================
// Orphan files
// =============================================================================

#[tokio::test]
async fn test_orphan_batch_recorded() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/orphan-files", Some(orphan_batch("ok", 10))).await;

    assert_eq!(status, StatusCode::CREATED);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[0]["file_type"], "IMAGE");
    assert_eq!(records[0]["domain"], "REVIEW");
    assert_eq!(records[0]["is_hard_deleted"], false);

    let (_, live) = send(&app, "GET", "/api/orphan-files", None).await;
    assert_eq!(live.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_orphan_batch_errors_are_distinct() {
    let (_dir, app) = setup_app().await;

    let mut duplicate = orphan_batch("dup", 2);
    duplicate["urls"][1] = duplicate["urls"][0].clone();
    let mut bad_type = orphan_batch("type", 2);
    bad_type["file_types"][0] = json!("illegalType");
    let mut bad_domain = orphan_batch("domain", 2);
    bad_domain["domains"][1] = json!("cafe");
    let mut mismatched = orphan_batch("short", 2);
    mismatched["domains"] = json!(["review"]);

    let cases = [
        (duplicate, StatusCode::BAD_REQUEST, "DUPLICATE_REQUEST_FILE"),
        (bad_type, StatusCode::BAD_REQUEST, "ILLEGAL_FILE_TYPE"),
        (bad_domain, StatusCode::BAD_REQUEST, "ILLEGAL_DOMAIN"),
        (orphan_batch("big", 11), StatusCode::BAD_REQUEST, "TOO_MANY_ORPHAN_FILES"),
        (mismatched, StatusCode::BAD_REQUEST, "MISMATCHED_ORPHAN_FIELDS"),
    ];

    for (batch, expected_status, expected_code) in cases {
        let (status, body) = send(&app, "POST", "/api/orphan-files", Some(batch)).await;
        assert_eq!(status, expected_status, "{expected_code}");
        assert_eq!(body["error"]["code"], expected_code);
    }

    let (_, live) = send(&app, "GET", "/api/orphan-files", None).await;
    assert!(live.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_orphan_resubmission_after_hard_delete() {
    let (_dir, app) = setup_app().await;
    let batch = orphan_batch("again", 1);

    let (status, first) = send(&app, "POST", "/api/orphan-files", Some(batch.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&app, "POST", "/api/orphan-files", Some(batch.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"]["code"], "DUPLICATE_ORPHAN_FILE");

    let id = first[0]["id"].as_str().unwrap();
    let (status, deleted) = send(
        &app,
        "POST",
        &format!("/api/orphan-files/{id}/hard-delete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["is_hard_deleted"], true);

    let (status, _) = send(&app, "POST", "/api/orphan-files", Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
}
