//! Integration tests for item reports.

use axum::http::StatusCode;
use chrono::Utc;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_report_requires_identity() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/items",
            Some(serde_json::json!({
                "title": "Umbrella",
                "category": "other",
                "location": "Library",
                "occurred_at": Utc::now(),
                "status": "lost",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_report_and_fetch_item() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");

    let id = app
        .report((alice, "Alice"), "lost", "Blue backpack", "Library")
        .await;

    let response = app
        .request("GET", &format!("/api/items/{id}"), None, Some((alice, "Alice")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let item = &response.body["data"];
    assert_eq!(item["title"], "Blue backpack");
    assert_eq!(item["partition"], "lost_items");
    assert_eq!(item["reporter_name"], "Alice");
    assert_eq!(item["is_active"], true);
}

#[tokio::test]
async fn test_report_rejects_empty_title() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");

    let response = app
        .request(
            "POST",
            "/api/items",
            Some(serde_json::json!({
                "title": "",
                "category": "keys",
                "location": "Gym",
                "occurred_at": Utc::now(),
                "status": "found",
            })),
            Some((alice, "Alice")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");

    app.report((alice, "Alice"), "lost", "Wallet", "Cafeteria")
        .await;
    app.report((alice, "Alice"), "found", "Scarf", "Gym").await;

    let response = app
        .request(
            "GET",
            "/api/items?status=found",
            None,
            Some((alice, "Alice")),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response.body["data"].as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Scarf");
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");

    let response = app
        .request("GET", "/api/items/not-a-uuid", None, Some((alice, "Alice")))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_reporter_can_withdraw() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");

    let id = app
        .report((alice, "Alice"), "lost", "Calculator", "Room 101")
        .await;

    let response = app
        .request("DELETE", &format!("/api/items/{id}"), None, Some((bob, "Bob")))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "DELETE",
            &format!("/api/items/{id}"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/items/{id}"), None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
