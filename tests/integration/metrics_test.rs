//! Integration tests for metrics snapshots.

use axum::http::StatusCode;
use chrono::Utc;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_recompute_counts_partitions_and_users() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    app.create_user("Bob");

    app.report((alice, "Alice"), "lost", "Keys", "Dorm").await;
    app.report((alice, "Alice"), "found", "Pen", "Lab").await;

    let response = app
        .request("POST", "/api/metrics/recompute", None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let snapshot = &response.body["data"];
    assert_eq!(snapshot["lost_items"], 1);
    assert_eq!(snapshot["found_items"], 1);
    assert_eq!(snapshot["matched_items"], 0);
    assert_eq!(snapshot["users"], 2);

    let period = Utc::now().format("%Y-%m").to_string();
    let response = app
        .request(
            "GET",
            &format!("/api/metrics/{period}"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["period"], period.as_str());
}

#[tokio::test]
async fn test_snapshot_period_is_validated() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");

    let response = app
        .request("GET", "/api/metrics/2024-13", None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/metrics/1999-01", None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
