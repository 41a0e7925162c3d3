//! Integration tests for the notification inbox.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_claim_notifies_owner_and_inbox_operations() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");

    let found = app
        .report((alice, "Alice"), "found", "Student ID card", "Bookstore")
        .await;
    let response = app
        .request(
            "POST",
            "/api/matches",
            Some(serde_json::json!({ "item_id": found })),
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request("GET", "/api/notifications", None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let inbox = response.body["data"].as_array().expect("array");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["sender_name"], "Bob");
    assert_eq!(inbox[0]["item_title"], "Student ID card");
    let notification_id = inbox[0]["id"].as_str().expect("id").to_string();

    // The claimant's inbox is untouched.
    let response = app
        .request("GET", "/api/notifications", None, Some((bob, "Bob")))
        .await;
    assert!(response.body["data"].as_array().expect("array").is_empty());

    let response = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.body["data"]["count"], 1);

    // Another user cannot touch Alice's notification.
    let response = app
        .request(
            "PUT",
            &format!("/api/notifications/{notification_id}/read"),
            None,
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PUT",
            &format!("/api/notifications/{notification_id}/read"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.body["data"]["count"], 0);

    let response = app
        .request(
            "DELETE",
            &format!("/api/notifications/{notification_id}"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/notifications", None, Some((alice, "Alice")))
        .await;
    assert!(response.body["data"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_decision_notifies_requester_and_read_all() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");

    let found = app
        .report((alice, "Alice"), "found", "Red mittens", "Quad")
        .await;
    let response = app
        .request(
            "POST",
            "/api/matches",
            Some(serde_json::json!({ "item_id": found })),
            Some((bob, "Bob")),
        )
        .await;
    let match_id = response.body["data"]["id"]
        .as_str()
        .expect("match id")
        .to_string();

    app.request(
        "POST",
        &format!("/api/matches/{match_id}/approve"),
        None,
        Some((alice, "Alice")),
    )
    .await;

    let response = app
        .request("GET", "/api/notifications", None, Some((bob, "Bob")))
        .await;
    let inbox = response.body["data"].as_array().expect("array");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["notification_type"], "match_approved");

    let response = app
        .request("PUT", "/api/notifications/read-all", None, Some((bob, "Bob")))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["marked"], 1);

    let response = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.body["data"]["count"], 0);
}
