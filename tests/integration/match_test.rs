//! Integration tests for the match workflow.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_similar_reports_produce_a_match_the_owner_can_approve() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");

    let lost = app
        .report((alice, "Alice"), "lost", "Black iPhone 13", "Library")
        .await;
    // Nothing to match against yet.
    assert!(app.run_matcher().await.iter().all(|r| r.created.is_empty()));

    let found = app
        .report((bob, "Bob"), "found", "black iphone 13", "Gym")
        .await;

    let reports = app.run_matcher().await;
    let created: usize = reports.iter().map(|r| r.created.len()).sum();
    assert_eq!(created, 1);

    // The found report matched the existing lost report.
    let response = app
        .request(
            "GET",
            &format!("/api/items/{lost}/matches"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let matches = response.body["data"].as_array().expect("array");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["counterpart_item_id"], found.as_str());
    assert_eq!(matches[0]["requester_id"], bob.to_string());
    let match_id = matches[0]["id"].as_str().expect("match id").to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/matches/{match_id}/approve"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "approved");
    assert_eq!(response.body["data"]["item_owner_approved"], true);

    let response = app
        .request("GET", &format!("/api/items/{lost}"), None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.body["data"]["partition"], "matched_items");
    assert_eq!(response.body["data"]["is_matched"], true);

    let response = app
        .request("GET", "/api/items?status=lost", None, Some((alice, "Alice")))
        .await;
    assert!(response.body["data"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_dissimilar_reports_in_different_places_do_not_match() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");

    app.report((alice, "Alice"), "lost", "Laptop charger", "Library")
        .await;
    app.report((bob, "Bob"), "found", "Headphones", "Gym").await;

    let reports = app.run_matcher().await;
    assert!(reports.iter().all(|r| r.created.is_empty()));
}

#[tokio::test]
async fn test_claim_then_reject() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");

    let found = app
        .report((alice, "Alice"), "found", "Silver ring", "Chapel")
        .await;

    let response = app
        .request(
            "POST",
            "/api/matches",
            Some(serde_json::json!({ "item_id": found })),
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let match_id = response.body["data"]["id"]
        .as_str()
        .expect("match id")
        .to_string();

    let response = app
        .request(
            "GET",
            &format!("/api/items/{found}/matches/pending"),
            None,
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.body["data"]["id"], match_id.as_str());

    // A second claim by the same user is refused while the first is open.
    let response = app
        .request(
            "POST",
            "/api/matches",
            Some(serde_json::json!({ "item_id": found })),
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // The requester cannot decide their own request.
    let response = app
        .request(
            "POST",
            &format!("/api/matches/{match_id}/reject"),
            None,
            Some((bob, "Bob")),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/api/matches/{match_id}/reject"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "rejected");

    // Terminal matches cannot be decided again.
    let response = app
        .request(
            "POST",
            &format!("/api/matches/{match_id}/approve"),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "INVALID_STATE");

    let response = app
        .request("GET", &format!("/api/items/{found}"), None, Some((alice, "Alice")))
        .await;
    assert_eq!(response.body["data"]["partition"], "found_items");
}

#[tokio::test]
async fn test_outsider_cannot_decide() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");
    let bob = app.create_user("Bob");
    let carol = app.create_user("Carol");

    let found = app
        .report((alice, "Alice"), "found", "Water bottle", "Track")
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

    let response = app
        .request(
            "POST",
            &format!("/api/matches/{match_id}/approve"),
            None,
            Some((carol, "Carol")),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_approve_unknown_match_is_404() {
    let app = TestApp::new();
    let alice = app.create_user("Alice");

    let response = app
        .request(
            "POST",
            &format!("/api/matches/{}/approve", uuid_like()),
            None,
            Some((alice, "Alice")),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

fn uuid_like() -> &'static str {
    "6f1c2a8e-9d4b-4c3a-8e2f-1b7d5a9c0e11"
}
