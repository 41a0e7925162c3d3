//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::Utc;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use lostfound_api::{AppState, build_router};
use lostfound_core::config::{MatchingConfig, ServerConfig};
use lostfound_core::traits::push::PushDispatcher;
use lostfound_core::types::id::UserId;
use lostfound_database::MemoryStore;
use lostfound_entity::user::UserProfile;
use lostfound_push::NoopPushDispatcher;
use lostfound_service::{
    CandidateMatcher, EventBus, EventReceiver, ItemService, MatchLifecycleService, MatcherReport,
    MetricsService, NotificationService,
};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: MemoryStore,
    /// Matcher driven by [`TestApp::run_matcher`]
    matcher: Arc<CandidateMatcher>,
    /// Item events published by the router
    events: Mutex<EventReceiver>,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let shared = Arc::new(store.clone());
        let push: Arc<dyn PushDispatcher> = Arc::new(NoopPushDispatcher);

        let notifications = Arc::new(NotificationService::new(shared.clone(), push));
        let lifecycle = Arc::new(MatchLifecycleService::new(
            shared.clone(),
            shared.clone(),
            Arc::clone(&notifications),
        ));
        let metrics = Arc::new(MetricsService::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
        ));
        let matcher = Arc::new(CandidateMatcher::new(
            shared.clone(),
            Arc::clone(&lifecycle),
            &MatchingConfig::default(),
        ));
        let (bus, events) = EventBus::channel(64);
        let items = Arc::new(ItemService::new(
            shared.clone(),
            Arc::clone(&metrics),
            bus,
            Arc::clone(&matcher),
        ));

        let state = AppState::new(items, lifecycle, notifications, metrics);
        let router = build_router(state, &ServerConfig::default());

        Self {
            router,
            store,
            matcher,
            events: Mutex::new(events),
        }
    }

    /// Register a user profile and return its id
    pub fn create_user(&self, name: &str) -> UserId {
        let id = UserId::new();
        self.store.put_user(UserProfile {
            id,
            display_name: name.to_string(),
            push_token: None,
            created_at: Utc::now(),
        });
        id
    }

    /// Run the matcher for every item event published so far
    pub async fn run_matcher(&self) -> Vec<MatcherReport> {
        let mut events = self.events.lock().await;
        let mut reports = Vec::new();
        while let Ok(event) = events.try_recv() {
            reports.push(
                self.matcher
                    .on_item_reported(&event)
                    .await
                    .expect("matcher run failed"),
            );
        }
        reports
    }

    /// Report an item as `user` and return the created item's id
    pub async fn report(
        &self,
        user: (UserId, &str),
        status: &str,
        title: &str,
        location: &str,
    ) -> String {
        let response = self
            .request(
                "POST",
                "/api/items",
                Some(serde_json::json!({
                    "title": title,
                    "description": "",
                    "category": "electronics",
                    "location": location,
                    "occurred_at": Utc::now(),
                    "status": status,
                })),
                Some(user),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("item id")
            .to_string()
    }

    /// Make a request as `user`, or anonymously when `None`
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<(UserId, &str)>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some((id, name)) = user {
            req = req
                .header("X-User-Id", id.to_string())
                .header("X-User-Name", name);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
