//! Expo push service dispatcher.
//!
//! Resolves the recipient's device token through the [`UserDirectory`] and
//! posts one message per send to the Expo push endpoint. Users without a
//! registered token are skipped silently; delivery failures are logged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lostfound_core::config::push::PushConfig;
use lostfound_core::error::{AppError, ErrorKind};
use lostfound_core::result::AppResult;
use lostfound_core::traits::push::{PushDispatcher, PushMessage};
use lostfound_core::types::id::UserId;
use lostfound_database::store::UserDirectory;

/// Request body accepted by the Expo push endpoint.
#[derive(Debug, Serialize)]
struct ExpoMessage<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    data: &'a HashMap<String, String>,
    sound: &'static str,
}

/// Per-message receipt returned by Expo.
#[derive(Debug, Default, Deserialize)]
struct ExpoTicket {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExpoResponse {
    #[serde(default)]
    data: Option<ExpoTicket>,
}

/// Push dispatcher backed by the Expo push service.
#[derive(Debug, Clone)]
pub struct ExpoPushDispatcher {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Push endpoint URL.
    endpoint: String,
    /// Optional bearer token for enhanced push security.
    access_token: Option<String>,
    /// Source of device tokens.
    users: Arc<dyn UserDirectory>,
}

impl ExpoPushDispatcher {
    /// Creates a dispatcher from configuration.
    pub fn new(config: &PushConfig, users: Arc<dyn UserDirectory>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build push client", e)
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            access_token: config.access_token.clone(),
            users,
        })
    }

    async fn deliver(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        let mut request = self.client.post(&self.endpoint).json(&ExpoMessage {
            to: token,
            title: &message.title,
            body: &message.body,
            data: &message.data,
            sound: "default",
        });
        if let Some(access_token) = &self.access_token {
            request = request.bearer_auth(access_token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Push request failed", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Push endpoint returned {status}"
            )));
        }

        let receipt: ExpoResponse = response.json().await.unwrap_or_default();
        match receipt.data {
            Some(ticket) if ticket.status == "error" => Err(AppError::external_service(format!(
                "Push rejected: {}",
                ticket.message.unwrap_or_default()
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PushDispatcher for ExpoPushDispatcher {
    async fn send(&self, recipient: UserId, message: PushMessage) {
        let token = match self.users.get_user(recipient).await {
            Ok(Some(profile)) => profile.push_token,
            Ok(None) => None,
            Err(e) => {
                warn!(recipient_id = %recipient, error = %e, "Push token lookup failed");
                return;
            }
        };

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            debug!(recipient_id = %recipient, "No push token registered, skipping");
            return;
        };

        match self.deliver(&token, &message).await {
            Ok(()) => debug!(recipient_id = %recipient, "Push delivered"),
            Err(e) => warn!(recipient_id = %recipient, error = %e, "Push delivery failed"),
        }
    }
}
