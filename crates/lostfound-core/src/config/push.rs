//! Push delivery configuration.

use serde::{Deserialize, Serialize};

/// Which push backend delivers notifications to devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushProvider {
    /// Expo push service over HTTPS.
    Expo,
    /// Log-only, nothing leaves the process.
    None,
}

/// Push delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Selected provider.
    #[serde(default = "default_provider")]
    pub provider: PushProvider,
    /// Provider endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Optional bearer token for the provider.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            access_token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> PushProvider {
    PushProvider::None
}

fn default_endpoint() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}

fn default_timeout() -> u64 {
    10
}
