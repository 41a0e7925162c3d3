//! Event trigger and scheduler configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron scheduler runs in this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of matcher executions running at once.
    #[serde(default = "default_matcher_concurrency")]
    pub matcher_concurrency: usize,
    /// Capacity of the item-reported event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Six-field cron expression for the metrics recompute.
    #[serde(default = "default_metrics_cron")]
    pub metrics_cron: String,
    /// Seconds to wait for in-flight matcher executions on shutdown.
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            matcher_concurrency: default_matcher_concurrency(),
            event_buffer: default_event_buffer(),
            metrics_cron: default_metrics_cron(),
            drain_timeout_seconds: default_drain_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_matcher_concurrency() -> usize {
    8
}

fn default_event_buffer() -> usize {
    1024
}

fn default_metrics_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_drain_timeout() -> u64 {
    30
}
