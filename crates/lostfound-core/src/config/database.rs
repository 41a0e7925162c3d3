//! PostgreSQL settings.
//!
//! The pool is shared by request handlers and the match trigger, so it is
//! sized against `worker.matcher_concurrency` rather than raw throughput.

use serde::{Deserialize, Serialize};

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds a caller waits for a free connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Seconds before an idle connection is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Server-side `statement_timeout` in milliseconds; 0 disables it.
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_ms: u64,
    /// Reported to PostgreSQL as `application_name`.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Apply embedded migrations at startup.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// `(min, max)` pool sizes with `max >= 1` and `min <= max`.
    pub fn pool_bounds(&self) -> (u32, u32) {
        let max = self.max_connections.max(1);
        (self.min_connections.min(max), max)
    }

    /// Whether the pool leaves room for requests while `matcher_concurrency`
    /// matcher runs each hold a connection.
    pub fn covers_matcher(&self, matcher_concurrency: usize) -> bool {
        let (_, max) = self.pool_bounds();
        usize::try_from(max).is_ok_and(|max| max > matcher_concurrency)
    }
}

fn default_max_connections() -> u32 {
    12
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_statement_timeout() -> u64 {
    15_000
}

fn default_application_name() -> String {
    "lostfound".to_string()
}

fn default_run_migrations() -> bool {
    true
}
