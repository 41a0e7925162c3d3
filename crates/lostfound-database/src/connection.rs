//! PostgreSQL pool setup.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use lostfound_core::config::DatabaseConfig;
use lostfound_core::error::{AppError, ErrorKind};
use lostfound_core::result::AppResult;

/// Shared connection pool for the repositories.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool and fail fast if the server does not answer.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;
        let (min, max) = config.pool_bounds();
        info!(
            host = options.get_host(),
            database = options.get_database().unwrap_or_default(),
            min_connections = min,
            max_connections = max,
            statement_timeout_ms = config.statement_timeout_ms,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max)
            .min_connections(min)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        let db = Self { pool };
        db.ping().await?;
        info!("Connected to PostgreSQL");
        Ok(db)
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Database ping failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Parse the URL and attach per-session settings. Credentials stay inside
/// the options, so only host and database name are ever logged.
fn connect_options(config: &DatabaseConfig) -> AppResult<PgConnectOptions> {
    let mut options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid database URL", e))?
        .application_name(&config.application_name);
    if config.statement_timeout_ms > 0 {
        options = options.options([("statement_timeout", config.statement_timeout_ms)]);
    }
    Ok(options)
}
