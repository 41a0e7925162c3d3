//! Schema migrations embedded from `migrations/`.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use lostfound_core::error::{AppError, ErrorKind};
use lostfound_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply pending migrations. Already-applied versions are skipped by sqlx.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(embedded = MIGRATOR.iter().count(), latest, "Applying schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!(latest, "Schema is current");
    Ok(())
}
