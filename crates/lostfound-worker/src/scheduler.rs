//! Cron scheduler for the periodic metrics recompute.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_service::metrics::MetricsService;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Metrics service refreshed on schedule
    metrics: Arc<MetricsService>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(metrics: Arc<MetricsService>) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, metrics })
    }

    /// Metrics recompute on a six-field cron expression
    pub async fn register_metrics_recompute(&self, expression: &str) -> AppResult<()> {
        let metrics = Arc::clone(&self.metrics);
        let job = CronJob::new_async(expression, move |_uuid, _lock| {
            let metrics = Arc::clone(&metrics);
            Box::pin(async move {
                debug!("Running scheduled metrics recompute");
                if let Err(e) = metrics.recompute().await {
                    error!(error = %e, "Scheduled metrics recompute failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid metrics schedule '{expression}': {e}"
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add metrics schedule: {e}"))
        })?;

        info!(schedule = %expression, "Registered: metrics_recompute");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> AppResult<()> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_core::error::ErrorKind;
    use lostfound_database::MemoryStore;

    fn metrics() -> Arc<MetricsService> {
        let store = MemoryStore::new();
        Arc::new(MetricsService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
        ))
    }

    #[tokio::test]
    async fn test_register_valid_schedule() {
        let scheduler = CronScheduler::new(metrics()).await.unwrap();
        scheduler
            .register_metrics_recompute("0 0 * * * *")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_schedule_is_configuration_error() {
        let scheduler = CronScheduler::new(metrics()).await.unwrap();
        let err = scheduler
            .register_metrics_recompute("every hour")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
