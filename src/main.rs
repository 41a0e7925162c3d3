//! Lost & Found server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use lostfound_api::{AppState, build_router};
use lostfound_core::config::AppConfig;
use lostfound_core::error::AppError;
use lostfound_database::DatabasePool;
use lostfound_database::repositories::{
    ItemRepository, MatchRepository, MetricsRepository, NotificationRepository, UserRepository,
};
use lostfound_service::{
    CandidateMatcher, EventBus, ItemService, MatchLifecycleService, MetricsService,
    NotificationService,
};
use lostfound_worker::{CronScheduler, MatchTrigger};

#[tokio::main]
async fn main() {
    let env = std::env::var("LOSTFOUND_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting lost & found server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if !config.database.covers_matcher(config.worker.matcher_concurrency) {
        tracing::warn!(
            max_connections = config.database.max_connections,
            matcher_concurrency = config.worker.matcher_concurrency,
            "Pool can be exhausted by matcher runs alone"
        );
    }
    if config.database.run_migrations {
        lostfound_database::migration::run_migrations(db.pool()).await?;
    } else {
        tracing::info!("Schema migrations disabled");
    }

    // ── Step 2: Repositories ─────────────────────────────────────
    let item_repo = Arc::new(ItemRepository::new(db.pool().clone()));
    let match_repo = Arc::new(MatchRepository::new(db.pool().clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db.pool().clone()));
    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let metrics_repo = Arc::new(MetricsRepository::new(db.pool().clone()));

    // ── Step 3: Push delivery ────────────────────────────────────
    let push = lostfound_push::build_dispatcher(&config.push, user_repo.clone())?;
    tracing::info!(provider = ?config.push.provider, "Push dispatcher initialized");

    // ── Step 4: Services ─────────────────────────────────────────
    let notification_service = Arc::new(NotificationService::new(notification_repo, push));
    let match_service = Arc::new(MatchLifecycleService::new(
        item_repo.clone(),
        match_repo,
        Arc::clone(&notification_service),
    ));
    let metrics_service = Arc::new(MetricsService::new(
        item_repo.clone(),
        user_repo,
        metrics_repo,
    ));

    let matcher = Arc::new(CandidateMatcher::new(
        item_repo.clone(),
        Arc::clone(&match_service),
        &config.matching,
    ));
    let (event_bus, events) = EventBus::channel(config.worker.event_buffer.max(1));
    let item_service = Arc::new(ItemService::new(
        item_repo,
        Arc::clone(&metrics_service),
        event_bus,
        Arc::clone(&matcher),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Match trigger ────────────────────────────────────
    let trigger = MatchTrigger::new(matcher, &config.worker);
    let trigger_handle = tokio::spawn(async move {
        trigger.run(events, shutdown_rx).await;
    });

    // ── Step 6: Cron scheduler ───────────────────────────────────
    let scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(Arc::clone(&metrics_service)).await?;
        scheduler
            .register_metrics_recompute(&config.worker.metrics_cron)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Cron scheduler disabled");
        None
    };

    // ── Step 7: HTTP server ──────────────────────────────────────
    let state = AppState::new(
        item_service,
        match_service,
        notification_service,
        metrics_service,
    );
    let app = build_router(state, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Lost & found server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for background tasks ────────────────────────
    // Requests have drained, so no further item events can be published.
    tracing::info!("Waiting for background tasks to complete...");
    let _ = shutdown_tx.send(true);

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    if tokio::time::timeout(grace, trigger_handle).await.is_err() {
        tracing::warn!("Match trigger did not stop within the grace period");
    }

    db.close().await;
    tracing::info!("Lost & found server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
