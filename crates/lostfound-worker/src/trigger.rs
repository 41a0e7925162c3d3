//! Match trigger: consumes item events and runs the matcher for each one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tracing::{debug, error, info, warn};

use lostfound_core::config::worker::WorkerConfig;
use lostfound_entity::item::ItemReported;
use lostfound_service::events::EventReceiver;
use lostfound_service::matching::CandidateMatcher;

/// Runs one matcher execution per item event, with bounded concurrency.
#[derive(Debug)]
pub struct MatchTrigger {
    /// The matcher to run.
    matcher: Arc<CandidateMatcher>,
    /// Maximum concurrent executions.
    concurrency: usize,
    /// How long shutdown waits for in-flight executions.
    drain_timeout: Duration,
}

impl MatchTrigger {
    /// Create a new trigger
    pub fn new(matcher: Arc<CandidateMatcher>, config: &WorkerConfig) -> Self {
        Self {
            matcher,
            concurrency: config.matcher_concurrency.max(1),
            drain_timeout: Duration::from_secs(config.drain_timeout_seconds),
        }
    }

    /// Consume events until the cancel signal is received or every
    /// publisher is gone, then wait for in-flight executions.
    ///
    /// On cancel the channel is closed to new events and every event
    /// already buffered is still run.
    pub async fn run(&self, mut events: EventReceiver, mut cancel: watch::Receiver<bool>) {
        info!(concurrency = self.concurrency, "Match trigger started");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Match trigger received shutdown signal");
                        events.close();
                        break;
                    }
                }
                event = events.recv() => match event {
                    Some(event) => self.dispatch(&semaphore, event).await,
                    None => {
                        info!("Item event channel closed");
                        break;
                    }
                },
            }
        }

        let mut buffered = 0usize;
        while let Some(event) = events.recv().await {
            buffered += 1;
            self.dispatch(&semaphore, event).await;
        }
        if buffered > 0 {
            info!(buffered, "Dispatched buffered item events");
        }

        debug!("Match trigger waiting for in-flight executions");
        let all = u32::try_from(self.concurrency).unwrap_or(u32::MAX);
        if tokio::time::timeout(self.drain_timeout, semaphore.acquire_many(all))
            .await
            .is_err()
        {
            warn!("Match trigger drain timed out");
        }

        info!("Match trigger shut down");
    }

    /// Spawn one matcher execution once a slot is free.
    async fn dispatch(&self, semaphore: &Arc<Semaphore>, event: ItemReported) {
        let matcher = Arc::clone(&self.matcher);
        match Arc::clone(semaphore).acquire_owned().await {
            Ok(permit) => {
                tokio::spawn(async move {
                    let _permit = permit;
                    execute(&matcher, &event).await;
                });
            }
            Err(_) => execute(&matcher, &event).await,
        }
    }
}

async fn execute(matcher: &CandidateMatcher, event: &ItemReported) {
    if let Err(e) = matcher.on_item_reported(event).await {
        error!(
            item_id = %event.item.id,
            transient = e.kind.is_transient(),
            error = %e,
            "Candidate matching aborted"
        );
    }
}
