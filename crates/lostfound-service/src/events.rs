//! In-process delivery of item creation events to the matcher trigger.

use tokio::sync::mpsc;
use tracing::debug;

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_entity::item::ItemReported;

/// Receiving half handed to the worker that runs the matcher.
pub type EventReceiver = mpsc::Receiver<ItemReported>;

/// Publishing half of the item event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: mpsc::Sender<ItemReported>,
}

impl EventBus {
    /// Creates a bounded bus and its receiver.
    pub fn channel(buffer: usize) -> (Self, EventReceiver) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }

    /// Publishes an event, waiting for buffer space when the trigger lags.
    pub async fn publish(&self, event: ItemReported) -> AppResult<()> {
        let item_id = event.item.id;
        self.sender
            .send(event)
            .await
            .map_err(|_| AppError::service_unavailable("Item event consumer has stopped"))?;
        debug!(item_id = %item_id, "Item event published");
        Ok(())
    }

    /// Whether the consumer is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
