//! # lostfound-push
//!
//! Implementations of [`PushDispatcher`] and a factory that selects one
//! from [`PushConfig`].

pub mod expo;
pub mod noop;

use std::sync::Arc;

use lostfound_core::config::push::{PushConfig, PushProvider};
use lostfound_core::result::AppResult;
use lostfound_core::traits::push::PushDispatcher;
use lostfound_database::store::UserDirectory;

pub use expo::ExpoPushDispatcher;
pub use noop::NoopPushDispatcher;

/// Builds the dispatcher selected by `config.provider`.
pub fn build_dispatcher(
    config: &PushConfig,
    users: Arc<dyn UserDirectory>,
) -> AppResult<Arc<dyn PushDispatcher>> {
    Ok(match config.provider {
        PushProvider::Expo => Arc::new(ExpoPushDispatcher::new(config, users)?),
        PushProvider::None => Arc::new(NoopPushDispatcher),
    })
}
