//! # lostfound-service
//!
//! Business logic service layer for the lost & found service. Services
//! orchestrate the store traits and the push dispatcher to implement
//! report submission, candidate matching, the match lifecycle, the
//! notification inbox and metrics recomputation.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod events;
pub mod item;
pub mod matching;
pub mod metrics;
pub mod notification;
pub mod similarity;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use events::{EventBus, EventReceiver};
pub use item::{ItemReport, ItemService};
pub use matching::{CandidateMatcher, MatchLifecycleService, MatchRequest, MatcherReport};
pub use metrics::MetricsService;
pub use notification::NotificationService;
pub use similarity::similarity;
