//! # lostfound-database
//!
//! Store traits consumed by the service layer, PostgreSQL implementations
//! of those traits, connection management, and an in-process store used by
//! tests and single-node development runs.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use store::{
    ApprovalCommit, ApprovalOutcome, ItemStore, MatchStore, MetricsStore, NotificationStore,
    UserDirectory,
};
