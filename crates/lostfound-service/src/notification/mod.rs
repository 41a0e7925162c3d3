//! Notification dispatch, inbox management and message composition.

pub mod messages;
pub mod service;

pub use service::NotificationService;
