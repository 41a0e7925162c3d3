//! HTTP request handlers, one module per resource.

pub mod health;
pub mod item;
pub mod matching;
pub mod metrics;
pub mod notification;
