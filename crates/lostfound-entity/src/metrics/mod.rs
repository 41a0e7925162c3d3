//! Derived usage metrics.

pub mod snapshot;

pub use snapshot::{MetricsSnapshot, period_key};
