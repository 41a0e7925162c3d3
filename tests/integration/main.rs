//! HTTP integration tests driven through the full router over the
//! in-memory store.

mod helpers;

mod health_test;
mod item_test;
mod match_test;
mod metrics_test;
mod notification_test;
