//! Monthly metrics recomputation.

pub mod service;

pub use service::MetricsService;
