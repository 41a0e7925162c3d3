//! # lostfound-api
//!
//! HTTP API layer for the lost & found service built on Axum.
//!
//! Provides the REST endpoints for item reports, match requests and
//! decisions, the notification inbox and metrics, together with the
//! identity extractor, middleware and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
