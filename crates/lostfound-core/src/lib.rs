//! # lostfound-core
//!
//! Core crate for the campus lost & found service. Contains configuration
//! schemas, typed identifiers, the push-delivery collaborator trait and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other lost & found crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
