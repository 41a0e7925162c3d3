//! Item report submission and lookup.

pub mod service;

pub use service::{ItemReport, ItemService};
