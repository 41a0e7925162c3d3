//! # lostfound-entity
//!
//! Domain records for the campus lost & found service. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! persisted entities additionally derive `sqlx::FromRow`.

pub mod item;
pub mod matching;
pub mod metrics;
pub mod notification;
pub mod user;
