//! Collaborator traits defined in `lostfound-core` and implemented by other crates.

pub mod push;

pub use push::{PushDispatcher, PushMessage};
