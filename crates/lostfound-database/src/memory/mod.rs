//! In-process implementation of every store trait.

pub mod store;

pub use store::MemoryStore;
