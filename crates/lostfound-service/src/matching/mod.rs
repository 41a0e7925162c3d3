//! Candidate matching and the match lifecycle.

pub mod lifecycle;
pub mod matcher;

pub use lifecycle::{MatchLifecycleService, MatchRequest};
pub use matcher::{CandidateMatcher, MatcherReport};
