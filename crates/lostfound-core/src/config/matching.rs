//! Candidate matcher configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the candidate matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Title similarity a candidate must strictly exceed to match on title.
    #[serde(default = "default_threshold")]
    pub title_similarity_threshold: f64,
    /// Skip a candidate when the new reporter already has a pending match
    /// on the existing item.
    #[serde(default = "default_true")]
    pub dedupe_pending: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            title_similarity_threshold: default_threshold(),
            dedupe_pending: true,
        }
    }
}

fn default_threshold() -> f64 {
    0.6
}

fn default_true() -> bool {
    true
}
