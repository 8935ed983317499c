// src/config.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Minimum run length (in lines) for block recognition. Shorter runs of
    /// identical lines are treated as coincidence, not moved code: a wrong
    /// match is worse than no match.
    #[serde(default = "default_min_block_size")]
    pub min_block_size: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_block_size: default_min_block_size(),
        }
    }
}

fn default_min_block_size() -> usize {
    3
}
