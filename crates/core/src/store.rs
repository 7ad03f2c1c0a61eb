//! Best-score persistence seam.
//!
//! The core only decides whether a score is a new best; where and how it is
//! stored belongs to the implementor.

use std::collections::HashMap;

use crate::error::StoreError;

/// Persistence collaborator for best scores, keyed by session label
pub trait ScoreStore {
    /// Best score recorded for `label`, 0 when none
    fn load_best(&self, label: &str) -> Result<u32, StoreError>;

    fn save_best(&mut self, label: &str, score: u32) -> Result<(), StoreError>;
}

/// In-memory store, for tests and sessions without a score directory
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<String, u32>,
}

impl ScoreStore for MemoryScoreStore {
    fn load_best(&self, label: &str) -> Result<u32, StoreError> {
        Ok(self.scores.get(label).copied().unwrap_or(0))
    }

    fn save_best(&mut self, label: &str, score: u32) -> Result<(), StoreError> {
        self.scores.insert(label.to_string(), score);
        Ok(())
    }
}
