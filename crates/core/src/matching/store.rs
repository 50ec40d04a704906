//! Match store trait.

use crate::posting::StoreError;

use super::types::{MatchResult, StoredMatch};

/// Filter for listing a profile's matches.
///
/// Both fields are optional response filters; an empty filter returns
/// the profile's full ranking.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    /// Drop matches scoring below this value.
    pub min_score: Option<f64>,
    /// Maximum number of results; unbounded when absent.
    pub limit: Option<i64>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Persistence for computed matches, keyed by (profile, posting).
pub trait MatchStore: Send + Sync {
    /// Insert or fully replace the match for the result's key.
    fn upsert(&self, result: &MatchResult) -> Result<(), StoreError>;

    /// Fetch one match by key.
    fn get(&self, profile_id: &str, posting_id: &str) -> Result<Option<StoredMatch>, StoreError>;

    /// A profile's matches, best score first; ties break on posting id
    /// so the order is stable.
    fn list_for_profile(
        &self,
        profile_id: &str,
        filter: &MatchFilter,
    ) -> Result<Vec<StoredMatch>, StoreError>;
}
