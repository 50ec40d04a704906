//! Recomputing and listing a profile's matches.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::posting::{Posting, PostingStore};
use crate::profile::ProfileStore;

use super::engine::MatchEngine;
use super::store::{MatchFilter, MatchStore};
use super::types::{MatchError, MatchRow, StoredMatch};

/// Scores a profile against the posting corpus and keeps the match
/// store in step.
///
/// The posting and match stores are separate concerns; the join back
/// to posting display fields happens here, in code.
pub struct MatchRecomputer {
    engine: MatchEngine,
    postings: Arc<dyn PostingStore>,
    matches: Arc<dyn MatchStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl MatchRecomputer {
    pub fn new(
        engine: MatchEngine,
        postings: Arc<dyn PostingStore>,
        matches: Arc<dyn MatchStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            engine,
            postings,
            matches,
            profiles,
        }
    }

    /// Re-score the profile against every active posting, upserting
    /// each result. Returns how many postings were scored.
    ///
    /// Scoring is deterministic for a given day, so recomputing twice
    /// rewrites identical rows.
    pub fn recompute_all(&self, profile_id: &str) -> Result<u32, MatchError> {
        let profile = self
            .profiles
            .get(profile_id)?
            .ok_or_else(|| MatchError::ProfileNotFound(profile_id.to_string()))?;

        let postings = self.postings.list_active()?;
        let today = Utc::now().date_naive();

        for posting in &postings {
            let result = self.engine.score(&profile, posting, today);
            crate::metrics::MATCH_SCORES
                .with_label_values(&[])
                .observe(result.score);
            self.matches.upsert(&result)?;
        }

        debug!(
            profile_id = profile_id,
            postings = postings.len(),
            "Matches recomputed"
        );

        Ok(postings.len() as u32)
    }

    /// Recompute, then return the filtered ranking.
    pub fn recompute_profile(
        &self,
        profile_id: &str,
        filter: &MatchFilter,
    ) -> Result<Vec<MatchRow>, MatchError> {
        self.recompute_all(profile_id)?;
        self.list_matches(profile_id, filter)
    }

    /// The profile's stored ranking, joined with posting display
    /// fields. Matches whose posting has disappeared are skipped.
    pub fn list_matches(
        &self,
        profile_id: &str,
        filter: &MatchFilter,
    ) -> Result<Vec<MatchRow>, MatchError> {
        if self.profiles.get(profile_id)?.is_none() {
            return Err(MatchError::ProfileNotFound(profile_id.to_string()));
        }

        let stored = self.matches.list_for_profile(profile_id, filter)?;

        let mut rows = Vec::with_capacity(stored.len());
        for entry in stored {
            let Some(posting) = self.postings.get(&entry.result.posting_id)? else {
                continue;
            };
            rows.push(to_row(entry, &posting));
        }

        Ok(rows)
    }
}

fn to_row(stored: StoredMatch, posting: &Posting) -> MatchRow {
    MatchRow {
        posting_id: stored.result.posting_id,
        title: posting.title.clone(),
        employer: posting.employer.clone(),
        location: posting.location.clone(),
        url: posting.url.clone(),
        posted_date: posting.posted_date,
        score: stored.result.score,
        breakdown: stored.result.breakdown,
        missing_required_skills: stored.result.missing_required_skills,
        computed_at: stored.computed_at,
    }
}
