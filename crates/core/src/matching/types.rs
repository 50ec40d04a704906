//! Types for the match engine and match store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::posting::StoreError;
use crate::profile::ProfileError;

/// Errors that can occur while computing or storing matches.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Profile store error: {0}")]
    Profile(String),
}

impl From<ProfileError> for MatchError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound(id) => MatchError::ProfileNotFound(id),
            other => MatchError::Profile(other.to_string()),
        }
    }
}

/// Per-factor scores, each already scaled to 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub required_skill_coverage: f64,
    pub preferred_skill_coverage: f64,
    pub experience_fit: f64,
    pub recency_factor: f64,
}

/// One computed compatibility score for a (profile, posting) pair.
///
/// Always written whole: a recompute fully replaces the stored row so
/// the breakdown can never go stale against the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub profile_id: String,
    pub posting_id: String,
    /// Weighted score in 0..=100, rounded to two decimals.
    pub score: f64,
    pub breakdown: MatchBreakdown,
    /// Required skills the profile does not cover.
    pub missing_required_skills: Vec<String>,
}

/// A match as read back from the store.
#[derive(Debug, Clone)]
pub struct StoredMatch {
    pub result: MatchResult,
    pub computed_at: DateTime<Utc>,
}

/// A match joined with the posting fields a caller wants to display.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRow {
    pub posting_id: String,
    pub title: String,
    pub employer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<NaiveDate>,
    pub score: f64,
    pub breakdown: MatchBreakdown,
    pub missing_required_skills: Vec<String>,
    pub computed_at: DateTime<Utc>,
}
