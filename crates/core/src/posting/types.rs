//! Types for the posting store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for store operations.
///
/// A store failure is fatal to whatever operation hit it; there is no
/// retry at this layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A persisted job posting.
///
/// Identity key is the normalized source URL. Created once on first
/// discovery and never mutated by the pipeline afterwards; `active`
/// exists so a future resync can retire postings a source no longer
/// lists, but nothing in this service flips it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    /// Normalized source URL, unique across the store.
    pub url: String,
    pub employer: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Which source adapter reported this posting.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A posting ready to be inserted, before it has an id.
#[derive(Debug, Clone)]
pub struct NewPosting {
    /// Already-normalized source URL.
    pub url: String,
    pub employer: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub experience_years_range: Option<String>,
    pub location: Option<String>,
    pub source: String,
    pub posted_date: Option<NaiveDate>,
}

/// Outcome of an insert-or-skip on the unique URL key.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The URL was not present; the posting was created.
    Inserted(Posting),
    /// The URL already existed; nothing was written.
    Duplicate,
}

impl InsertOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Filter for listing postings.
#[derive(Debug, Clone)]
pub struct PostingFilter {
    /// Filter by employer name (exact, case-insensitive).
    pub employer: Option<String>,
    /// Only return active postings.
    pub active_only: bool,
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl Default for PostingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PostingFilter {
    pub fn new() -> Self {
        Self {
            employer: None,
            active_only: true,
            limit: 100,
            offset: 0,
        }
    }

    pub fn with_employer(mut self, employer: impl Into<String>) -> Self {
        self.employer = Some(employer.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.active_only = false;
        self
    }
}
