//! Types for the per-employer job search system.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Query for one employer's listings within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerQuery {
    /// Employer the run is currently searching.
    pub employer: String,
    /// Role from the original request, combined with the employer
    /// into the source query string.
    pub role: String,
    /// Location filter; empty means anywhere.
    #[serde(default)]
    pub location: String,
    /// Per-employer posting cap.
    pub max_results: u32,
    /// Whether full descriptions are fetched from detail pages.
    #[serde(default)]
    pub fetch_details: bool,
}

/// A job posting as reported by a source, before ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPosting {
    /// Source URL. Identity key of the persisted posting.
    pub url: String,
    pub title: String,
    /// Employer name; falls back to the queried employer when the
    /// source omits it.
    #[serde(default)]
    pub employer: String,
    /// Full description, or the search-page snippet when details were
    /// not fetched.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    /// Level keyword as reported (entry, mid, senior, lead, executive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    /// Years range as reported, e.g. "3-5" or "5+ years".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Which source reported this posting.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<NaiveDate>,
    /// Whether the description came from a detail fetch rather than
    /// the search-page snippet.
    #[serde(default)]
    pub details_fetched: bool,
}

/// Search outcome for one employer.
#[derive(Debug, Clone)]
pub struct EmployerSearchResult {
    /// Employer that was searched.
    pub employer: String,
    /// Postings found, capped at the query's max_results.
    pub postings: Vec<RawPosting>,
    /// Non-fatal per-posting problems (e.g. a failed detail fetch).
    pub errors: Vec<String>,
    /// How long the search took in milliseconds.
    pub duration_ms: u64,
}

/// Errors that can occur while searching one employer.
///
/// Scoped to that employer only: the orchestrator records the employer
/// as failed and moves on to the next one.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Source API error: {0}")]
    Api(String),

    #[error("Source response parse error: {0}")]
    Parse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("All sources failed")]
    AllSourcesFailed(HashMap<String, String>),
}

/// Trait for job-listing source adapters.
///
/// Adapters perform exactly one attempt per call; there is no retry
/// policy at this layer.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Source name for logging/audit and the Posting `source` field.
    fn name(&self) -> &str;

    /// Search this source for the employer's listings.
    async fn search(&self, query: &EmployerQuery) -> Result<Vec<RawPosting>, SourceError>;

    /// Fetch the full description for one posting found by this source.
    async fn fetch_detail(&self, posting: &RawPosting) -> Result<String, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_posting_deserialize_minimal() {
        let json = r#"{"url": "https://boards.example.com/j/1", "title": "Backend Engineer"}"#;
        let posting: RawPosting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.url, "https://boards.example.com/j/1");
        assert_eq!(posting.title, "Backend Engineer");
        assert_eq!(posting.employer, "");
        assert!(posting.required_skills.is_empty());
        assert!(posting.posted_date.is_none());
        assert!(!posting.details_fetched);
    }

    #[test]
    fn test_raw_posting_roundtrip_with_date() {
        let posting = RawPosting {
            url: "https://boards.example.com/j/2".to_string(),
            title: "Data Engineer".to_string(),
            employer: "Acme".to_string(),
            description: "Build pipelines".to_string(),
            required_skills: vec!["python".to_string(), "sql".to_string()],
            preferred_skills: vec![],
            experience_level: Some("senior".to_string()),
            experience_years_range: Some("5-7".to_string()),
            location: Some("Berlin".to_string()),
            source: "board".to_string(),
            posted_date: NaiveDate::from_ymd_opt(2026, 8, 1),
            details_fetched: true,
        };

        let json = serde_json::to_string(&posting).unwrap();
        assert!(json.contains("\"posted_date\":\"2026-08-01\""));

        let parsed: RawPosting = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.required_skills.len(), 2);
        assert_eq!(parsed.experience_level.as_deref(), Some("senior"));
    }

    #[test]
    fn test_employer_query_deserialize_defaults() {
        let json = r#"{"employer": "Acme", "role": "backend engineer", "max_results": 5}"#;
        let query: EmployerQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.location, "");
        assert!(!query.fetch_details);
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Timeout;
        assert_eq!(err.to_string(), "Request timeout");

        let err = SourceError::Api("HTTP 502: bad gateway".to_string());
        assert!(err.to_string().contains("502"));
    }
}
