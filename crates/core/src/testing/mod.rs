//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the external service
//! traits (the oracle and the job-listing sources), allowing full
//! pipeline tests without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobscout_core::testing::{fixtures, MockJobSource, MockLlmClient};
//!
//! let llm = MockLlmClient::new();
//! let source = MockJobSource::new();
//!
//! // Configure mock responses
//! llm.set_response(r#"[{"name": "Acme", "reason": "fits", "industry": "logistics"}]"#);
//! source.set_results(vec![fixtures::raw_posting("https://b.example.com/j/1", "Engineer")]);
//!
//! // Wire into an orchestrator...
//! ```

mod mock_llm;
mod mock_source;

pub use mock_llm::MockLlmClient;
pub use mock_source::MockJobSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;

    use crate::posting::{NewPosting, Posting};
    use crate::profile::{Profile, Skill};
    use crate::search::RawPosting;

    /// Create a test raw posting with reasonable defaults.
    pub fn raw_posting(url: &str, title: &str) -> RawPosting {
        RawPosting {
            url: url.to_string(),
            title: title.to_string(),
            employer: "Acme".to_string(),
            description: "Build and operate backend services on a small product team."
                .to_string(),
            required_skills: vec!["rust".to_string()],
            preferred_skills: vec![],
            experience_level: None,
            experience_years_range: None,
            location: Some("Berlin".to_string()),
            source: "mock".to_string(),
            posted_date: None,
            details_fetched: false,
        }
    }

    /// Create a test posting ready for insertion, keyed by its URL.
    pub fn new_posting(url: &str, employer: &str) -> NewPosting {
        NewPosting {
            url: url.to_string(),
            employer: employer.to_string(),
            title: "Backend Engineer".to_string(),
            description: "Build and operate backend services on a small product team."
                .to_string(),
            required_skills: vec!["rust".to_string()],
            preferred_skills: vec![],
            experience_level: None,
            experience_years_range: None,
            location: Some("Berlin".to_string()),
            source: "mock".to_string(),
            posted_date: None,
        }
    }

    /// Create a stored test posting, as the match engine sees it.
    pub fn posting(id: &str, employer: &str) -> Posting {
        Posting {
            id: id.to_string(),
            url: format!("https://b.example.com/j/{id}"),
            employer: employer.to_string(),
            title: "Backend Engineer".to_string(),
            description: "Build and operate backend services on a small product team."
                .to_string(),
            required_skills: vec!["rust".to_string()],
            preferred_skills: vec![],
            experience_level: None,
            experience_years_range: None,
            location: Some("Berlin".to_string()),
            source: "mock".to_string(),
            posted_date: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Create a test profile with the given skills as (name, level) pairs.
    pub fn profile(id: &str, years_experience: f64, skills: &[(&str, u8)]) -> Profile {
        let now = Utc::now();
        Profile {
            id: id.to_string(),
            name: "Test User".to_string(),
            years_experience,
            skills: skills
                .iter()
                .map(|(name, level)| Skill {
                    name: name.to_string(),
                    level: *level,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }
}
