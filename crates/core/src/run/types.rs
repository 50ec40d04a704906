//! Types for research runs.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// Hard ceiling on postings per employer, regardless of what the
/// request asks for.
pub const MAX_JOBS_CEILING: u32 = 15;

const MIN_ROLE_CHARS: usize = 2;
const MAX_ROLE_CHARS: usize = 200;
const MAX_LOCATION_CHARS: usize = 200;

/// Request to start a research run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    /// Target role, e.g. "backend engineer".
    pub role: String,
    /// Location filter; empty means anywhere.
    #[serde(default)]
    pub location: String,
    /// Per-employer posting cap; clamped to 1..=15, config default when
    /// absent.
    #[serde(default, rename = "max_jobs_per_company")]
    pub max_jobs: Option<u32>,
    /// Whether full descriptions are fetched; config default when absent.
    #[serde(default)]
    pub fetch_details: Option<bool>,
    /// Profile whose matches are recomputed once the run finishes.
    #[serde(default)]
    pub profile_id: Option<String>,
}

impl RunRequest {
    /// Validate field bounds. Profile existence is checked separately,
    /// against the store.
    pub fn validate(&self) -> Result<(), String> {
        let role_chars = self.role.trim().chars().count();
        if role_chars < MIN_ROLE_CHARS {
            return Err(format!(
                "role must be at least {MIN_ROLE_CHARS} characters"
            ));
        }
        if role_chars > MAX_ROLE_CHARS {
            return Err(format!("role must be at most {MAX_ROLE_CHARS} characters"));
        }
        if self.location.trim().chars().count() > MAX_LOCATION_CHARS {
            return Err(format!(
                "location must be at most {MAX_LOCATION_CHARS} characters"
            ));
        }
        Ok(())
    }

    /// Per-employer cap after defaulting and clamping.
    pub fn effective_max_jobs(&self, config: &SearchConfig) -> u32 {
        self.max_jobs
            .unwrap_or(config.default_max_jobs)
            .clamp(1, MAX_JOBS_CEILING)
    }

    /// Detail-fetch flag after defaulting.
    pub fn effective_fetch_details(&self, config: &SearchConfig) -> bool {
        self.fetch_details.unwrap_or(config.fetch_details_default)
    }
}

/// Where one employer candidate stands in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Searching,
    Done,
    Error,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Searching => "searching",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}
