use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Run lifecycle
    RunStarted {
        run_id: String,
        /// Target role from the request
        role: String,
        /// Location filter, empty for anywhere
        location: String,
        /// Per-employer posting cap
        max_jobs: u32,
        /// Profile to recompute matches for after the run (if any)
        profile_id: Option<String>,
    },
    RunCompleted {
        run_id: String,
        /// Employers searched (including failed ones)
        companies_searched: u32,
        /// New postings persisted across the whole run
        total_new: u32,
        /// Total run duration in milliseconds
        duration_ms: u64,
    },
    /// Run stopped early because the consumer went away.
    RunCancelled {
        run_id: String,
        /// Employers fully searched before the cancellation took effect
        companies_searched: u32,
    },
    RunFailed {
        run_id: String,
        error: String,
    },

    // Discovery events
    CompaniesDiscovered {
        run_id: String,
        /// Candidates the oracle proposed after deduplication
        count: u32,
        provider: String,
        model: String,
        duration_ms: u64,
    },
    OracleCallCompleted {
        run_id: String,
        provider: String,
        model: String,
        input_tokens: u32,
        output_tokens: u32,
        duration_ms: u64,
    },
    OracleCallFailed {
        run_id: String,
        provider: String,
        error: String,
        duration_ms: u64,
    },

    // Per-employer events
    EmployerSearchCompleted {
        run_id: String,
        employer: String,
        /// "done" or "error"
        status: String,
        /// Postings the sources reported
        found: u32,
        /// How long the search took in milliseconds
        duration_ms: u64,
        /// Error message when status is "error"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    PostingsIngested {
        run_id: String,
        employer: String,
        found: u32,
        new: u32,
        duplicates: u32,
        /// Malformed postings skipped during ingestion
        errors: u32,
    },

    // Profile and matching events
    ProfileCreated {
        profile_id: String,
        name: String,
        skills_count: u32,
    },
    MatchesRecomputed {
        profile_id: String,
        /// Run that triggered the recompute, absent for API-driven ones
        #[serde(default, skip_serializing_if = "Option::is_none")]
        run_id: Option<String>,
        /// Active postings scored
        postings_scored: u32,
        duration_ms: u64,
    },
}

impl AuditEvent {
    /// Returns the event type as a string for storage
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceStopped { .. } => "service_stopped",
            Self::RunStarted { .. } => "run_started",
            Self::RunCompleted { .. } => "run_completed",
            Self::RunCancelled { .. } => "run_cancelled",
            Self::RunFailed { .. } => "run_failed",
            Self::CompaniesDiscovered { .. } => "companies_discovered",
            Self::OracleCallCompleted { .. } => "oracle_call_completed",
            Self::OracleCallFailed { .. } => "oracle_call_failed",
            Self::EmployerSearchCompleted { .. } => "employer_search_completed",
            Self::PostingsIngested { .. } => "postings_ingested",
            Self::ProfileCreated { .. } => "profile_created",
            Self::MatchesRecomputed { .. } => "matches_recomputed",
        }
    }

    /// Extract run_id if this event belongs to a run
    pub fn run_id(&self) -> Option<&str> {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::RunCompleted { run_id, .. }
            | Self::RunCancelled { run_id, .. }
            | Self::RunFailed { run_id, .. }
            | Self::CompaniesDiscovered { run_id, .. }
            | Self::OracleCallCompleted { run_id, .. }
            | Self::OracleCallFailed { run_id, .. }
            | Self::EmployerSearchCompleted { run_id, .. }
            | Self::PostingsIngested { run_id, .. } => Some(run_id),
            Self::MatchesRecomputed { run_id, .. } => run_id.as_deref(),
            _ => None,
        }
    }

    /// Extract profile_id if this event is profile-related
    pub fn profile_id(&self) -> Option<&str> {
        match self {
            Self::ProfileCreated { profile_id, .. }
            | Self::MatchesRecomputed { profile_id, .. } => Some(profile_id),
            Self::RunStarted { profile_id, .. } => profile_id.as_deref(),
            _ => None,
        }
    }
}

/// A stored audit record with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub run_id: Option<String>,
    pub profile_id: Option<String>,
    pub data: AuditEvent,
}
