//! The progress event protocol streamed to run consumers.

use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveredCompany;

use super::types::CandidateStatus;

/// One progress event in a run's stream.
///
/// Serialized with a `type` tag; the tag doubles as the SSE event
/// name. A cancelled run simply stops emitting: neither `complete`
/// nor `error` follows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The run has started; discovery is about to begin.
    ResearchStart,
    /// The oracle proposed these employer candidates.
    CompaniesFound { companies: Vec<DiscoveredCompany> },
    /// The run moved on to searching this employer.
    SearchingCompany { company: String },
    /// This employer's search and ingestion finished.
    CompanyDone {
        company: String,
        status: CandidateStatus,
        /// Postings the sources reported.
        found: u32,
        /// Postings persisted for the first time.
        new: u32,
    },
    /// Terminal: the run finished every employer.
    Complete { total_new: u32 },
    /// Terminal: the run failed before reaching the end.
    Error { message: String },
}

impl ProgressEvent {
    /// The wire-level event name, matching the serde tag.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ResearchStart => "research_start",
            Self::CompaniesFound { .. } => "companies_found",
            Self::SearchingCompany { .. } => "searching_company",
            Self::CompanyDone { .. } => "company_done",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}
