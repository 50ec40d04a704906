//! Types for the company-discovery system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::llm::LlmUsage;

/// Query parameters for one discovery call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryQuery {
    /// Target role, e.g. "backend engineer".
    pub role: String,
    /// Target location; empty means anywhere.
    #[serde(default)]
    pub location: String,
    /// Upper bound on candidates returned.
    pub max_companies: u32,
}

/// A company proposed by the discovery oracle for one run.
///
/// Run-scoped: candidates are never persisted, they exist only to drive
/// the per-employer search that follows discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveredCompany {
    /// Company name as the oracle reported it (trimmed).
    pub name: String,
    /// One-line rationale for why this company fits the query.
    #[serde(default)]
    pub reason: String,
    /// Inferred industry label.
    #[serde(default)]
    pub industry: String,
}

/// Discovery outcome with call metadata.
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    /// The query that was executed.
    pub query: DiscoveryQuery,
    /// Deduplicated candidates, 1..=max_companies of them.
    pub companies: Vec<DiscoveredCompany>,
    /// Oracle provider that answered.
    pub provider: String,
    /// Model that answered.
    pub model: String,
    /// Token usage for the call.
    pub usage: LlmUsage,
    /// How long the oracle call took in milliseconds.
    pub duration_ms: u64,
}

/// Errors that can occur during company discovery.
///
/// Every variant is terminal for the run: without candidates there is
/// nothing to search.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Discovery oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Discovery response unparsable: {0}")]
    Unparsable(String),

    #[error("Discovery returned no usable candidates")]
    NoCandidates,
}
