//! Match ranking endpoint for a profile.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use jobscout_core::matching::{MatchError, MatchRow};
use jobscout_core::{AuditEvent, MatchFilter};

use crate::state::AppState;

/// Maximum allowed limit for match queries
const MAX_LIMIT: i64 = 1000;

/// Query parameters for the matches endpoint
#[derive(Debug, Deserialize)]
pub struct MatchQueryParams {
    /// Re-score against every active posting before listing (default false)
    pub recompute: Option<bool>,
    /// Drop matches scoring below this value
    pub min_score: Option<f64>,
    /// Maximum number of results (full ranking when absent, max 1000)
    pub limit: Option<i64>,
}

/// Response for the matches endpoint
#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub profile_id: String,
    pub matches: Vec<MatchRow>,
    /// Whether a recompute ran as part of this request
    pub recomputed: bool,
}

/// Error response for match queries
#[derive(Debug, Serialize)]
pub struct MatchErrorResponse {
    pub error: String,
}

type MatchErrorTuple = (StatusCode, Json<MatchErrorResponse>);

fn map_error(profile_id: &str, e: MatchError) -> MatchErrorTuple {
    match e {
        MatchError::ProfileNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(MatchErrorResponse {
                error: format!("Profile not found: {}", profile_id),
            }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MatchErrorResponse {
                error: format!("Failed to list matches: {}", other),
            }),
        ),
    }
}

/// List a profile's matches, best score first, optionally recomputing
/// them first.
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<MatchQueryParams>,
) -> Result<Json<MatchListResponse>, MatchErrorTuple> {
    // The default response is the profile's full ranking; only a
    // caller-provided limit gets clamped and applied.
    let mut filter = MatchFilter::new();
    if let Some(limit) = params.limit {
        filter = filter.with_limit(limit.clamp(1, MAX_LIMIT));
    }
    if let Some(min_score) = params.min_score {
        filter = filter.with_min_score(min_score);
    }

    let recompute = params.recompute.unwrap_or(false);

    if recompute {
        let start = Instant::now();
        let scored = state
            .recomputer()
            .recompute_all(&id)
            .map_err(|e| map_error(&id, e))?;

        state
            .audit()
            .emit(AuditEvent::MatchesRecomputed {
                profile_id: id.clone(),
                run_id: None,
                postings_scored: scored,
                duration_ms: start.elapsed().as_millis() as u64,
            })
            .await;
    }

    let matches = state
        .recomputer()
        .list_matches(&id, &filter)
        .map_err(|e| map_error(&id, e))?;

    Ok(Json(MatchListResponse {
        profile_id: id,
        matches,
        recomputed: recompute,
    }))
}
