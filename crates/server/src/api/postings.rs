//! Posting listing endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use jobscout_core::posting::Posting;
use jobscout_core::PostingFilter;

use crate::state::AppState;

/// Maximum allowed limit for posting queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for posting queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for the postings endpoint
#[derive(Debug, Deserialize)]
pub struct PostingQueryParams {
    /// Filter by employer name (exact, case-insensitive)
    pub employer: Option<String>,
    /// Maximum number of postings to return (default 100, max 1000)
    pub limit: Option<i64>,
    /// Pagination offset (default 0)
    pub offset: Option<i64>,
}

/// Response for the postings endpoint
#[derive(Debug, Serialize)]
pub struct PostingListResponse {
    /// Postings, newest first
    pub postings: Vec<Posting>,
    /// Total number of matching postings
    pub total: i64,
    /// Limit used for this query
    pub limit: i64,
    /// Offset used for this query
    pub offset: i64,
}

/// Error response for posting queries
#[derive(Debug, Serialize)]
pub struct PostingErrorResponse {
    pub error: String,
}

type PostingErrorTuple = (StatusCode, Json<PostingErrorResponse>);

/// List stored postings, newest first
pub async fn list_postings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostingQueryParams>,
) -> Result<Json<PostingListResponse>, PostingErrorTuple> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut base_filter = PostingFilter::new();
    if let Some(ref employer) = params.employer {
        base_filter = base_filter.with_employer(employer);
    }

    let query_filter = base_filter.clone().with_limit(limit).with_offset(offset);

    let postings = state.postings().list(&query_filter).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PostingErrorResponse {
                error: format!("Failed to list postings: {}", e),
            }),
        )
    })?;

    let total = state.postings().count(&base_filter).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PostingErrorResponse {
                error: format!("Failed to count postings: {}", e),
            }),
        )
    })?;

    Ok(Json(PostingListResponse {
        postings,
        total,
        limit,
        offset,
    }))
}
