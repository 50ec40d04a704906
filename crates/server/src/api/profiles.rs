//! Profile endpoints: create, list, get.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use jobscout_core::profile::{CreateProfileRequest, Profile, ProfileError};
use jobscout_core::AuditEvent;

use crate::state::AppState;

/// Error response for profile endpoints
#[derive(Debug, Serialize)]
pub struct ProfileErrorResponse {
    pub error: String,
}

type ProfileErrorTuple = (StatusCode, Json<ProfileErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ProfileErrorTuple {
    (
        status,
        Json(ProfileErrorResponse {
            error: message.into(),
        }),
    )
}

/// Create a new profile
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), ProfileErrorTuple> {
    if let Err(e) = request.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let profile = state.profiles().create(request).map_err(|e| match e {
        ProfileError::Invalid(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        other => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create profile: {}", other),
        ),
    })?;

    state
        .audit()
        .emit(AuditEvent::ProfileCreated {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            skills_count: profile.skills.len() as u32,
        })
        .await;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// List all profiles, newest first
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Profile>>, ProfileErrorTuple> {
    let profiles = state.profiles().list().map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to list profiles: {}", e),
        )
    })?;

    Ok(Json(profiles))
}

/// Get a profile by id
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ProfileErrorTuple> {
    let profile = state
        .profiles()
        .get(&id)
        .map_err(|e| {
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get profile: {}", e),
            )
        })?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, format!("Profile not found: {}", id))
        })?;

    Ok(Json(profile))
}
