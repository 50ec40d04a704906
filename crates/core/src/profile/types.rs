//! Types for the profile store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// One skill with a self-reported proficiency level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    /// Proficiency on a 1 (novice) to 5 (expert) scale.
    pub level: u8,
}

/// A stored user profile, the match engine's left-hand input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub years_experience: f64,
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    pub years_experience: f64,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl CreateProfileRequest {
    /// Validate field bounds. Called before any store write.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::Invalid("name cannot be empty".to_string()));
        }
        if !(0.0..=80.0).contains(&self.years_experience) {
            return Err(ProfileError::Invalid(format!(
                "years_experience must be between 0 and 80, got {}",
                self.years_experience
            )));
        }
        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(ProfileError::Invalid(
                    "skill name cannot be empty".to_string(),
                ));
            }
            if !(1..=5).contains(&skill.level) {
                return Err(ProfileError::Invalid(format!(
                    "skill level for '{}' must be between 1 and 5, got {}",
                    skill.name, skill.level
                )));
            }
        }
        Ok(())
    }
}
