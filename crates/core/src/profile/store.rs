//! Profile storage trait.

use super::{CreateProfileRequest, Profile, ProfileError};

/// Trait for profile storage backends.
pub trait ProfileStore: Send + Sync {
    /// Create a new profile. The request must already be validated.
    fn create(&self, request: CreateProfileRequest) -> Result<Profile, ProfileError>;

    /// Get a profile by id.
    fn get(&self, id: &str) -> Result<Option<Profile>, ProfileError>;

    /// List all profiles, newest first.
    fn list(&self) -> Result<Vec<Profile>, ProfileError>;
}
