//! User profiles: leveled skills plus years of experience.

mod sqlite;
mod store;
mod types;

pub use sqlite::SqliteProfileStore;
pub use store::ProfileStore;
pub use types::{CreateProfileRequest, Profile, ProfileError, Skill};
