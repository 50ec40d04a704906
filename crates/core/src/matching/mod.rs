//! Profile/posting compatibility scoring.

mod engine;
mod recompute;
mod sqlite;
mod store;
mod types;

pub use engine::MatchEngine;
pub use recompute::MatchRecomputer;
pub use sqlite::SqliteMatchStore;
pub use store::{MatchFilter, MatchStore};
pub use types::{MatchBreakdown, MatchError, MatchResult, MatchRow, StoredMatch};
