//! Persisted job postings, unique by source URL.

mod sqlite;
mod store;
mod types;

pub use sqlite::SqlitePostingStore;
pub use store::PostingStore;
pub use types::{InsertOutcome, NewPosting, Posting, PostingFilter, StoreError};
