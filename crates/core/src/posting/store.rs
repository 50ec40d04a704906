//! Posting storage trait.

use super::{InsertOutcome, NewPosting, Posting, PostingFilter, StoreError};

/// Trait for posting storage backends.
pub trait PostingStore: Send + Sync {
    /// Insert a posting unless its URL already exists.
    ///
    /// This is the dedup point for the whole pipeline and must be an
    /// atomic conditional insert on the unique URL key, never a
    /// check-then-act pair: two concurrent runs inserting the same URL
    /// must produce exactly one row.
    fn insert_new(&self, posting: NewPosting) -> Result<InsertOutcome, StoreError>;

    /// Get a posting by id.
    fn get(&self, id: &str) -> Result<Option<Posting>, StoreError>;

    /// Get a posting by its normalized URL.
    fn get_by_url(&self, url: &str) -> Result<Option<Posting>, StoreError>;

    /// List postings matching the filter, newest first.
    fn list(&self, filter: &PostingFilter) -> Result<Vec<Posting>, StoreError>;

    /// Count postings matching the filter.
    fn count(&self, filter: &PostingFilter) -> Result<i64, StoreError>;

    /// All active postings, for full match recomputation.
    fn list_active(&self) -> Result<Vec<Posting>, StoreError>;
}
