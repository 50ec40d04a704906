//! Per-employer job search: pluggable source adapters behind a
//! sequential, capped searcher.

mod board;
mod searcher;
mod types;

pub use board::BoardSource;
pub use searcher::EmployerSearcher;
pub use types::{EmployerQuery, EmployerSearchResult, JobSource, RawPosting, SourceError};
