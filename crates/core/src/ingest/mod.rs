//! Ingestion: normalize raw postings and persist the new ones.

mod ingestor;
mod normalize;

pub use ingestor::{IngestError, IngestReport, Ingestor};
pub use normalize::normalize_url;
