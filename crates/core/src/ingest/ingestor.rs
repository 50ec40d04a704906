//! Batch ingestion of raw postings for one employer.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::posting::{NewPosting, PostingStore, StoreError};
use crate::search::RawPosting;

use super::normalize::normalize_url;

/// At most this many error strings are kept per batch report.
const MAX_REPORTED_ERRORS: usize = 5;

/// A title this short with no real description is junk data, not a posting.
const MIN_DESCRIPTION_CHARS: usize = 20;

/// Errors that abort a whole batch.
///
/// Per-posting problems never surface here; they become error strings
/// in the report and the batch continues.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Posting store unavailable: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of one employer's batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Raw postings handed to the ingestor.
    pub found: u32,
    /// Postings inserted for the first time.
    pub new: u32,
    /// Postings whose URL already existed.
    pub duplicates: u32,
    /// New postings whose full description was fetched before insert.
    pub enriched: u32,
    /// First few per-posting errors (malformed entries, skipped).
    pub errors: Vec<String>,
}

/// Normalizes raw postings and persists the new ones.
///
/// Insertion is idempotent: the store's atomic insert-or-skip on the
/// unique URL key decides new vs duplicate, so feeding the same batch
/// twice changes nothing.
pub struct Ingestor {
    store: Arc<dyn PostingStore>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn PostingStore>) -> Self {
        Self { store }
    }

    /// Ingest one employer's raw postings.
    ///
    /// A malformed posting is skipped and recorded as an error string;
    /// only a store failure aborts the batch.
    pub fn ingest_batch(
        &self,
        employer: &str,
        postings: Vec<RawPosting>,
    ) -> Result<IngestReport, IngestError> {
        let mut report = IngestReport {
            found: postings.len() as u32,
            ..Default::default()
        };

        for raw in postings {
            let url = normalize_url(&raw.url);
            if url.is_empty() {
                record_error(&mut report, format!("missing url for '{}'", raw.title));
                continue;
            }
            if raw.title.trim().is_empty() && raw.description.trim().len() < MIN_DESCRIPTION_CHARS {
                record_error(&mut report, format!("empty posting at {url}"));
                continue;
            }

            let details_fetched = raw.details_fetched;
            let new_posting = NewPosting {
                url,
                employer: if raw.employer.trim().is_empty() {
                    employer.to_string()
                } else {
                    raw.employer
                },
                title: raw.title,
                description: raw.description,
                required_skills: raw.required_skills,
                preferred_skills: raw.preferred_skills,
                experience_level: raw.experience_level,
                experience_years_range: raw.experience_years_range,
                location: raw.location,
                source: raw.source,
                posted_date: raw.posted_date,
            };

            if self.store.insert_new(new_posting)?.is_new() {
                report.new += 1;
                if details_fetched {
                    report.enriched += 1;
                }
            } else {
                report.duplicates += 1;
            }
        }

        debug!(
            employer = employer,
            found = report.found,
            new = report.new,
            duplicates = report.duplicates,
            errors = report.errors.len(),
            "Batch ingested"
        );

        Ok(report)
    }
}

fn record_error(report: &mut IngestReport, message: String) {
    if report.errors.len() < MAX_REPORTED_ERRORS {
        report.errors.push(message);
    } else if report.errors.len() == MAX_REPORTED_ERRORS {
        report.errors.push("... more errors truncated".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::SqlitePostingStore;
    use crate::testing::fixtures;

    fn ingestor() -> (Ingestor, Arc<SqlitePostingStore>) {
        let store = Arc::new(SqlitePostingStore::in_memory().unwrap());
        (Ingestor::new(Arc::clone(&store) as Arc<dyn PostingStore>), store)
    }

    #[test]
    fn test_ingest_batch_counts_new_postings() {
        let (ingestor, _store) = ingestor();

        let report = ingestor
            .ingest_batch(
                "Acme",
                vec![
                    fixtures::raw_posting("https://b.example.com/j/1", "Engineer"),
                    fixtures::raw_posting("https://b.example.com/j/2", "Analyst"),
                ],
            )
            .unwrap();

        assert_eq!(report.found, 2);
        assert_eq!(report.new, 2);
        assert_eq!(report.duplicates, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_ingest_same_batch_twice_is_all_duplicates() {
        let (ingestor, store) = ingestor();
        let batch = vec![
            fixtures::raw_posting("https://b.example.com/j/1", "Engineer"),
            fixtures::raw_posting("https://b.example.com/j/2", "Analyst"),
        ];

        ingestor.ingest_batch("Acme", batch.clone()).unwrap();
        let report = ingestor.ingest_batch("Acme", batch).unwrap();

        assert_eq!(report.new, 0);
        assert_eq!(report.duplicates, 2);

        use crate::posting::PostingFilter;
        let count = store.count(&PostingFilter::new()).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_ingest_dedups_url_spellings() {
        let (ingestor, _store) = ingestor();

        let report = ingestor
            .ingest_batch(
                "Acme",
                vec![
                    fixtures::raw_posting("https://b.example.com/j/1", "Engineer"),
                    fixtures::raw_posting("  HTTPS://B.EXAMPLE.COM/j/1", "Engineer again"),
                ],
            )
            .unwrap();

        assert_eq!(report.new, 1);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_ingest_skips_missing_url() {
        let (ingestor, _store) = ingestor();

        let mut bad = fixtures::raw_posting("   ", "Engineer");
        bad.url = "   ".to_string();
        let report = ingestor
            .ingest_batch(
                "Acme",
                vec![bad, fixtures::raw_posting("https://b.example.com/j/1", "Engineer")],
            )
            .unwrap();

        assert_eq!(report.found, 2);
        assert_eq!(report.new, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("missing url"));
    }

    #[test]
    fn test_ingest_skips_empty_posting() {
        let (ingestor, _store) = ingestor();

        let mut empty = fixtures::raw_posting("https://b.example.com/j/1", "");
        empty.description = "too short".to_string();
        let report = ingestor.ingest_batch("Acme", vec![empty]).unwrap();

        assert_eq!(report.new, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("empty posting"));
    }

    #[test]
    fn test_ingest_keeps_untitled_posting_with_description() {
        let (ingestor, _store) = ingestor();

        let mut posting = fixtures::raw_posting("https://b.example.com/j/1", "");
        posting.description =
            "A long enough description to stand in for the missing title".to_string();
        let report = ingestor.ingest_batch("Acme", vec![posting]).unwrap();

        assert_eq!(report.new, 1);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_ingest_error_list_is_truncated() {
        let (ingestor, _store) = ingestor();

        let batch: Vec<RawPosting> = (0..8)
            .map(|i| {
                let mut p = fixtures::raw_posting("", &format!("Job {i}"));
                p.url = String::new();
                p
            })
            .collect();
        let report = ingestor.ingest_batch("Acme", batch).unwrap();

        assert_eq!(report.found, 8);
        assert_eq!(report.errors.len(), MAX_REPORTED_ERRORS + 1);
        assert!(report.errors.last().unwrap().contains("truncated"));
    }

    #[test]
    fn test_ingest_counts_enriched_only_when_new() {
        let (ingestor, _store) = ingestor();

        let mut enriched = fixtures::raw_posting("https://b.example.com/j/1", "Engineer");
        enriched.details_fetched = true;

        let report = ingestor.ingest_batch("Acme", vec![enriched.clone()]).unwrap();
        assert_eq!(report.enriched, 1);

        // A duplicate never counts as enriched, detail fetch or not.
        let report = ingestor.ingest_batch("Acme", vec![enriched]).unwrap();
        assert_eq!(report.enriched, 0);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_ingest_fills_employer_fallback() {
        let (ingestor, store) = ingestor();

        let mut posting = fixtures::raw_posting("https://b.example.com/j/1", "Engineer");
        posting.employer = String::new();
        ingestor.ingest_batch("Acme", vec![posting]).unwrap();

        let stored = store.get_by_url("https://b.example.com/j/1").unwrap().unwrap();
        assert_eq!(stored.employer, "Acme");
    }
}
