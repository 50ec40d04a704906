//! Per-employer search across the configured source adapters.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::types::{EmployerQuery, EmployerSearchResult, JobSource, RawPosting, SourceError};

/// Searches one employer at a time across the configured sources.
///
/// Sources are queried sequentially and results concatenated up to the
/// query's cap. A failing source is recorded and the rest still run;
/// only when every source fails with nothing found does the employer
/// itself count as failed. No retries happen here.
pub struct EmployerSearcher {
    sources: Vec<Arc<dyn JobSource>>,
}

impl EmployerSearcher {
    pub fn new(sources: Vec<Arc<dyn JobSource>>) -> Self {
        Self { sources }
    }

    pub async fn search_employer(
        &self,
        query: &EmployerQuery,
    ) -> Result<EmployerSearchResult, SourceError> {
        let start = Instant::now();
        let cap = query.max_results as usize;

        let mut postings: Vec<RawPosting> = Vec::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut errors: Vec<String> = Vec::new();
        let mut source_errors: HashMap<String, String> = HashMap::new();

        for source in &self.sources {
            if postings.len() >= cap {
                break;
            }

            let batch = match source.search(query).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(
                        source = source.name(),
                        employer = %query.employer,
                        error = %e,
                        "Source search failed"
                    );
                    source_errors.insert(source.name().to_string(), e.to_string());
                    continue;
                }
            };

            for mut posting in batch {
                if postings.len() >= cap {
                    break;
                }
                if posting.url.trim().is_empty() || !seen_urls.insert(posting.url.clone()) {
                    continue;
                }
                if posting.employer.trim().is_empty() {
                    posting.employer = query.employer.clone();
                }
                if posting.source.is_empty() {
                    posting.source = source.name().to_string();
                }

                if query.fetch_details {
                    match source.fetch_detail(&posting).await {
                        Ok(description) if !description.trim().is_empty() => {
                            posting.description = description;
                            posting.details_fetched = true;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            // Keep the snippet; a failed detail fetch
                            // never drops the posting.
                            errors.push(format!("detail fetch for {}: {}", posting.url, e));
                        }
                    }
                }

                postings.push(posting);
            }
        }

        if postings.is_empty() && !source_errors.is_empty() {
            return Err(SourceError::AllSourcesFailed(source_errors));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            employer = %query.employer,
            found = postings.len(),
            duration_ms = duration_ms,
            "Employer search complete"
        );

        Ok(EmployerSearchResult {
            employer: query.employer.clone(),
            postings,
            errors,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockJobSource};

    fn query(employer: &str, max_results: u32, fetch_details: bool) -> EmployerQuery {
        EmployerQuery {
            employer: employer.to_string(),
            role: "backend engineer".to_string(),
            location: String::new(),
            max_results,
            fetch_details,
        }
    }

    #[tokio::test]
    async fn test_search_employer_returns_postings() {
        let source = Arc::new(MockJobSource::new());
        source.set_results(vec![
            fixtures::raw_posting("https://b.example.com/postings/1", "Backend Engineer"),
            fixtures::raw_posting("https://b.example.com/postings/2", "Platform Engineer"),
        ]);

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher
            .search_employer(&query("Acme", 5, false))
            .await
            .unwrap();

        assert_eq!(result.employer, "Acme");
        assert_eq!(result.postings.len(), 2);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_search_employer_caps_results() {
        let source = Arc::new(MockJobSource::new());
        source.set_results(
            (0..10)
                .map(|i| {
                    fixtures::raw_posting(
                        &format!("https://b.example.com/postings/{i}"),
                        "Engineer",
                    )
                })
                .collect(),
        );

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher
            .search_employer(&query("Acme", 3, false))
            .await
            .unwrap();

        assert_eq!(result.postings.len(), 3);
    }

    #[tokio::test]
    async fn test_search_employer_dedups_urls_within_batch() {
        let source = Arc::new(MockJobSource::new());
        source.set_results(vec![
            fixtures::raw_posting("https://b.example.com/postings/1", "Engineer"),
            fixtures::raw_posting("https://b.example.com/postings/1", "Engineer again"),
        ]);

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher
            .search_employer(&query("Acme", 5, false))
            .await
            .unwrap();

        assert_eq!(result.postings.len(), 1);
        assert_eq!(result.postings[0].title, "Engineer");
    }

    #[tokio::test]
    async fn test_search_employer_fills_employer_and_source() {
        let source = Arc::new(MockJobSource::new());
        let mut posting = fixtures::raw_posting("https://b.example.com/postings/1", "Engineer");
        posting.employer = String::new();
        posting.source = String::new();
        source.set_results(vec![posting]);

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher
            .search_employer(&query("Acme", 5, false))
            .await
            .unwrap();

        assert_eq!(result.postings[0].employer, "Acme");
        assert_eq!(result.postings[0].source, "mock");
    }

    #[tokio::test]
    async fn test_search_employer_fetches_details() {
        let source = Arc::new(MockJobSource::new());
        source.set_results(vec![fixtures::raw_posting(
            "https://b.example.com/postings/1",
            "Engineer",
        )]);
        source.set_detail("Full description of the role");

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher
            .search_employer(&query("Acme", 5, true))
            .await
            .unwrap();

        assert_eq!(result.postings[0].description, "Full description of the role");
        assert!(result.postings[0].details_fetched);
    }

    #[tokio::test]
    async fn test_search_employer_keeps_snippet_when_detail_fails() {
        let source = Arc::new(MockJobSource::new());
        let mut posting = fixtures::raw_posting("https://b.example.com/postings/1", "Engineer");
        posting.description = "snippet text".to_string();
        source.set_results(vec![posting]);
        source.fail_detail_fetches();

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher
            .search_employer(&query("Acme", 5, true))
            .await
            .unwrap();

        assert_eq!(result.postings.len(), 1);
        assert_eq!(result.postings[0].description, "snippet text");
        assert!(!result.postings[0].details_fetched);
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_search_employer_all_sources_failed() {
        let source = Arc::new(MockJobSource::new());
        source.set_next_error(SourceError::Timeout);

        let searcher = EmployerSearcher::new(vec![source]);
        let result = searcher.search_employer(&query("Acme", 5, false)).await;

        match result {
            Err(SourceError::AllSourcesFailed(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("mock"));
            }
            other => panic!("expected AllSourcesFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_employer_partial_source_failure_still_succeeds() {
        let failing = Arc::new(MockJobSource::with_name("failing"));
        failing.set_next_error(SourceError::Timeout);

        let working = Arc::new(MockJobSource::with_name("working"));
        working.set_results(vec![fixtures::raw_posting(
            "https://b.example.com/postings/1",
            "Engineer",
        )]);

        let searcher = EmployerSearcher::new(vec![failing, working]);
        let result = searcher
            .search_employer(&query("Acme", 5, false))
            .await
            .unwrap();

        assert_eq!(result.postings.len(), 1);
    }
}
