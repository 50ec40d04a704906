//! Mock job source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::search::{EmployerQuery, JobSource, RawPosting, SourceError};

/// Mock implementation of the JobSource trait.
///
/// Setters are synchronous so tests can configure the mock without an
/// async context. Behavior is controllable per call:
/// - default results, or per-employer results
/// - a one-shot injected error, or a per-employer error
/// - detail fetches that return a fixed body or always fail
///
/// Queries are recorded for assertions.
pub struct MockJobSource {
    name: String,
    results: Mutex<Vec<RawPosting>>,
    results_by_employer: Mutex<HashMap<String, Vec<RawPosting>>>,
    next_error: Mutex<Option<SourceError>>,
    errors_by_employer: Mutex<HashMap<String, String>>,
    detail: Mutex<Option<String>>,
    fail_details: Mutex<bool>,
    queries: Mutex<Vec<EmployerQuery>>,
}

impl Default for MockJobSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockJobSource {
    /// Create a new mock source named "mock".
    pub fn new() -> Self {
        Self::with_name("mock")
    }

    /// Create a mock source with a specific name.
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            results: Mutex::new(Vec::new()),
            results_by_employer: Mutex::new(HashMap::new()),
            next_error: Mutex::new(None),
            errors_by_employer: Mutex::new(HashMap::new()),
            detail: Mutex::new(None),
            fail_details: Mutex::new(false),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Set the results returned for any employer without a dedicated
    /// entry.
    pub fn set_results(&self, results: Vec<RawPosting>) {
        *self.results.lock().unwrap() = results;
    }

    /// Set the results returned when this employer is queried.
    pub fn set_results_for(&self, employer: &str, results: Vec<RawPosting>) {
        self.results_by_employer
            .lock()
            .unwrap()
            .insert(employer.to_string(), results);
    }

    /// Configure the next search to fail with the given error.
    /// The error is consumed by that one search.
    pub fn set_next_error(&self, error: SourceError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Make every search for this employer fail.
    pub fn set_error_for(&self, employer: &str, message: &str) {
        self.errors_by_employer
            .lock()
            .unwrap()
            .insert(employer.to_string(), message.to_string());
    }

    /// Set the body returned by detail fetches.
    pub fn set_detail(&self, detail: &str) {
        *self.detail.lock().unwrap() = Some(detail.to_string());
    }

    /// Make every detail fetch fail.
    pub fn fail_detail_fetches(&self) {
        *self.fail_details.lock().unwrap() = true;
    }

    /// Queries this source has received, in order.
    pub fn recorded_queries(&self) -> Vec<EmployerQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// How many searches were performed.
    pub fn search_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl JobSource for MockJobSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &EmployerQuery) -> Result<Vec<RawPosting>, SourceError> {
        if let Some(err) = self.next_error.lock().unwrap().take() {
            return Err(err);
        }
        if let Some(message) = self.errors_by_employer.lock().unwrap().get(&query.employer) {
            return Err(SourceError::Api(message.clone()));
        }

        self.queries.lock().unwrap().push(query.clone());

        if let Some(results) = self.results_by_employer.lock().unwrap().get(&query.employer) {
            return Ok(results.clone());
        }
        Ok(self.results.lock().unwrap().clone())
    }

    async fn fetch_detail(&self, posting: &RawPosting) -> Result<String, SourceError> {
        if *self.fail_details.lock().unwrap() {
            return Err(SourceError::Api(format!(
                "detail fetch failed for {}",
                posting.url
            )));
        }
        Ok(self.detail.lock().unwrap().clone().unwrap_or_default())
    }
}
