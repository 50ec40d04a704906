//! Job-board API source adapter.
//!
//! Talks to a hosted job-board search API:
//!   `GET {base}/v1/search?query=...&location=...&limit=N` returns
//!   `{"results": [...]}` with one entry per posting, and
//!   `GET {base}/v1/postings/{id}` returns `{"description": "..."}`.
//!
//! Posted dates arrive either as ISO dates or as relative strings like
//! "3 days ago", which are resolved against the current UTC date.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::debug;

use crate::config::SearchConfig;

use super::types::{EmployerQuery, JobSource, RawPosting, SourceError};

/// Job-board API source.
pub struct BoardSource {
    client: Client,
    base_url: String,
}

impl BoardSource {
    /// Create a new BoardSource with the given configuration.
    pub fn new(config: &SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the search URL for an employer query.
    ///
    /// The source query combines role and employer, matching how a
    /// person would search the board for that employer's openings.
    fn build_search_url(&self, query: &EmployerQuery) -> String {
        let text = format!("{} {}", query.role.trim(), query.employer.trim());
        let mut url = format!(
            "{}/v1/search?query={}&limit={}",
            self.base_url,
            urlencoding::encode(text.trim()),
            query.max_results
        );
        if !query.location.trim().is_empty() {
            url.push_str(&format!(
                "&location={}",
                urlencoding::encode(query.location.trim())
            ));
        }
        url
    }
}

#[async_trait]
impl JobSource for BoardSource {
    fn name(&self) -> &str {
        "board"
    }

    async fn search(&self, query: &EmployerQuery) -> Result<Vec<RawPosting>, SourceError> {
        let url = self.build_search_url(query);
        debug!(employer = %query.employer, "Searching job board");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let board_response: BoardSearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let today = Utc::now().date_naive();
        let postings = board_response
            .results
            .into_iter()
            .map(|r| RawPosting {
                url: r.url,
                title: if r.title.trim().is_empty() {
                    "Unknown".to_string()
                } else {
                    r.title
                },
                employer: r.company.unwrap_or_default(),
                description: r.snippet.unwrap_or_default(),
                required_skills: r.required_skills,
                preferred_skills: r.preferred_skills,
                experience_level: r.experience_level,
                experience_years_range: r.experience_years_range,
                location: r.location,
                source: "board".to_string(),
                posted_date: r.posted.and_then(|d| parse_posted_date(&d, today)),
                details_fetched: false,
            })
            .collect::<Vec<_>>();

        debug!(
            employer = %query.employer,
            results = postings.len(),
            "Job board search complete"
        );

        Ok(postings)
    }

    async fn fetch_detail(&self, posting: &RawPosting) -> Result<String, SourceError> {
        let id = posting_id_from_url(&posting.url)
            .ok_or_else(|| SourceError::Parse(format!("no posting id in url {}", posting.url)))?;
        let url = format!("{}/v1/postings/{}", self.base_url, urlencoding::encode(id));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!("HTTP {}", response.status())));
        }

        let detail: BoardDetailResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(detail.description)
    }
}

fn map_request_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_connect() {
        SourceError::ConnectionFailed(e.to_string())
    } else {
        SourceError::Api(e.to_string())
    }
}

/// The board links postings as `.../postings/{id}`; the last path
/// segment is the detail-endpoint id.
fn posting_id_from_url(url: &str) -> Option<&str> {
    let trimmed = url.trim_end_matches('/');
    let (_, id) = trimmed.rsplit_once('/')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Parse a posted-date string, either ISO ("2026-08-01", possibly with
/// a time suffix) or relative ("3 days ago", "just now").
fn parse_posted_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }

    if t.len() >= 10 {
        if let Ok(date) = NaiveDate::parse_from_str(&t[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }

    let lower = t.to_lowercase();
    if lower.contains("just now") || lower.contains("moment") || lower.contains("today") {
        return Some(today);
    }
    if lower.contains("yesterday") {
        return Some(today - Duration::days(1));
    }

    let digits: String = lower.chars().filter(|c| c.is_ascii_digit()).collect();
    let n: i64 = digits.parse().unwrap_or(0);
    if lower.contains("hour") || lower.contains("minute") {
        return Some(today);
    }
    if lower.contains("day") {
        return Some(today - Duration::days(n.max(1)));
    }
    if lower.contains("week") {
        return Some(today - Duration::weeks(n.max(1)));
    }
    if lower.contains("month") {
        return Some(today - Duration::days(n.max(1) * 30));
    }

    None
}

// Board API response types
#[derive(Debug, Deserialize)]
struct BoardSearchResponse {
    #[serde(default)]
    results: Vec<BoardResult>,
}

#[derive(Debug, Deserialize)]
struct BoardResult {
    url: String,
    #[serde(default)]
    title: String,
    company: Option<String>,
    location: Option<String>,
    snippet: Option<String>,
    posted: Option<String>,
    #[serde(default)]
    required_skills: Vec<String>,
    #[serde(default)]
    preferred_skills: Vec<String>,
    experience_level: Option<String>,
    experience_years_range: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoardDetailResponse {
    #[serde(default)]
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SearchConfig {
        SearchConfig {
            base_url: "http://localhost:9200".to_string(),
            timeout_secs: 20,
            default_max_jobs: 5,
            fetch_details_default: true,
        }
    }

    #[test]
    fn test_build_search_url() {
        let source = BoardSource::new(&test_config());
        let query = EmployerQuery {
            employer: "Acme Corp".to_string(),
            role: "backend engineer".to_string(),
            location: String::new(),
            max_results: 5,
            fetch_details: false,
        };

        let url = source.build_search_url(&query);
        assert!(url.starts_with("http://localhost:9200/v1/search"));
        assert!(url.contains("query=backend%20engineer%20Acme%20Corp"));
        assert!(url.contains("limit=5"));
        assert!(!url.contains("location="));
    }

    #[test]
    fn test_build_search_url_with_location_and_trailing_slash() {
        let mut config = test_config();
        config.base_url = "http://localhost:9200/".to_string();
        let source = BoardSource::new(&config);
        let query = EmployerQuery {
            employer: "Acme".to_string(),
            role: "data engineer".to_string(),
            location: "New York, NY".to_string(),
            max_results: 3,
            fetch_details: false,
        };

        let url = source.build_search_url(&query);
        assert!(url.starts_with("http://localhost:9200/v1/search"));
        assert!(url.contains("location=New%20York%2C%20NY"));
    }

    #[test]
    fn test_posting_id_from_url() {
        assert_eq!(
            posting_id_from_url("https://boards.example.com/postings/abc123"),
            Some("abc123")
        );
        assert_eq!(
            posting_id_from_url("https://boards.example.com/postings/abc123/"),
            Some("abc123")
        );
        assert_eq!(posting_id_from_url("no-slashes"), None);
    }

    #[test]
    fn test_parse_posted_date_iso() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        assert_eq!(
            parse_posted_date("2026-08-01", today),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(
            parse_posted_date("2026-08-01T10:30:00Z", today),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
    }

    #[test]
    fn test_parse_posted_date_relative() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        assert_eq!(parse_posted_date("just now", today), Some(today));
        assert_eq!(parse_posted_date("5 hours ago", today), Some(today));
        assert_eq!(
            parse_posted_date("3 days ago", today),
            NaiveDate::from_ymd_opt(2026, 8, 17)
        );
        assert_eq!(
            parse_posted_date("2 weeks ago", today),
            NaiveDate::from_ymd_opt(2026, 8, 6)
        );
        assert_eq!(
            parse_posted_date("1 month ago", today),
            NaiveDate::from_ymd_opt(2026, 7, 21)
        );
        assert_eq!(
            parse_posted_date("yesterday", today),
            NaiveDate::from_ymd_opt(2026, 8, 19)
        );
    }

    #[test]
    fn test_parse_posted_date_invalid() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        assert_eq!(parse_posted_date("recently", today), None);
        assert_eq!(parse_posted_date("", today), None);
    }

    #[test]
    fn test_board_response_deserialize() {
        let json = r#"{
            "results": [
                {
                    "url": "https://boards.example.com/postings/1",
                    "title": "Backend Engineer",
                    "company": "Acme",
                    "location": "Remote",
                    "snippet": "Build services",
                    "posted": "3 days ago",
                    "required_skills": ["python"],
                    "experience_level": "senior"
                },
                {"url": "https://boards.example.com/postings/2"}
            ]
        }"#;
        let response: BoardSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].company.as_deref(), Some("Acme"));
        assert_eq!(response.results[0].required_skills, vec!["python"]);
        assert_eq!(response.results[1].title, "");
    }
}
