//! Company discovery through a single oracle call per run.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::llm::{CompletionRequest, LlmClient};
use super::types::{DiscoveredCompany, DiscoveryError, DiscoveryQuery, DiscoveryResult};

const SYSTEM_PROMPT: &str = "You are a job-market research assistant. Given a target role and \
location, propose real companies that plausibly hire for that role there. Respond with a JSON \
array only, no prose. Each element must be an object with exactly these string fields: \
\"name\", \"reason\" (one line on why the company fits), \"industry\".";

/// Trait for company discovery backends.
#[async_trait]
pub trait CompanyDiscoverer: Send + Sync {
    /// Backend name for logging/audit.
    fn name(&self) -> &str;

    /// Propose employer candidates for a role/location query.
    ///
    /// Returns between 1 and `query.max_companies` candidates, deduplicated
    /// by case-insensitive name. Any failure here is terminal for the run.
    async fn discover(&self, query: &DiscoveryQuery) -> Result<DiscoveryResult, DiscoveryError>;
}

/// Discoverer backed by a generative-model oracle.
pub struct OracleDiscoverer {
    llm: Arc<dyn LlmClient>,
}

impl OracleDiscoverer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CompanyDiscoverer for OracleDiscoverer {
    fn name(&self) -> &str {
        "oracle"
    }

    async fn discover(&self, query: &DiscoveryQuery) -> Result<DiscoveryResult, DiscoveryError> {
        let start = Instant::now();

        debug!(
            role = %query.role,
            location = %query.location,
            max_companies = query.max_companies,
            "Requesting company candidates from oracle"
        );

        let request = CompletionRequest::new(build_prompt(query))
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(2048);

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|e| DiscoveryError::Unavailable(e.to_string()))?;

        let companies = parse_companies(&response.text, query.max_companies)?;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            companies = companies.len(),
            model = %response.model,
            duration_ms = duration_ms,
            "Oracle proposed companies"
        );

        Ok(DiscoveryResult {
            query: query.clone(),
            companies,
            provider: self.llm.provider().to_string(),
            model: self.llm.model().to_string(),
            usage: response.usage,
            duration_ms,
        })
    }
}

fn build_prompt(query: &DiscoveryQuery) -> String {
    let location = if query.location.trim().is_empty() {
        "anywhere"
    } else {
        query.location.trim()
    };
    format!(
        "Role: {}\nLocation: {}\n\nPropose up to {} companies.",
        query.role.trim(),
        location,
        query.max_companies
    )
}

/// Parse the oracle's answer into a deduplicated candidate list.
///
/// Tolerates markdown code fences and prose around the JSON array.
/// Candidates with the same name (case-insensitive, after trimming) keep
/// the first occurrence.
fn parse_companies(
    text: &str,
    max_companies: u32,
) -> Result<Vec<DiscoveredCompany>, DiscoveryError> {
    let cleaned = strip_code_fences(text.trim());

    let raw: Vec<DiscoveredCompany> = serde_json::from_str(cleaned)
        .or_else(|first_err| match extract_json_array(cleaned) {
            Some(slice) => serde_json::from_str(slice).map_err(|_| first_err),
            None => Err(first_err),
        })
        .map_err(|e| {
            DiscoveryError::Unparsable(format!(
                "{}: {}",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut companies = Vec::new();
    for company in raw {
        let name = company.name.trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_lowercase()) {
            continue;
        }
        companies.push(DiscoveredCompany {
            name: name.to_string(),
            reason: company.reason.trim().to_string(),
            industry: company.industry.trim().to_string(),
        });
        if companies.len() == max_companies as usize {
            break;
        }
    }

    if companies.is_empty() {
        return Err(DiscoveryError::NoCandidates);
    }

    Ok(companies)
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the fence line itself (may carry a language tag).
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    match body.rfind("```") {
        Some(idx) => body[..idx].trim(),
        None => body.trim(),
    }
}

/// Locate the outermost JSON array inside surrounding prose.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
