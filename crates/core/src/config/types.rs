use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub oracle: OracleConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("jobscout.db")
}

/// Company-discovery oracle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// LLM provider used for company discovery
    pub provider: OracleProvider,
    /// API key (required for the anthropic provider)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name (e.g. "claude-3-5-haiku-20241022" or "llama3.2")
    #[serde(default = "default_oracle_model")]
    pub model: String,
    /// Base URL override (defaults per provider)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u32,
    /// Maximum companies requested per run (default: 10)
    #[serde(default = "default_max_companies")]
    pub max_companies: u32,
}

/// Available oracle providers
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OracleProvider {
    Anthropic,
    Ollama,
}

fn default_oracle_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_oracle_timeout() -> u32 {
    30
}

fn default_max_companies() -> u32 {
    10
}

/// Job-board search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Job-board API base URL
    #[serde(default = "default_board_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 20)
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u32,
    /// Postings cap per employer when the request does not specify one
    #[serde(default = "default_max_jobs")]
    pub default_max_jobs: u32,
    /// Whether full descriptions are fetched when the request does not say
    #[serde(default = "default_fetch_details")]
    pub fetch_details_default: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_board_url(),
            timeout_secs: default_search_timeout(),
            default_max_jobs: default_max_jobs(),
            fetch_details_default: default_fetch_details(),
        }
    }
}

fn default_fetch_details() -> bool {
    true
}

fn default_board_url() -> String {
    "https://boards-api.example.com".to_string()
}

fn default_search_timeout() -> u32 {
    20
}

fn default_max_jobs() -> u32 {
    5
}

/// Compatibility scoring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Weight of required-skill coverage (weights must sum to 1.0)
    #[serde(default = "default_weight_required")]
    pub weight_required: f64,
    /// Weight of preferred-skill coverage
    #[serde(default = "default_weight_preferred")]
    pub weight_preferred: f64,
    /// Weight of experience fit
    #[serde(default = "default_weight_experience")]
    pub weight_experience: f64,
    /// Weight of posting recency
    #[serde(default = "default_weight_recency")]
    pub weight_recency: f64,
    /// Recency score floor reached at the cutoff age
    #[serde(default = "default_recency_floor")]
    pub recency_floor: f64,
    /// Posting age in days at which recency bottoms out
    #[serde(default = "default_recency_cutoff_days")]
    pub recency_cutoff_days: i64,
    /// Experience penalty per year of gap from the expected midpoint
    #[serde(default = "default_experience_penalty")]
    pub experience_penalty_per_year: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weight_required: default_weight_required(),
            weight_preferred: default_weight_preferred(),
            weight_experience: default_weight_experience(),
            weight_recency: default_weight_recency(),
            recency_floor: default_recency_floor(),
            recency_cutoff_days: default_recency_cutoff_days(),
            experience_penalty_per_year: default_experience_penalty(),
        }
    }
}

fn default_weight_required() -> f64 {
    0.45
}

fn default_weight_preferred() -> f64 {
    0.20
}

fn default_weight_experience() -> f64 {
    0.25
}

fn default_weight_recency() -> f64 {
    0.10
}

fn default_recency_floor() -> f64 {
    50.0
}

fn default_recency_cutoff_days() -> i64 {
    60
}

fn default_experience_penalty() -> f64 {
    10.0
}

/// Progress stream configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressConfig {
    /// Bounded event queue size between the run task and the consumer.
    /// A full queue blocks the run rather than dropping events.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    32
}

/// Audit trail configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Audit channel buffer size
    #[serde(default = "default_audit_buffer")]
    pub buffer_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            buffer_size: default_audit_buffer(),
        }
    }
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_buffer() -> usize {
    256
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub oracle: SanitizedOracleConfig,
    pub search: SearchConfig,
    pub matching: MatchingConfig,
    pub progress: ProgressConfig,
    pub audit: AuditConfig,
}

/// Sanitized oracle config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOracleConfig {
    pub provider: String,
    pub api_key_configured: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u32,
    pub max_companies: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            oracle: SanitizedOracleConfig {
                provider: match config.oracle.provider {
                    OracleProvider::Anthropic => "anthropic".to_string(),
                    OracleProvider::Ollama => "ollama".to_string(),
                },
                api_key_configured: config
                    .oracle
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                model: config.oracle.model.clone(),
                base_url: config.oracle.base_url.clone(),
                timeout_secs: config.oracle.timeout_secs,
                max_companies: config.oracle.max_companies,
            },
            search: config.search.clone(),
            matching: config.matching.clone(),
            progress: config.progress.clone(),
            audit: config.audit.clone(),
        }
    }
}
