use super::types::{Config, OracleProvider};
use super::ConfigError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate configuration
/// Currently validates:
/// - Oracle section exists (enforced by serde)
/// - Server port is not 0
/// - Anthropic provider has an API key
/// - Company and posting caps stay within 1..=15
/// - Scoring weights sum to 1.0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Oracle validation
    if config.oracle.provider == OracleProvider::Anthropic
        && config.oracle.api_key.as_ref().is_none_or(|k| k.is_empty())
    {
        return Err(ConfigError::ValidationError(
            "oracle.api_key is required for the anthropic provider".to_string(),
        ));
    }
    if config.oracle.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "oracle.timeout_secs cannot be 0".to_string(),
        ));
    }
    if !(1..=15).contains(&config.oracle.max_companies) {
        return Err(ConfigError::ValidationError(format!(
            "oracle.max_companies must be between 1 and 15, got {}",
            config.oracle.max_companies
        )));
    }

    // Search validation
    if config.search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs cannot be 0".to_string(),
        ));
    }
    if !(1..=15).contains(&config.search.default_max_jobs) {
        return Err(ConfigError::ValidationError(format!(
            "search.default_max_jobs must be between 1 and 15, got {}",
            config.search.default_max_jobs
        )));
    }

    // Matching validation
    let m = &config.matching;
    for (name, weight) in [
        ("matching.weight_required", m.weight_required),
        ("matching.weight_preferred", m.weight_preferred),
        ("matching.weight_experience", m.weight_experience),
        ("matching.weight_recency", m.weight_recency),
    ] {
        if !(0.0..=1.0).contains(&weight) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be between 0.0 and 1.0, got {weight}"
            )));
        }
    }
    let weight_sum = m.weight_required + m.weight_preferred + m.weight_experience + m.weight_recency;
    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::ValidationError(format!(
            "matching weights must sum to 1.0, got {weight_sum}"
        )));
    }
    if !(0.0..=100.0).contains(&m.recency_floor) {
        return Err(ConfigError::ValidationError(format!(
            "matching.recency_floor must be between 0.0 and 100.0, got {}",
            m.recency_floor
        )));
    }
    if m.recency_cutoff_days <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "matching.recency_cutoff_days must be positive, got {}",
            m.recency_cutoff_days
        )));
    }
    if m.experience_penalty_per_year < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "matching.experience_penalty_per_year cannot be negative, got {}",
            m.experience_penalty_per_year
        )));
    }

    // Progress validation
    if config.progress.channel_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "progress.channel_capacity cannot be 0".to_string(),
        ));
    }

    // Audit validation
    if config.audit.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "audit.buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
