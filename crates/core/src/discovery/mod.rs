//! Company discovery: one oracle call per run proposing employer candidates.

mod discoverer;
mod llm;
mod types;

pub use discoverer::{CompanyDiscoverer, OracleDiscoverer};
pub use llm::{
    client_from_config, AnthropicClient, CompletionRequest, CompletionResponse, LlmClient,
    LlmError, LlmUsage, OllamaClient,
};
pub use types::{DiscoveredCompany, DiscoveryError, DiscoveryQuery, DiscoveryResult};
