pub mod audit;
pub mod config;
pub mod discovery;
pub mod ingest;
pub mod matching;
pub mod metrics;
pub mod posting;
pub mod profile;
pub mod run;
pub mod search;
pub mod testing;

pub use audit::{
    create_audit_system, AuditEvent, AuditFilter, AuditHandle, AuditRecord, AuditStore,
    AuditWriter, SqliteAuditStore,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, OracleProvider,
    SanitizedConfig,
};
pub use discovery::{client_from_config, CompanyDiscoverer, LlmClient, OracleDiscoverer};
pub use ingest::Ingestor;
pub use matching::{MatchEngine, MatchFilter, MatchRecomputer, MatchStore, SqliteMatchStore};
pub use posting::{PostingFilter, PostingStore, SqlitePostingStore};
pub use profile::{ProfileStore, SqliteProfileStore};
pub use run::{ProgressEvent, ProgressStream, RunError, RunOrchestrator, RunRequest};
pub use search::{BoardSource, EmployerSearcher, JobSource};
