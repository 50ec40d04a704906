use std::sync::Arc;

use jobscout_core::{
    AuditHandle, AuditStore, Config, MatchRecomputer, PostingStore, ProfileStore, RunOrchestrator,
    SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    audit: AuditHandle,
    audit_store: Arc<dyn AuditStore>,
    postings: Arc<dyn PostingStore>,
    profiles: Arc<dyn ProfileStore>,
    recomputer: Arc<MatchRecomputer>,
    orchestrator: Arc<RunOrchestrator>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        audit: AuditHandle,
        audit_store: Arc<dyn AuditStore>,
        postings: Arc<dyn PostingStore>,
        profiles: Arc<dyn ProfileStore>,
        recomputer: Arc<MatchRecomputer>,
        orchestrator: Arc<RunOrchestrator>,
    ) -> Self {
        Self {
            config,
            audit,
            audit_store,
            postings,
            profiles,
            recomputer,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }

    pub fn audit_store(&self) -> &dyn AuditStore {
        self.audit_store.as_ref()
    }

    pub fn postings(&self) -> &dyn PostingStore {
        self.postings.as_ref()
    }

    pub fn profiles(&self) -> &dyn ProfileStore {
        self.profiles.as_ref()
    }

    pub fn recomputer(&self) -> &MatchRecomputer {
        self.recomputer.as_ref()
    }

    pub fn orchestrator(&self) -> &RunOrchestrator {
        self.orchestrator.as_ref()
    }
}
