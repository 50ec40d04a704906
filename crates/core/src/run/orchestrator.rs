//! The run orchestrator: one spawned task per research run.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::audit::{AuditEvent, AuditHandle};
use crate::config::Config;
use crate::discovery::{CompanyDiscoverer, DiscoveryQuery, DiscoveryResult};
use crate::ingest::Ingestor;
use crate::matching::MatchRecomputer;
use crate::metrics;
use crate::profile::{ProfileError, ProfileStore};
use crate::search::{EmployerQuery, EmployerSearcher};

use super::events::ProgressEvent;
use super::progress::{progress_channel, ProgressSender, ProgressStream};
use super::types::{CandidateStatus, RunRequest};

/// Errors that reject a run before it starts.
///
/// Once the run task is spawned, failures travel through the progress
/// stream as `error` events instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Profile store error: {0}")]
    Profile(String),
}

/// Starts research runs and drives each one to completion.
///
/// A run is sequential: one oracle call, then one employer at a time.
/// The consumer follows along on the returned progress stream, and
/// dropping that stream cancels the run at the next employer boundary.
pub struct RunOrchestrator {
    discoverer: Arc<dyn CompanyDiscoverer>,
    searcher: Arc<EmployerSearcher>,
    ingestor: Arc<Ingestor>,
    recomputer: Arc<MatchRecomputer>,
    profiles: Arc<dyn ProfileStore>,
    audit: AuditHandle,
    config: Config,
}

impl RunOrchestrator {
    pub fn new(
        discoverer: Arc<dyn CompanyDiscoverer>,
        searcher: Arc<EmployerSearcher>,
        ingestor: Arc<Ingestor>,
        recomputer: Arc<MatchRecomputer>,
        profiles: Arc<dyn ProfileStore>,
        audit: AuditHandle,
        config: Config,
    ) -> Self {
        Self {
            discoverer,
            searcher,
            ingestor,
            recomputer,
            profiles,
            audit,
            config,
        }
    }

    /// Validate the request, spawn the run task and hand back the
    /// progress stream.
    pub fn start(&self, request: RunRequest) -> Result<ProgressStream, RunError> {
        request.validate().map_err(RunError::Invalid)?;

        if let Some(profile_id) = &request.profile_id {
            match self.profiles.get(profile_id) {
                Ok(Some(_)) => {}
                Ok(None) => return Err(RunError::ProfileNotFound(profile_id.clone())),
                Err(ProfileError::NotFound(id)) => return Err(RunError::ProfileNotFound(id)),
                Err(e) => return Err(RunError::Profile(e.to_string())),
            }
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let (sender, stream) = progress_channel(self.config.progress.channel_capacity);

        let task = RunTask {
            run_id: run_id.clone(),
            max_jobs: request.effective_max_jobs(&self.config.search),
            fetch_details: request.effective_fetch_details(&self.config.search),
            max_companies: self.config.oracle.max_companies,
            request,
            discoverer: Arc::clone(&self.discoverer),
            searcher: Arc::clone(&self.searcher),
            ingestor: Arc::clone(&self.ingestor),
            recomputer: Arc::clone(&self.recomputer),
            audit: self.audit.clone(),
            sender,
        };

        info!(run_id = %run_id, role = %task.request.role, "Run started");
        tokio::spawn(task.run());

        Ok(stream)
    }
}

struct RunTask {
    run_id: String,
    request: RunRequest,
    max_jobs: u32,
    fetch_details: bool,
    max_companies: u32,
    discoverer: Arc<dyn CompanyDiscoverer>,
    searcher: Arc<EmployerSearcher>,
    ingestor: Arc<Ingestor>,
    recomputer: Arc<MatchRecomputer>,
    audit: AuditHandle,
    sender: ProgressSender,
}

impl RunTask {
    async fn run(self) {
        let start = Instant::now();

        self.audit
            .emit(AuditEvent::RunStarted {
                run_id: self.run_id.clone(),
                role: self.request.role.clone(),
                location: self.request.location.clone(),
                max_jobs: self.max_jobs,
                profile_id: self.request.profile_id.clone(),
            })
            .await;

        if self.emit(ProgressEvent::ResearchStart).await.is_err() {
            return self.cancelled(0, start).await;
        }

        let discovery = match self.discover().await {
            Ok(discovery) => discovery,
            Err(message) => return self.failed(message, start).await,
        };

        let event = ProgressEvent::CompaniesFound {
            companies: discovery.companies.clone(),
        };
        if self.emit(event).await.is_err() {
            return self.cancelled(0, start).await;
        }

        let mut total_new: u32 = 0;
        let mut searched: u32 = 0;

        for company in &discovery.companies {
            // Cancellation takes effect between employers, never in the
            // middle of one.
            if self.sender.is_cancelled() {
                return self.cancelled(searched, start).await;
            }

            let event = ProgressEvent::SearchingCompany {
                company: company.name.clone(),
            };
            if self.emit(event).await.is_err() {
                return self.cancelled(searched, start).await;
            }

            match self.search_and_ingest(&company.name).await {
                Ok(outcome) => {
                    searched += 1;
                    total_new += outcome.new;
                    if self.emit(outcome.into_event(&company.name)).await.is_err() {
                        return self.cancelled(searched, start).await;
                    }
                }
                Err(message) => return self.failed(message, start).await,
            }
        }

        if let Some(profile_id) = self.request.profile_id.clone() {
            if let Err(message) = self.recompute_matches(&profile_id).await {
                return self.failed(message, start).await;
            }
        }

        if self
            .emit(ProgressEvent::Complete { total_new })
            .await
            .is_err()
        {
            return self.cancelled(searched, start).await;
        }

        let duration = start.elapsed();
        metrics::RUNS_TOTAL.with_label_values(&["completed"]).inc();
        metrics::RUN_DURATION
            .with_label_values(&["completed"])
            .observe(duration.as_secs_f64());

        self.audit
            .emit(AuditEvent::RunCompleted {
                run_id: self.run_id.clone(),
                companies_searched: searched,
                total_new,
                duration_ms: duration.as_millis() as u64,
            })
            .await;

        info!(
            run_id = %self.run_id,
            companies = searched,
            total_new = total_new,
            "Run completed"
        );
    }

    async fn discover(&self) -> Result<DiscoveryResult, String> {
        let query = DiscoveryQuery {
            role: self.request.role.trim().to_string(),
            location: self.request.location.trim().to_string(),
            max_companies: self.max_companies,
        };

        let oracle_start = Instant::now();
        let discovery = match self.discoverer.discover(&query).await {
            Ok(discovery) => discovery,
            Err(e) => {
                self.audit
                    .emit(AuditEvent::OracleCallFailed {
                        run_id: self.run_id.clone(),
                        provider: self.discoverer.name().to_string(),
                        error: e.to_string(),
                        duration_ms: oracle_start.elapsed().as_millis() as u64,
                    })
                    .await;
                return Err(e.to_string());
            }
        };

        metrics::ORACLE_TOKENS
            .with_label_values(&[&discovery.provider, "input"])
            .inc_by(discovery.usage.input_tokens as u64);
        metrics::ORACLE_TOKENS
            .with_label_values(&[&discovery.provider, "output"])
            .inc_by(discovery.usage.output_tokens as u64);
        metrics::COMPANIES_DISCOVERED
            .with_label_values(&[])
            .observe(discovery.companies.len() as f64);

        self.audit
            .emit(AuditEvent::OracleCallCompleted {
                run_id: self.run_id.clone(),
                provider: discovery.provider.clone(),
                model: discovery.model.clone(),
                input_tokens: discovery.usage.input_tokens,
                output_tokens: discovery.usage.output_tokens,
                duration_ms: discovery.duration_ms,
            })
            .await;
        self.audit
            .emit(AuditEvent::CompaniesDiscovered {
                run_id: self.run_id.clone(),
                count: discovery.companies.len() as u32,
                provider: discovery.provider.clone(),
                model: discovery.model.clone(),
                duration_ms: discovery.duration_ms,
            })
            .await;

        Ok(discovery)
    }

    /// Search one employer and persist what came back.
    ///
    /// A source failure is scoped to the employer; only a posting-store
    /// failure is terminal for the run.
    async fn search_and_ingest(&self, employer: &str) -> Result<EmployerOutcome, String> {
        let query = EmployerQuery {
            employer: employer.to_string(),
            role: self.request.role.trim().to_string(),
            location: self.request.location.trim().to_string(),
            max_results: self.max_jobs,
            fetch_details: self.fetch_details,
        };

        let search_start = Instant::now();
        let result = match self.searcher.search_employer(&query).await {
            Ok(result) => result,
            Err(e) => {
                let duration_ms = search_start.elapsed().as_millis() as u64;
                warn!(
                    run_id = %self.run_id,
                    employer = employer,
                    error = %e,
                    "Employer search failed"
                );
                metrics::EMPLOYER_SEARCHES
                    .with_label_values(&["error"])
                    .inc();
                self.audit
                    .emit(AuditEvent::EmployerSearchCompleted {
                        run_id: self.run_id.clone(),
                        employer: employer.to_string(),
                        status: CandidateStatus::Error.as_str().to_string(),
                        found: 0,
                        duration_ms,
                        error: Some(e.to_string()),
                    })
                    .await;
                return Ok(EmployerOutcome {
                    status: CandidateStatus::Error,
                    found: 0,
                    new: 0,
                });
            }
        };

        let found = result.postings.len() as u32;
        metrics::EMPLOYER_SEARCHES
            .with_label_values(&["done"])
            .inc();
        metrics::EMPLOYER_SEARCH_DURATION
            .with_label_values(&[])
            .observe(result.duration_ms as f64 / 1000.0);

        let report = self
            .ingestor
            .ingest_batch(employer, result.postings)
            .map_err(|e| e.to_string())?;

        metrics::POSTINGS_INGESTED
            .with_label_values(&["new"])
            .inc_by(report.new as u64);
        metrics::POSTINGS_INGESTED
            .with_label_values(&["duplicate"])
            .inc_by(report.duplicates as u64);
        metrics::POSTINGS_INGESTED
            .with_label_values(&["invalid"])
            .inc_by(report.errors.len() as u64);
        metrics::NEW_POSTINGS_PER_EMPLOYER
            .with_label_values(&[])
            .observe(report.new as f64);

        self.audit
            .emit(AuditEvent::EmployerSearchCompleted {
                run_id: self.run_id.clone(),
                employer: employer.to_string(),
                status: CandidateStatus::Done.as_str().to_string(),
                found,
                duration_ms: result.duration_ms,
                error: None,
            })
            .await;
        self.audit
            .emit(AuditEvent::PostingsIngested {
                run_id: self.run_id.clone(),
                employer: employer.to_string(),
                found: report.found,
                new: report.new,
                duplicates: report.duplicates,
                errors: report.errors.len() as u32,
            })
            .await;

        Ok(EmployerOutcome {
            status: CandidateStatus::Done,
            found,
            new: report.new,
        })
    }

    /// Recompute the requesting profile's matches over the enlarged
    /// posting corpus. The new postings are already persisted, but a
    /// store failure here still fails the run: the caller asked for a
    /// refreshed ranking and is not getting one.
    async fn recompute_matches(&self, profile_id: &str) -> Result<(), String> {
        let recompute_start = Instant::now();
        match self.recomputer.recompute_all(profile_id) {
            Ok(scored) => {
                metrics::MATCH_RECOMPUTATIONS.inc();
                self.audit
                    .emit(AuditEvent::MatchesRecomputed {
                        profile_id: profile_id.to_string(),
                        run_id: Some(self.run_id.clone()),
                        postings_scored: scored,
                        duration_ms: recompute_start.elapsed().as_millis() as u64,
                    })
                    .await;
                Ok(())
            }
            Err(e) => {
                warn!(
                    run_id = %self.run_id,
                    profile_id = profile_id,
                    error = %e,
                    "Post-run match recompute failed"
                );
                Err(format!("match recompute failed: {e}"))
            }
        }
    }

    async fn emit(&self, event: ProgressEvent) -> Result<(), super::progress::ProgressClosed> {
        self.sender.emit(event).await
    }

    /// The consumer went away; stop quietly. No terminal event is
    /// emitted for a cancelled run.
    async fn cancelled(self, searched: u32, start: Instant) {
        metrics::RUNS_TOTAL.with_label_values(&["cancelled"]).inc();
        metrics::RUN_DURATION
            .with_label_values(&["cancelled"])
            .observe(start.elapsed().as_secs_f64());

        self.audit
            .emit(AuditEvent::RunCancelled {
                run_id: self.run_id.clone(),
                companies_searched: searched,
            })
            .await;

        info!(run_id = %self.run_id, companies = searched, "Run cancelled");
    }

    async fn failed(self, message: String, start: Instant) {
        metrics::RUNS_TOTAL.with_label_values(&["failed"]).inc();
        metrics::RUN_DURATION
            .with_label_values(&["failed"])
            .observe(start.elapsed().as_secs_f64());

        self.audit
            .emit(AuditEvent::RunFailed {
                run_id: self.run_id.clone(),
                error: message.clone(),
            })
            .await;

        warn!(run_id = %self.run_id, error = %message, "Run failed");

        // Best effort; the consumer may already be gone.
        let _ = self
            .sender
            .emit(ProgressEvent::Error { message })
            .await;
    }
}

struct EmployerOutcome {
    status: CandidateStatus,
    found: u32,
    new: u32,
}

impl EmployerOutcome {
    fn into_event(self, company: &str) -> ProgressEvent {
        ProgressEvent::CompanyDone {
            company: company.to_string(),
            status: self.status,
            found: self.found,
            new: self.new,
        }
    }
}
