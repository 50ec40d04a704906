mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobscout_core::{
    create_audit_system, load_config, validate_config, AuditEvent, AuditStore, BoardSource,
    EmployerSearcher, Ingestor, JobSource, MatchEngine, MatchRecomputer, OracleDiscoverer,
    PostingStore, ProfileStore, RunOrchestrator, SqliteAuditStore, SqliteMatchStore,
    SqlitePostingStore, SqliteProfileStore,
};

use api::create_router;
use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("JOBSCOUT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Oracle provider: {:?}", config.oracle.provider);
    info!("Database path: {:?}", config.database.path);

    // Compute config hash for audit
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    // Create SQLite stores
    let audit_store: Arc<dyn AuditStore> = Arc::new(
        SqliteAuditStore::new(&config.database.path).context("Failed to create audit store")?,
    );
    let posting_store: Arc<dyn PostingStore> = Arc::new(
        SqlitePostingStore::new(&config.database.path).context("Failed to create posting store")?,
    );
    let profile_store: Arc<dyn ProfileStore> = Arc::new(
        SqliteProfileStore::new(&config.database.path).context("Failed to create profile store")?,
    );
    let match_store = Arc::new(
        SqliteMatchStore::new(&config.database.path).context("Failed to create match store")?,
    );
    info!("Stores initialized");

    // Create audit system
    let (audit_handle, audit_writer) =
        create_audit_system(Arc::clone(&audit_store), config.audit.buffer_size);

    // Spawn audit writer task
    let writer_handle = tokio::spawn(audit_writer.run());

    // Emit ServiceStarted event
    audit_handle
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash_short.to_string(),
        })
        .await;

    // Create the oracle client and discoverer
    let llm = jobscout_core::discovery::client_from_config(&config.oracle)
        .context("Failed to create oracle client")?;
    info!(
        "Oracle initialized: provider {} model {}",
        llm.provider(),
        llm.model()
    );
    let discoverer = Arc::new(OracleDiscoverer::new(llm));

    // Create job sources and searcher
    let board: Arc<dyn JobSource> = Arc::new(BoardSource::new(&config.search));
    let searcher = Arc::new(EmployerSearcher::new(vec![board]));
    info!("Job board source at {}", config.search.base_url);

    // Create ingestion and matching
    let ingestor = Arc::new(Ingestor::new(Arc::clone(&posting_store)));
    let recomputer = Arc::new(MatchRecomputer::new(
        MatchEngine::new(config.matching.clone()),
        Arc::clone(&posting_store),
        match_store,
        Arc::clone(&profile_store),
    ));

    // Create run orchestrator
    let orchestrator = Arc::new(RunOrchestrator::new(
        discoverer,
        searcher,
        ingestor,
        Arc::clone(&recomputer),
        Arc::clone(&profile_store),
        audit_handle.clone(),
        config.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        audit_handle.clone(),
        audit_store,
        posting_store,
        profile_store,
        recomputer,
        orchestrator,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Emit ServiceStopped event
    info!("Server shutting down...");
    audit_handle
        .emit(AuditEvent::ServiceStopped {
            reason: "graceful_shutdown".to_string(),
        })
        .await;

    // Drop all holders of AuditHandle so the writer's channel closes.
    // AppState went down with the server; this is the last clone.
    // Order matters: we emit the final event BEFORE dropping handles.
    drop(audit_handle);

    // Wait for writer to finish processing remaining events
    let _ = writer_handle.await;
    info!("Audit writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
