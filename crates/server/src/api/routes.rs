use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{audit, handlers, matches, middleware, postings, profiles, research};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Research runs (SSE)
        .route("/research", post(research::start_research))
        // Profiles
        .route("/profiles", post(profiles::create_profile))
        .route("/profiles", get(profiles::list_profiles))
        .route("/profiles/{id}", get(profiles::get_profile))
        .route("/profiles/{id}/matches", get(matches::list_matches))
        // Postings
        .route("/postings", get(postings::list_postings))
        // Audit
        .route("/audit", get(audit::query_audit));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::get_metrics))
        .layer(axum_middleware::from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
