//! Research run endpoint: starts a run and streams its progress as
//! server-sent events.
//!
//! Validation and profile lookup happen before the stream opens, so a
//! bad request gets a plain error status instead of an SSE body. Once
//! the stream is open, failures arrive as `error` events inside it.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;

use jobscout_core::run::{RunError, RunRequest};

use crate::metrics::{SSE_EVENTS_SENT, SSE_STREAMS_ACTIVE};
use crate::state::AppState;

/// Error response for run requests rejected before the stream opens
#[derive(Debug, Serialize)]
pub struct ResearchErrorResponse {
    pub error: String,
}

type ResearchErrorTuple = (StatusCode, Json<ResearchErrorResponse>);

/// Start a research run and stream progress events
pub async fn start_research(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ResearchErrorTuple> {
    let progress = state.orchestrator().start(request).map_err(|e| {
        let status = match &e {
            RunError::Invalid(_) => StatusCode::BAD_REQUEST,
            RunError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            RunError::Profile(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ResearchErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    SSE_STREAMS_ACTIVE.inc();

    // Guard wraps the progress stream so the gauge drops with the
    // connection, whether the run finished or the client went away.
    let stream = StreamGuard { inner: progress }.map(|event| {
        SSE_EVENTS_SENT.with_label_values(&[event.event_name()]).inc();
        let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().event(event.event_name()).data(data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

struct StreamGuard {
    inner: jobscout_core::ProgressStream,
}

impl Stream for StreamGuard {
    type Item = jobscout_core::ProgressEvent;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        std::pin::Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        SSE_STREAMS_ACTIVE.dec();
    }
}
