//! Progress delivery between a run task and its consumer.
//!
//! A bounded channel connects the two: when the consumer is slow the
//! queue fills and the run task blocks on the next emit instead of
//! dropping events. Dropping the stream flips a shared cancel flag,
//! which the run task checks between employers; a failed emit means
//! the consumer is gone and counts as the same signal.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use thiserror::Error;
use tokio::sync::mpsc;

use super::events::ProgressEvent;

/// The consumer disconnected; no further events can be delivered.
#[derive(Debug, Error)]
#[error("Progress consumer disconnected")]
pub struct ProgressClosed;

/// Shared cooperative-cancellation flag for one run.
#[derive(Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Producer half held by the run task.
#[derive(Clone)]
pub struct ProgressSender {
    tx: mpsc::Sender<ProgressEvent>,
    cancel: CancelFlag,
}

impl ProgressSender {
    /// Deliver one event, waiting if the queue is full.
    ///
    /// An error means the consumer dropped the stream; the run should
    /// treat it as cancellation.
    pub async fn emit(&self, event: ProgressEvent) -> Result<(), ProgressClosed> {
        self.tx.send(event).await.map_err(|_| ProgressClosed)
    }

    /// Whether the consumer has asked the run to stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Consumer half returned to the caller that started the run.
///
/// Dropping it cancels the run cooperatively: the run task stops at
/// the next employer boundary.
pub struct ProgressStream {
    rx: mpsc::Receiver<ProgressEvent>,
    cancel: CancelFlag,
}

impl Stream for ProgressStream {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for ProgressStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Create a connected sender/stream pair with the given queue capacity.
pub fn progress_channel(capacity: usize) -> (ProgressSender, ProgressStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let cancel = CancelFlag::new();
    let sender = ProgressSender {
        tx,
        cancel: cancel.clone(),
    };
    let stream = ProgressStream { rx, cancel };
    (sender, stream)
}
