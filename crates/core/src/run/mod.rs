//! Research runs: discovery, per-employer search, ingestion and
//! progress streaming.

mod events;
mod orchestrator;
mod progress;
mod types;

pub use events::ProgressEvent;
pub use orchestrator::{RunError, RunOrchestrator};
pub use progress::{progress_channel, CancelFlag, ProgressClosed, ProgressSender, ProgressStream};
pub use types::{CandidateStatus, RunRequest};
