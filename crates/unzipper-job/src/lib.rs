//! Per-archive job pipeline.
//!
//! One [`JobRunner::on_archive_received`] call owns one job from start to
//! finish:
//!
//! ```text
//! Received → Downloading → Analyzing → Reported → Extracting
//!          → Distributing → Summarized → Cleaned
//! ```
//!
//! Any fatal stage failure moves the job to `Aborted`. Either way the job's
//! workspace is released exactly once before the call returns.
//! [`JobPool`] bounds how many of these run at the same time.

mod config;
mod distribute;
mod error;
mod messages;
mod orchestrator;
mod pool;
mod state;

pub use config::JobConfig;
pub use distribute::{SkipReason, TransferOutcome, TransferUnit, distribute};
pub use error::AbortReason;
pub use messages::format_size;
pub use orchestrator::{JobContext, JobRunner, JobSummary};
pub use pool::JobPool;
pub use state::JobState;
