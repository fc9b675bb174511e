use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use unzipper_transport::Transport;

use crate::orchestrator::{JobContext, JobRunner};

/// Runs jobs concurrently, at most `max_concurrent` at a time.
///
/// Submitted jobs beyond the limit wait for a permit inside their own task,
/// so [`JobPool::submit`] never blocks the caller.
pub struct JobPool<T> {
    runner: JobRunner<T>,
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
}

impl<T: Transport + 'static> JobPool<T> {
    pub fn new(runner: JobRunner<T>, max_concurrent: usize) -> Self {
        Self {
            runner,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tasks: JoinSet::new(),
        }
    }

    pub fn submit(&mut self, ctx: JobContext) {
        self.reap();

        let runner = self.runner.clone();
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                tracing::warn!(archive = %ctx.archive.file_name, "job pool closed, dropping job");
                return;
            };
            // Aborts are already reported to the requester and logged.
            let _ = runner.on_archive_received(ctx).await;
        });
    }

    /// Jobs submitted and not yet reaped, running or waiting for a permit.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every submitted job to finish.
    pub async fn shutdown(mut self) {
        let pending = self.tasks.len();
        if pending > 0 {
            tracing::info!(pending, "waiting for running jobs");
        }
        while let Some(joined) = self.tasks.join_next().await {
            log_join(joined);
        }
    }

    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            log_join(joined);
        }
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "job task panicked");
    }
}
