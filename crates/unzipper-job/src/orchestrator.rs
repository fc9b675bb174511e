use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use unzipper_archive::{AnalysisResult, MediaExtensions};
use unzipper_fs::{JobId, JobWorkspace, WorkspaceRoots};
use unzipper_transport::{ChatId, FileRef, MessageRef, Requester, StatusHandle, Transport};

use crate::config::JobConfig;
use crate::distribute::{TransferOutcome, distribute};
use crate::error::AbortReason;
use crate::messages;
use crate::state::JobState;

/// Everything the dispatcher knows about one inbound archive.
#[derive(Clone, Debug)]
pub struct JobContext {
    pub requester: Requester,
    /// The inbound message, forwarded to the audit chat.
    pub origin: MessageRef,
    pub archive: FileRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSummary {
    pub job_id: JobId,
    pub archive_name: String,
    pub total_entries: usize,
    pub files_sent: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
}

/// Runs jobs against one transport with one immutable configuration.
pub struct JobRunner<T> {
    transport: Arc<T>,
    config: Arc<JobConfig>,
    roots: WorkspaceRoots,
    media: MediaExtensions,
}

impl<T> Clone for JobRunner<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            roots: self.roots.clone(),
            media: self.media.clone(),
        }
    }
}

/// One job in flight. Owns the workspace until [`Job::finish`].
struct Job {
    id: JobId,
    state: JobState,
    workspace: JobWorkspace,
    archive_path: PathBuf,
}

impl Job {
    fn advance(&mut self, next: JobState) {
        tracing::debug!(job_id = %self.id, from = %self.state, to = %next, "job state");
        self.state = next;
    }

    /// Release the workspace off the runtime and enter the terminal state.
    async fn finish(mut self, terminal: JobState) -> JobState {
        self.advance(terminal);
        let workspace = self.workspace;
        if let Err(e) = tokio::task::spawn_blocking(move || workspace.release()).await {
            tracing::error!(job_id = %self.id, error = %e, "workspace release task failed");
        }
        terminal
    }
}

/// The editable status message of one job.
///
/// If the initial message could not be sent, updates fall back to plain
/// messages. Failures are logged and otherwise ignored.
struct StatusLine<'a, T> {
    transport: &'a T,
    chat: ChatId,
    handle: Option<StatusHandle>,
}

impl<'a, T: Transport> StatusLine<'a, T> {
    async fn open(transport: &'a T, chat: ChatId, text: &str) -> Self {
        let handle = match transport.send_status(chat, text).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(chat = %chat, error = %e, "could not send status message");
                None
            }
        };
        Self {
            transport,
            chat,
            handle,
        }
    }

    async fn update(&self, text: &str) {
        let result = match self.handle {
            Some(handle) => self.transport.edit_status(handle, text).await,
            None => self.transport.send_text(self.chat, text).await,
        };
        if let Err(e) = result {
            tracing::warn!(chat = %self.chat, error = %e, "could not update status message");
        }
    }
}

impl<T: Transport> JobRunner<T> {
    pub fn new(transport: Arc<T>, config: Arc<JobConfig>) -> Self {
        let roots = config.roots();
        let media = config.media();
        Self {
            transport,
            config,
            roots,
            media,
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Process one inbound archive end to end.
    ///
    /// Whatever the outcome, the job's directories are gone when this
    /// returns.
    #[tracing::instrument(
        skip_all,
        fields(
            job_id = tracing::field::Empty,
            user_id = ctx.requester.user_id,
            archive = %ctx.archive.file_name,
        )
    )]
    pub async fn on_archive_received(&self, ctx: JobContext) -> Result<JobSummary, AbortReason> {
        let job_id = JobId::generate();
        tracing::Span::current().record("job_id", tracing::field::display(&job_id));
        tracing::info!(chat = %ctx.requester.chat, "archive received");

        self.forward_to_audit(ctx.origin).await;

        let transport = self.transport.as_ref();
        let status = StatusLine::open(transport, ctx.requester.chat, messages::RECEIVED).await;

        let workspace = match self.allocate(&job_id).await {
            Ok(workspace) => workspace,
            Err(reason) => {
                tracing::error!(error = %reason, "job aborted");
                status.update(reason.user_message()).await;
                return Err(reason);
            }
        };

        let archive_path = workspace
            .download_dir()
            .join(local_file_name(&ctx.archive.file_name));
        let mut job = Job {
            id: job_id,
            state: JobState::Received,
            workspace,
            archive_path,
        };

        let result = self.run_stages(&mut job, &ctx, &status).await;

        match result {
            Ok(summary) => {
                let terminal = job.finish(JobState::Cleaned).await;
                tracing::info!(
                    state = %terminal,
                    sent = summary.files_sent,
                    skipped = summary.files_skipped,
                    failed = summary.files_failed,
                    total = summary.total_entries,
                    "job complete"
                );
                Ok(summary)
            }
            Err(reason) => {
                tracing::error!(stage = %reason.stage(), error = %reason, "job aborted");
                status.update(reason.user_message()).await;
                job.finish(JobState::Aborted).await;
                Err(reason)
            }
        }
    }

    async fn run_stages(
        &self,
        job: &mut Job,
        ctx: &JobContext,
        status: &StatusLine<'_, T>,
    ) -> Result<JobSummary, AbortReason> {
        job.advance(JobState::Downloading);
        self.transport
            .download_to_path(&ctx.archive, &job.archive_path)
            .await
            .map_err(AbortReason::Download)?;
        tracing::info!(path = %job.archive_path.display(), "archive downloaded");
        status.update(messages::DOWNLOADED).await;

        job.advance(JobState::Analyzing);
        let analysis = self.analyze(&job.archive_path).await?;

        job.advance(JobState::Reported);
        let base_name = messages::base_name(&ctx.archive.file_name);
        status
            .update(&messages::analysis_report(base_name, &analysis, &self.config.media_noun))
            .await;

        job.advance(JobState::Extracting);
        self.extract(&job.archive_path, job.workspace.extract_dir())
            .await?;

        job.advance(JobState::Distributing);
        let mut summary = JobSummary {
            job_id: job.id.clone(),
            archive_name: ctx.archive.file_name.clone(),
            total_entries: analysis.total_entries,
            files_sent: 0,
            files_skipped: 0,
            files_failed: 0,
        };
        self.distribute(job.workspace.extract_dir(), ctx.requester.chat, &mut summary)
            .await;

        job.advance(JobState::Summarized);
        status
            .update(&messages::done(base_name, summary.files_sent))
            .await;
        self.send_audit_summary(ctx, &summary).await;

        Ok(summary)
    }

    async fn allocate(&self, job_id: &JobId) -> Result<JobWorkspace, AbortReason> {
        let roots = self.roots.clone();
        let job_id = job_id.clone();
        tokio::task::spawn_blocking(move || roots.allocate(&job_id))
            .await
            .map_err(|e| AbortReason::Worker {
                stage: JobState::Received,
                message: e.to_string(),
            })?
            .map_err(AbortReason::Workspace)
    }

    async fn analyze(&self, archive_path: &Path) -> Result<AnalysisResult, AbortReason> {
        let path = archive_path.to_path_buf();
        let media = self.media.clone();
        tokio::task::spawn_blocking(move || unzipper_archive::analyze(&path, &media))
            .await
            .map_err(|e| AbortReason::Worker {
                stage: JobState::Analyzing,
                message: e.to_string(),
            })?
            .map_err(AbortReason::InvalidArchive)
    }

    async fn extract(&self, archive_path: &Path, destination: &Path) -> Result<(), AbortReason> {
        let path = archive_path.to_path_buf();
        let destination = destination.to_path_buf();
        let report = tokio::task::spawn_blocking(move || unzipper_archive::extract(&path, &destination))
            .await
            .map_err(|e| AbortReason::Worker {
                stage: JobState::Extracting,
                message: e.to_string(),
            })?
            .map_err(AbortReason::Extraction)?;
        tracing::info!(
            entries = report.entries.len(),
            files = report.files().count(),
            bytes = report.total_bytes,
            "archive extracted"
        );
        Ok(())
    }

    async fn distribute(&self, root: &Path, chat: ChatId, summary: &mut JobSummary) {
        let transport = self.transport.as_ref();
        let max_bytes = self.config.max_upload_bytes;
        let outcomes = distribute(transport, chat, root, max_bytes, self.config.pacing());
        futures_util::pin_mut!(outcomes);

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                TransferOutcome::Sent { .. } => summary.files_sent += 1,
                TransferOutcome::Skipped { name, .. } => {
                    summary.files_skipped += 1;
                    self.notify(chat, &messages::too_large(&name, max_bytes)).await;
                }
                TransferOutcome::Failed { name, .. } => {
                    summary.files_failed += 1;
                    self.notify(chat, &messages::send_failed(&name)).await;
                }
            }
        }
    }

    async fn notify(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.transport.send_text(chat, text).await {
            tracing::warn!(chat = %chat, error = %e, "could not send notice");
        }
    }

    async fn forward_to_audit(&self, origin: MessageRef) {
        let Some(audit) = self.config.audit_chat else {
            return;
        };
        if let Err(e) = self.transport.forward(audit, origin).await {
            tracing::error!(audit_chat = %audit, error = %e, "could not forward archive to audit chat");
        }
    }

    async fn send_audit_summary(&self, ctx: &JobContext, summary: &JobSummary) {
        let Some(audit) = self.config.audit_chat else {
            return;
        };
        let text = messages::audit_summary(&ctx.archive.file_name, &ctx.requester, summary);
        if let Err(e) = self.transport.send_text(audit, &text).await {
            tracing::error!(audit_chat = %audit, error = %e, "could not send summary to audit chat");
        }
    }
}

/// Final component of a remote file name, so it cannot leave the job's
/// download directory.
fn local_file_name(remote: &str) -> String {
    remote
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .unwrap_or("archive.zip")
        .to_string()
}
