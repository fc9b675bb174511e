use crate::state::JobState;

/// Why a job stopped before distributing anything.
///
/// Each variant carries one fixed message for the requester; the source
/// error only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum AbortReason {
    #[error("workspace allocation failed: {0}")]
    Workspace(#[source] unzipper_fs::Error),

    #[error("download failed: {0}")]
    Download(#[source] unzipper_transport::Error),

    #[error("invalid archive: {0}")]
    InvalidArchive(#[source] unzipper_archive::Error),

    #[error("extraction failed: {0}")]
    Extraction(#[source] unzipper_archive::Error),

    #[error("{stage} worker failed: {message}")]
    Worker { stage: JobState, message: String },
}

impl AbortReason {
    /// The state the job was in when it failed.
    pub fn stage(&self) -> JobState {
        match self {
            Self::Workspace(_) => JobState::Received,
            Self::Download(_) => JobState::Downloading,
            Self::InvalidArchive(_) => JobState::Analyzing,
            Self::Extraction(_) => JobState::Extracting,
            Self::Worker { stage, .. } => *stage,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Workspace(_) => "❌ Could not prepare a workspace for this archive.",
            Self::Download(_) => "❌ An error occurred during download.",
            Self::InvalidArchive(_) => {
                "❌ Error: The file is not a valid ZIP archive or it is corrupted."
            }
            Self::Extraction(_) => "❌ An error occurred during unzipping.",
            Self::Worker { stage: JobState::Extracting, .. } => {
                "❌ An error occurred during unzipping."
            }
            Self::Worker { .. } => "❌ An error occurred while processing the archive.",
        }
    }
}
