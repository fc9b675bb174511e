use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use unzipper_archive::MediaExtensions;
use unzipper_fs::WorkspaceRoots;
use unzipper_transport::ChatId;

/// Immutable settings shared by every job.
///
/// Built once at startup and handed to the runner; every field has a
/// default so a config file only needs to name what it changes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub download_root: PathBuf,
    pub extract_root: PathBuf,
    /// Files above this size are skipped instead of uploaded.
    pub max_upload_bytes: u64,
    /// Pause after every attempted upload.
    pub pacing_ms: u64,
    pub media_extensions: Vec<String>,
    /// Word used in the analysis report when media entries were found.
    pub media_noun: String,
    /// Chat that receives a copy of every archive and job summary.
    pub audit_chat: Option<ChatId>,
    pub max_concurrent_jobs: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from("downloads"),
            extract_root: PathBuf::from("extracted"),
            max_upload_bytes: 50 * 1024 * 1024,
            pacing_ms: 1000,
            media_extensions: MediaExtensions::default().iter().map(str::to_string).collect(),
            media_noun: "videos".to_string(),
            audit_chat: None,
            max_concurrent_jobs: 4,
        }
    }
}

impl JobConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn roots(&self) -> WorkspaceRoots {
        WorkspaceRoots::new(&self.download_root, &self.extract_root)
    }

    pub fn media(&self) -> MediaExtensions {
        MediaExtensions::new(&self.media_extensions)
    }
}
