//! Distribution engine: walk the extract directory and upload every file
//! that fits the size limit, pausing between uploads.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::Stream;
use unzipper_transport::{ChatId, Transport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    TooLarge,
}

/// What happened to one file under the distribution root.
#[derive(Debug)]
pub enum TransferOutcome {
    Sent {
        name: String,
        size: u64,
    },
    Skipped {
        name: String,
        size: u64,
        reason: SkipReason,
    },
    Failed {
        name: String,
        error: unzipper_transport::Error,
    },
}

impl TransferOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Sent { name, .. } | Self::Skipped { name, .. } | Self::Failed { name, .. } => name,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// One file on disk considered for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferUnit {
    pub path: PathBuf,
    pub size: u64,
    pub eligible: bool,
}

impl TransferUnit {
    async fn inspect(path: PathBuf, max_bytes: u64) -> std::io::Result<Self> {
        let size = tokio::fs::metadata(&path).await?.len();
        Ok(Self {
            path,
            size,
            eligible: size <= max_bytes,
        })
    }

    fn name(&self) -> String {
        file_name(&self.path)
    }
}

struct Walk<'a, T> {
    transport: &'a T,
    chat: ChatId,
    root: PathBuf,
    max_bytes: u64,
    pacing: Duration,
    queue: Option<VecDeque<PathBuf>>,
    pace_before_next: bool,
}

/// Upload every regular file below `root` to `chat`.
///
/// Yields exactly one [`TransferOutcome`] per regular file, in a
/// deterministic depth-first, name-sorted order. Files larger than
/// `max_bytes` are skipped without contacting the transport. A failed upload
/// is reported and the walk continues. After every attempted upload the
/// stream waits `pacing` before touching the next file.
///
/// The stream is single-pass: polling it performs the uploads.
pub fn distribute<'a, T: Transport>(
    transport: &'a T,
    chat: ChatId,
    root: &Path,
    max_bytes: u64,
    pacing: Duration,
) -> impl Stream<Item = TransferOutcome> + Send + 'a {
    let walk = Walk {
        transport,
        chat,
        root: root.to_path_buf(),
        max_bytes,
        pacing,
        queue: None,
        pace_before_next: false,
    };

    futures_util::stream::unfold(walk, |mut walk| async move {
        if walk.queue.is_none() {
            walk.queue = Some(list_files(walk.root.clone()).await);
        }
        let path = walk.queue.as_mut()?.pop_front()?;

        if walk.pace_before_next {
            tokio::time::sleep(walk.pacing).await;
            walk.pace_before_next = false;
        }

        let outcome = walk.transfer(path).await;
        Some((outcome, walk))
    })
}

impl<T: Transport> Walk<'_, T> {
    async fn transfer(&mut self, path: PathBuf) -> TransferOutcome {
        let unit = match TransferUnit::inspect(path.clone(), self.max_bytes).await {
            Ok(unit) => unit,
            Err(e) => {
                return TransferOutcome::Failed {
                    name: file_name(&path),
                    error: unzipper_transport::Error::io(path, e),
                };
            }
        };
        let name = unit.name();

        if !unit.eligible {
            tracing::info!(file = %name, size = unit.size, limit = self.max_bytes, "skipping oversized file");
            return TransferOutcome::Skipped {
                name,
                size: unit.size,
                reason: SkipReason::TooLarge,
            };
        }

        self.pace_before_next = true;
        match self.transport.upload_file(self.chat, &unit.path).await {
            Ok(()) => {
                tracing::debug!(file = %name, size = unit.size, "sent file");
                TransferOutcome::Sent { name, size: unit.size }
            }
            Err(error) => {
                tracing::error!(file = %name, error = %error, "failed to send file");
                TransferOutcome::Failed { name, error }
            }
        }
    }
}

async fn list_files(root: PathBuf) -> VecDeque<PathBuf> {
    match tokio::task::spawn_blocking(move || walk_sorted(&root)).await {
        Ok(files) => files,
        Err(e) => {
            tracing::error!(error = %e, "directory walk task failed");
            VecDeque::new()
        }
    }
}

/// Depth-first listing of regular files, entries sorted by name at every
/// level. Unreadable directories are logged and skipped; symlinks are not
/// followed.
fn walk_sorted(root: &Path) -> VecDeque<PathBuf> {
    let mut files = VecDeque::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut entries: Vec<_> = match std::fs::read_dir(&dir) {
            Ok(read_dir) => read_dir.filter_map(|e| e.ok()).collect(),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory");
                continue;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        // Children are pushed in reverse so the smallest name is visited first.
        let mut subdirs = Vec::new();
        let mut level_files = Vec::new();
        for entry in entries {
            match entry.file_type() {
                Ok(ty) if ty.is_dir() => subdirs.push(entry.path()),
                Ok(ty) if ty.is_file() => level_files.push(entry.path()),
                _ => {}
            }
        }
        files.extend(level_files);
        stack.extend(subdirs.into_iter().rev());
    }

    files
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
