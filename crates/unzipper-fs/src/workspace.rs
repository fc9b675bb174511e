use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::job_id::JobId;

/// The two root namespaces that job workspaces are carved out of.
#[derive(Clone, Debug)]
pub struct WorkspaceRoots {
    download_root: PathBuf,
    extract_root: PathBuf,
}

impl WorkspaceRoots {
    pub fn new(download_root: impl Into<PathBuf>, extract_root: impl Into<PathBuf>) -> Self {
        Self {
            download_root: download_root.into(),
            extract_root: extract_root.into(),
        }
    }

    pub fn download_root(&self) -> &Path {
        &self.download_root
    }

    pub fn extract_root(&self) -> &Path {
        &self.extract_root
    }

    /// Create both roots if missing.
    pub fn ensure(&self) -> Result<()> {
        create_dir(&self.download_root)?;
        create_dir(&self.extract_root)
    }

    /// Allocate the directory pair for `job_id`.
    ///
    /// Creation is idempotent. If the second directory cannot be created the
    /// first one is removed again before the error is returned.
    pub fn allocate(&self, job_id: &JobId) -> Result<JobWorkspace> {
        let download_dir = self.download_root.join(job_id);
        let extract_dir = self.extract_root.join(job_id);

        create_dir(&download_dir)?;
        if let Err(e) = create_dir(&extract_dir) {
            release_dir(&download_dir);
            return Err(e);
        }

        tracing::debug!(
            job_id = %job_id,
            download_dir = %download_dir.display(),
            extract_dir = %extract_dir.display(),
            "allocated job workspace"
        );

        Ok(JobWorkspace {
            download_dir,
            extract_dir,
            released: false,
        })
    }
}

/// A job's `(download, extract)` directory pair.
///
/// Released exactly once: either explicitly through [`JobWorkspace::release`]
/// or, if the owner unwinds without calling it, on drop.
#[derive(Debug)]
pub struct JobWorkspace {
    download_dir: PathBuf,
    extract_dir: PathBuf,
    released: bool,
}

impl JobWorkspace {
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn extract_dir(&self) -> &Path {
        &self.extract_dir
    }

    /// Remove both directories and everything below them. Never fails.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        release_dir(&self.download_dir);
        release_dir(&self.extract_dir);
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        self.release_inner();
    }
}

/// Remove `path` (directory tree or single file) if it exists.
///
/// A missing path is skipped silently; a failed removal is logged. Returns
/// whether the path is gone afterwards.
pub fn release_dir(path: &Path) -> bool {
    match remove(path) {
        Ok(true) => {
            tracing::info!(path = %path.display(), "cleaned up");
            true
        }
        Ok(false) => true,
        Err(e) => {
            tracing::warn!(path = %e.path().display(), error = %e, "cleanup failed");
            false
        }
    }
}

fn remove(path: &Path) -> Result<bool> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(Error::Remove {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::Create {
        path: path.to_path_buf(),
        source: e,
    })
}
