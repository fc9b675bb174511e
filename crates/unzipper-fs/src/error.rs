use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Create { path, .. } | Self::Remove { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
