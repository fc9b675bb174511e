use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a valid zip archive: {0}")]
    InvalidArchive(#[source] zip::result::ZipError),

    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry '{entry}' has an unsafe path")]
    InvalidPath { entry: String },

    #[error("entry #{index} is corrupted: {source}")]
    Corrupted {
        index: usize,
        source: zip::result::ZipError,
    },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
}

impl Error {
    /// Whether this error means the container itself is unreadable, as
    /// opposed to a failure while writing one of its entries.
    pub fn is_invalid_archive(&self) -> bool {
        matches!(self, Self::InvalidArchive(_) | Self::Open { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
