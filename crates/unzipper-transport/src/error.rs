use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(feature = "telegram")]
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("{method} failed: {description}")]
    Api {
        method: &'static str,
        description: String,
    },

    #[error("{method} response is missing `{field}`")]
    MissingField {
        method: &'static str,
        field: &'static str,
    },

    #[error("file I/O error at '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Bot API URLs embed the token, so it is stripped before the error can be
/// displayed or logged.
#[cfg(feature = "telegram")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
