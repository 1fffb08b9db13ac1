use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to load config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("At least {need} control point pairs required (have {have})")]
    InsufficientPairs { have: usize, need: usize },

    /// The remote service refused the request; `detail` is the server text as-is.
    #[error("Service rejected request ({status}): {detail}")]
    Service { status: u16, detail: String },

    #[error("No session loaded; upload a RAW dataset first")]
    MissingSession,

    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// True for errors the operator can fix by adjusting the pair list and retrying.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPairs { .. } | Self::Service { .. } | Self::Http(_)
        )
    }
}
