use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SavedError {
    #[error("Saved recipes request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Saved recipes service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Saved recipes retrieval timed out after {0:?}")]
    Timeout(Duration),

    #[error("Saved recipes retrieval aborted: {0}")]
    Aborted(String),

    #[error("Invalid saved recipes endpoint: {0}")]
    InvalidUrl(String),
}
