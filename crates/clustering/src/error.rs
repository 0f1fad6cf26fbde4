use std::path::PathBuf;

use thiserror::Error;

pub type ClusteringResult<T> = Result<T, ClusteringError>;

#[derive(Error, Debug)]
pub enum ClusteringError {
    /// Model or catalog missing, inconsistent or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    #[error("Failed to access model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
