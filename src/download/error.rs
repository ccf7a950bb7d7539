//! Error types for the download module

use crate::error::Error as CrateError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for fetching PDFs
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The manifest file could not be read
    #[error("failed to read manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not a JSON object of name to URL
    #[error("invalid manifest: {0}")]
    ManifestFormat(#[from] serde_json::Error),

    /// A manifest name cannot be used as a file name
    #[error("unusable document name `{0}`")]
    InvalidName(String),

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request did not complete
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Writing the downloaded file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DownloadError> for CrateError {
    fn from(err: DownloadError) -> Self {
        CrateError::Download(err.to_string())
    }
}
