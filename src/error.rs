//! Error types for the pdfdigest crate

use thiserror::Error;

/// Result type for pdfdigest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pdfdigest operations
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF reading error
    #[error("Read error: {0}")]
    Read(String),

    /// Text analysis error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Document processing error
    #[error("Process error: {0}")]
    Process(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// PDF download error
    #[error("Download error: {0}")]
    Download(String),

    /// Report generation error
    #[error("Report error: {0}")]
    Report(String),
}
