//! Error types for the report module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for report generation
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing a report file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the report failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering a chart failed
    #[error("Chart error: {0}")]
    Chart(String),
}

impl From<ReportError> for CrateError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io(e) => CrateError::Io(e),
            ReportError::Json(e) => CrateError::Json(e),
            ReportError::Chart(msg) => CrateError::Report(msg),
        }
    }
}
