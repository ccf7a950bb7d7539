//! Error types for the analyzer module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for text analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Summary ratio outside (0, 1]
    #[error("summary ratio must be in (0, 1], got {0}")]
    InvalidRatio(f64),

    /// The analysis pipeline failed
    #[error("analysis failed: {0}")]
    Failed(String),
}

impl From<AnalysisError> for CrateError {
    fn from(err: AnalysisError) -> Self {
        CrateError::Analysis(err.to_string())
    }
}
