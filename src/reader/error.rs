//! Error types for the reader module

use crate::error::Error as CrateError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for document reading
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file is missing, unreadable, not a regular file, or empty
    #[error("cannot access {}: {reason}", path.display())]
    FileAccess {
        /// Path that was requested
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The parser could not load the document or pull text out of a page
    #[error("cannot extract text from {}: {reason}", path.display())]
    Extraction {
        /// Path that was requested
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

impl ReadError {
    pub(crate) fn file_access(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::FileAccess {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn extraction(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Extraction {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

impl From<ReadError> for CrateError {
    fn from(err: ReadError) -> Self {
        CrateError::Read(err.to_string())
    }
}
