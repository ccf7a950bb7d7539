//! Error types for the processor module

use crate::analyzer::AnalysisError;
use crate::error::Error as CrateError;
use crate::reader::ReadError;
use crate::store::StoreError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage in which a document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Opening and parsing the file
    Extraction,
    /// Summary and keyword generation
    Analysis,
    /// Writing the record
    Storage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extraction => "extraction",
            Self::Analysis => "analysis",
            Self::Storage => "storage",
        };
        f.write_str(name)
    }
}

/// Kind of per-document failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Missing, unreadable or empty file
    FileAccess,
    /// Parser failure on a malformed document
    Extraction,
    /// Analysis failure
    Analysis,
    /// Store connection or write failure
    Storage,
}

/// A failure while processing a single document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading or parsing failed
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Analysis failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Persisting the record failed
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// A blocking worker panicked or was cancelled
    #[error("worker task failed during {stage}: {message}")]
    Task {
        /// Stage that was running
        stage: Stage,
        /// Join error description
        message: String,
    },
}

impl DocumentError {
    /// The failure category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read(ReadError::FileAccess { .. }) => ErrorKind::FileAccess,
            Self::Read(ReadError::Extraction { .. }) => ErrorKind::Extraction,
            Self::Analysis(_) => ErrorKind::Analysis,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Task { stage, .. } => match stage {
                Stage::Extraction => ErrorKind::Extraction,
                Stage::Analysis => ErrorKind::Analysis,
                Stage::Storage => ErrorKind::Storage,
            },
        }
    }

    /// The stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            Self::Read(_) => Stage::Extraction,
            Self::Analysis(_) => Stage::Analysis,
            Self::Storage(_) => Stage::Storage,
            Self::Task { stage, .. } => *stage,
        }
    }
}

impl From<DocumentError> for CrateError {
    fn from(err: DocumentError) -> Self {
        CrateError::Process(err.to_string())
    }
}

/// Errors that stop a whole batch before any document is processed
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input folder could not be listed
    #[error("cannot read folder {}: {source}", path.display())]
    Folder {
        /// Folder that was requested
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Worker count of zero
    #[error("max_workers must be at least 1")]
    NoWorkers,

    /// The worker pool was closed while documents were queued
    #[error("worker pool closed: {0}")]
    Pool(String),

    /// Listing failed records failed
    #[error("cannot list failed records: {0}")]
    Store(#[from] StoreError),
}

impl From<BatchError> for CrateError {
    fn from(err: BatchError) -> Self {
        CrateError::Process(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_kind_and_stage() {
        let err = DocumentError::from(ReadError::file_access(Path::new("a.pdf"), "missing"));
        assert_eq!(err.kind(), ErrorKind::FileAccess);
        assert_eq!(err.stage(), Stage::Extraction);

        let err = DocumentError::from(ReadError::extraction(Path::new("a.pdf"), "bad xref"));
        assert_eq!(err.kind(), ErrorKind::Extraction);

        let err = DocumentError::from(AnalysisError::InvalidRatio(2.0));
        assert_eq!(err.kind(), ErrorKind::Analysis);
        assert_eq!(err.stage(), Stage::Analysis);

        let err = DocumentError::from(StoreError::Write("closed".to_string()));
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.stage(), Stage::Storage);
    }

    #[test]
    fn test_messages_keep_context() {
        let err = DocumentError::from(ReadError::file_access(Path::new("x.pdf"), "file is empty"));
        assert_eq!(err.to_string(), "cannot access x.pdf: file is empty");
    }
}
