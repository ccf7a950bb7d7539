//! # Store Error Types
//!
//! Errors raised by the document store. Connection and write failures are reported
//! as-is; the store never retries.

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQL query error
    #[error("SQL query error: {0}")]
    Query(String),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Data error
    #[error("Data error: {0}")]
    Data(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Write rejected by the store
    #[error("Write error: {0}")]
    Write(String),
}

impl From<StoreError> for CrateError {
    fn from(err: StoreError) -> Self {
        CrateError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_database_error() {
        let err: CrateError = StoreError::Write("disk full".to_string()).into();
        match err {
            CrateError::Database(msg) => assert_eq!(msg, "Write error: disk full"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
