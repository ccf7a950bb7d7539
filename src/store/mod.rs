//! Document store module
//!
//! This module persists [`ProcessingRecord`]s. Writes are upserts keyed by the
//! record's absolute file path, so reprocessing a file replaces its record instead of
//! adding a second one.

mod database;
pub mod error;
mod memory;
mod schema;

pub use database::LibsqlStore;
pub use error::StoreError;
pub use memory::MemoryStore;

use crate::record::{ProcessingRecord, ProcessingStatus};
use std::future::Future;

/// Storage for processing records
///
/// Handles are cloned into every worker task; implementations share their
/// underlying connection between clones.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Insert the record, or replace the one stored under the same file path
    fn upsert(
        &self,
        record: &ProcessingRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetch the record stored under `file_path`
    fn get(
        &self,
        file_path: &str,
    ) -> impl Future<Output = Result<Option<ProcessingRecord>, StoreError>> + Send;

    /// List records, optionally only those with the given status
    fn list(
        &self,
        status: Option<ProcessingStatus>,
    ) -> impl Future<Output = Result<Vec<ProcessingRecord>, StoreError>> + Send;
}
