//! # In-Memory Document Store
//!
//! A [`DocumentStore`] that keeps records in a map and logs every write. It backs
//! the tests of the processor and batch orchestrator, where it stands in for the
//! database, and can be told to reject writes to exercise storage failures.

use crate::record::{ProcessingRecord, ProcessingStatus};
use crate::store::DocumentStore;
use crate::store::error::StoreError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, ProcessingRecord>,
    writes: Vec<String>,
}

/// Records held in memory, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following upsert fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Total number of upserts attempted
    pub fn upsert_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// Number of upserts attempted for one file path
    pub fn upserts_for(&self, file_path: &str) -> usize {
        self.lock()
            .writes
            .iter()
            .filter(|key| key.as_str() == file_path)
            .count()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a panic while holding the lock leaves the map consistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    async fn upsert(&self, record: &ProcessingRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.writes.push(record.file_path.clone());

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write(format!(
                "write rejected for {}",
                record.file_path
            )));
        }

        inner
            .records
            .insert(record.file_path.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, file_path: &str) -> Result<Option<ProcessingRecord>, StoreError> {
        Ok(self.lock().records.get(file_path).cloned())
    }

    async fn list(
        &self,
        status: Option<ProcessingStatus>,
    ) -> Result<Vec<ProcessingRecord>, StoreError> {
        let mut records: Vec<ProcessingRecord> = self
            .lock()
            .records
            .values()
            .filter(|r| status.is_none_or(|s| r.processing_status == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;
    use std::path::Path;

    fn failed(path: &str) -> ProcessingRecord {
        RecordBuilder::for_path(Path::new(path)).failed("boom")
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_key() {
        let store = MemoryStore::new();
        let record = failed("/tmp/a.pdf");

        store.upsert(&record).await.unwrap();
        store.upsert(&record).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.upsert_count(), 2);
        assert_eq!(store.upserts_for(&record.file_path), 2);
    }

    #[tokio::test]
    async fn test_rejected_writes_are_counted_but_not_stored() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let record = failed("/tmp/b.pdf");
        assert!(store.upsert(&record).await.is_err());
        assert!(store.is_empty());
        assert_eq!(store.upsert_count(), 1);
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let store = MemoryStore::new();
        store.upsert(&failed("/tmp/b.pdf")).await.unwrap();
        store.upsert(&failed("/tmp/a.pdf")).await.unwrap();

        let records = store.list(Some(ProcessingStatus::Failed)).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].file_path < records[1].file_path);
        assert!(
            store
                .list(Some(ProcessingStatus::Completed))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
