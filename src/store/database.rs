//! LibSQL-backed document store

use crate::record::{ProcessingRecord, ProcessingStatus};
use crate::store::error::StoreError;
use crate::store::{DocumentStore, schema};
use chrono::{DateTime, Utc};
use libsql::{Connection, Row, params};
use tracing::{debug, instrument};

const SELECT_COLUMNS: &str = "SELECT file_path, filename, file_size, page_count, creation_date, \
     processing_status, summary, keywords, entities, error, last_updated FROM documents";

/// Document store on a local or remote libsql database
#[derive(Clone)]
pub struct LibsqlStore {
    conn: Connection,
}

impl LibsqlStore {
    /// Create a store over an existing connection
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, StoreError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Open a local database file
    pub async fn new_from_path(path: &str) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Open a database from a connection string.
    ///
    /// `libsql://`, `http://` and `https://` URIs connect to a remote server with the
    /// given auth token; anything else is treated as a local file path.
    pub async fn open(uri: &str, auth_token: Option<String>) -> Result<Self, StoreError> {
        let is_remote = ["libsql://", "http://", "https://"]
            .iter()
            .any(|scheme| uri.starts_with(scheme));
        if !is_remote {
            return Self::new_from_path(uri).await;
        }

        let db = libsql::Builder::new_remote(uri.to_string(), auth_token.unwrap_or_default())
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<usize, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM documents", params![])
            .await
            .map_err(|e| StoreError::Query(format!("Failed to count documents: {}", e)))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(0),
            Err(e) => return Err(StoreError::Data(format!("Failed to get count: {}", e))),
        };

        let count: i64 = row
            .get(0)
            .map_err(|e| StoreError::Data(format!("Failed to get count: {}", e)))?;
        Ok(count as usize)
    }

    /// Convert a database row to a ProcessingRecord
    fn row_to_record(&self, row: &Row) -> Result<ProcessingRecord, StoreError> {
        let text = |idx: i32, name: &str| -> Result<String, StoreError> {
            row.get::<String>(idx)
                .map_err(|e| StoreError::Data(format!("Failed to get {}: {}", name, e)))
        };
        let optional = |idx: i32, name: &str| -> Result<Option<String>, StoreError> {
            row.get::<Option<String>>(idx)
                .map_err(|e| StoreError::Data(format!("Failed to get {}: {}", name, e)))
        };
        let integer = |idx: i32, name: &str| -> Result<i64, StoreError> {
            row.get::<i64>(idx)
                .map_err(|e| StoreError::Data(format!("Failed to get {}: {}", name, e)))
        };

        Ok(ProcessingRecord {
            file_path: text(0, "file_path")?,
            filename: text(1, "filename")?,
            file_size: integer(2, "file_size")? as u64,
            page_count: integer(3, "page_count")? as u32,
            creation_date: parse_timestamp(&text(4, "creation_date")?)?,
            processing_status: text(5, "processing_status")?
                .parse::<ProcessingStatus>()
                .map_err(StoreError::Data)?,
            summary: optional(6, "summary")?,
            keywords: parse_list(&text(7, "keywords")?)?,
            entities: parse_list(&text(8, "entities")?)?,
            error: optional(9, "error")?,
            last_updated: parse_timestamp(&text(10, "last_updated")?)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Data(format!("Invalid timestamp {:?}: {}", value, e)))
}

fn parse_list(value: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(value)
        .map_err(|e| StoreError::Data(format!("Invalid JSON list {:?}: {}", value, e)))
}

fn to_json_list(values: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(values)
        .map_err(|e| StoreError::Data(format!("Failed to encode list: {}", e)))
}

impl DocumentStore for LibsqlStore {
    #[instrument(skip(self, record), fields(file = %record.filename, status = %record.processing_status))]
    async fn upsert(&self, record: &ProcessingRecord) -> Result<(), StoreError> {
        let keywords = to_json_list(&record.keywords)?;
        let entities = to_json_list(&record.entities)?;

        self.conn
            .execute(
                "INSERT INTO documents (file_path, filename, file_size, page_count, creation_date,
                    processing_status, summary, keywords, entities, error, last_updated)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(file_path) DO UPDATE SET
                    filename = excluded.filename,
                    file_size = excluded.file_size,
                    page_count = excluded.page_count,
                    creation_date = excluded.creation_date,
                    processing_status = excluded.processing_status,
                    summary = excluded.summary,
                    keywords = excluded.keywords,
                    entities = excluded.entities,
                    error = excluded.error,
                    last_updated = excluded.last_updated",
                params![
                    record.file_path.clone(),
                    record.filename.clone(),
                    record.file_size as i64,
                    record.page_count as i64,
                    record.creation_date.to_rfc3339(),
                    record.processing_status.as_str(),
                    record.summary.clone(),
                    keywords,
                    entities,
                    record.error.clone(),
                    record.last_updated.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| StoreError::Write(format!("Failed to upsert {}: {}", record.file_path, e)))?;

        debug!("Stored record for {}", record.file_path);
        Ok(())
    }

    async fn get(&self, file_path: &str) -> Result<Option<ProcessingRecord>, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE file_path = ?"),
                params![file_path.to_string()],
            )
            .await
            .map_err(|e| StoreError::Query(format!("Failed to get document: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(self.row_to_record(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Data(format!("Failed to get document: {}", e))),
        }
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        status: Option<ProcessingStatus>,
    ) -> Result<Vec<ProcessingRecord>, StoreError> {
        let mut rows = match status {
            Some(status) => {
                self.conn
                    .query(
                        &format!(
                            "{SELECT_COLUMNS} WHERE processing_status = ? ORDER BY file_path"
                        ),
                        params![status.as_str()],
                    )
                    .await
            }
            None => {
                self.conn
                    .query(&format!("{SELECT_COLUMNS} ORDER BY file_path"), params![])
                    .await
            }
        }
        .map_err(|e| StoreError::Query(format!("Failed to list documents: {}", e)))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Data(format!("Failed to read row: {}", e)))?
        {
            records.push(self.row_to_record(&row)?);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisResult;
    use crate::reader::SourceDocument;
    use crate::record::RecordBuilder;
    use tempfile::tempdir;

    async fn setup_test_db() -> Result<(LibsqlStore, tempfile::TempDir), StoreError> {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();

        let store = LibsqlStore::new_from_path(&db_path).await?;

        Ok((store, temp_dir))
    }

    fn source(name: &str) -> SourceDocument {
        SourceDocument {
            filename: name.to_string(),
            file_path: format!("/pdfs/{name}"),
            file_size: 4096,
            page_count: 7,
            creation_date: Utc::now(),
        }
    }

    fn completed(name: &str, summary: &str) -> ProcessingRecord {
        RecordBuilder::from_source(&source(name)).completed(AnalysisResult {
            summary: summary.to_string(),
            keywords: vec!["alpha".to_string(), "beta gamma".to_string()],
            entities: vec!["Acme Corp".to_string()],
        })
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        let mut result = store
            .conn
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name = 'documents'",
                params![],
            )
            .await
            .unwrap();

        let row = result.next().await.unwrap().unwrap();
        let table: String = row.get(0).unwrap();
        assert_eq!(table, "documents");
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();
        let record = completed("a.pdf", "First summary.");

        store.upsert(&record).await.unwrap();
        let stored = store.get("/pdfs/a.pdf").await.unwrap().unwrap();

        assert_eq!(stored.filename, "a.pdf");
        assert_eq!(stored.file_size, 4096);
        assert_eq!(stored.page_count, 7);
        assert_eq!(stored.processing_status, ProcessingStatus::Completed);
        assert_eq!(stored.summary.as_deref(), Some("First summary."));
        assert_eq!(stored.keywords, vec!["alpha", "beta gamma"]);
        assert_eq!(stored.entities, vec!["Acme Corp"]);
        assert_eq!(
            stored.creation_date.timestamp(),
            record.creation_date.timestamp()
        );
    }

    #[tokio::test]
    async fn test_upsert_same_key_updates_in_place() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        store.upsert(&completed("a.pdf", "Old summary.")).await.unwrap();
        store.upsert(&completed("a.pdf", "New summary.")).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("/pdfs/a.pdf").await.unwrap().unwrap();
        assert_eq!(stored.summary.as_deref(), Some("New summary."));
    }

    #[tokio::test]
    async fn test_failed_record_overwrites_completed() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        store.upsert(&completed("a.pdf", "Summary.")).await.unwrap();
        let failed = RecordBuilder::from_source(&source("a.pdf")).failed("broken xref");
        store.upsert(&failed).await.unwrap();

        let stored = store.get("/pdfs/a.pdf").await.unwrap().unwrap();
        assert_eq!(stored.processing_status, ProcessingStatus::Failed);
        assert!(stored.summary.is_none());
        assert!(stored.keywords.is_empty());
        assert_eq!(stored.error.as_deref(), Some("broken xref"));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        store.upsert(&completed("a.pdf", "A.")).await.unwrap();
        store.upsert(&completed("b.pdf", "B.")).await.unwrap();
        store
            .upsert(&RecordBuilder::from_source(&source("c.pdf")).failed("bad"))
            .await
            .unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].filename, "a.pdf");

        let failed = store.list(Some(ProcessingStatus::Failed)).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].filename, "c.pdf");
    }

    #[tokio::test]
    async fn test_get_missing_record() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();
        assert!(store.get("/pdfs/none.pdf").await.unwrap().is_none());
    }
}
