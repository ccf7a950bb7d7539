//! # Database Schema Module
//!
//! One table, `documents`, holds a row per processed file. The absolute file path is
//! the primary key so that reprocessing a file updates its row in place. Keyword and
//! entity lists are stored as JSON arrays; timestamps as RFC 3339 strings.

use crate::store::error::StoreError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            file_path TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            file_size INTEGER NOT NULL,
            page_count INTEGER NOT NULL,
            creation_date TEXT NOT NULL,
            processing_status TEXT NOT NULL,
            summary TEXT,
            keywords TEXT NOT NULL DEFAULT '[]',
            entities TEXT NOT NULL DEFAULT '[]',
            error TEXT,
            last_updated TEXT NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| StoreError::Schema(format!("Failed to create documents table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(processing_status)",
        params![],
    )
    .await
    .map_err(|e| StoreError::Schema(format!("Failed to create index on documents: {}", e)))?;

    Ok(())
}
