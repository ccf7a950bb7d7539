//! Document reader module
//!
//! This module turns a file on disk into a [`SourceDocument`] (file facts and page
//! count) plus the raw extracted text. PDF parsing is delegated to `lopdf`.

pub mod error;
mod pdf;
mod text;

pub use error::ReadError;
pub use pdf::LopdfReader;
pub use text::PlainTextReader;

#[cfg(test)]
pub(crate) use pdf::write_sample_pdf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Facts about a source file, fixed once the file has been read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// File name without directories
    pub filename: String,

    /// Absolute path, used as the storage key
    pub file_path: String,

    /// Size in bytes
    pub file_size: u64,

    /// Number of pages
    pub page_count: u32,

    /// File creation time (modification time when the platform has none)
    pub creation_date: DateTime<Utc>,
}

/// A source document together with its extracted text
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// File facts
    pub source: SourceDocument,

    /// Text of all pages, one page per line group
    pub text: String,
}

/// Reads a document from disk
///
/// Implementations are called from blocking worker threads and must be shareable
/// between them.
pub trait DocumentReader: Send + Sync {
    /// Read the file at `path`, returning its facts and text
    fn read(&self, path: &Path) -> Result<ExtractedDocument, ReadError>;
}

/// Storage key for `path`: its canonical form when the file exists, so that every
/// way of naming a file maps to one key, otherwise the lexically absolute path
pub fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// File name component of `path` as a string
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Check that `path` is a readable, non-empty regular file and load its bytes.
///
/// Returns the [`SourceDocument`] with a zero page count; the caller fills it in
/// after parsing.
pub(crate) fn read_source(path: &Path) -> Result<(SourceDocument, Vec<u8>), ReadError> {
    let metadata = std::fs::metadata(path).map_err(|e| ReadError::file_access(path, e))?;
    if !metadata.is_file() {
        return Err(ReadError::file_access(path, "not a regular file"));
    }
    if metadata.len() == 0 {
        return Err(ReadError::file_access(path, "file is empty"));
    }

    let bytes = std::fs::read(path).map_err(|e| ReadError::file_access(path, e))?;

    let creation_date = metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let source = SourceDocument {
        filename: file_name(path),
        file_path: absolute_path(path).to_string_lossy().into_owned(),
        file_size: metadata.len(),
        page_count: 0,
        creation_date,
    };

    Ok((source, bytes))
}
