//! # Processing Records
//!
//! A [`ProcessingRecord`] is the unit written to the document store: one per source
//! file, keyed by its absolute path. [`RecordBuilder`] assembles it from the reader
//! and analyzer outputs and stamps the status and update time.

use crate::analyzer::AnalysisResult;
use crate::reader::{SourceDocument, absolute_path, file_name};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Processing state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Read but not yet analyzed
    Pending,
    /// Summary and keywords were produced and stored
    Completed,
    /// Some stage failed; see the record's error
    Failed,
}

impl ProcessingStatus {
    /// Lower-case name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown processing status: {other}")),
        }
    }
}

/// The record persisted for each processed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRecord {
    /// File name without directories
    pub filename: String,

    /// Absolute path, the storage key
    pub file_path: String,

    /// Size in bytes
    pub file_size: u64,

    /// Number of pages
    pub page_count: u32,

    /// File creation time
    pub creation_date: DateTime<Utc>,

    /// Processing state
    pub processing_status: ProcessingStatus,

    /// Generated summary, absent when processing failed
    pub summary: Option<String>,

    /// Extracted keywords
    pub keywords: Vec<String>,

    /// Named entities
    pub entities: Vec<String>,

    /// Failure description for failed records
    pub error: Option<String>,

    /// Time of the last write
    pub last_updated: DateTime<Utc>,
}

/// Builds [`ProcessingRecord`]s
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ProcessingRecord,
}

impl RecordBuilder {
    /// Start a pending record from a successfully read document
    pub fn from_source(source: &SourceDocument) -> Self {
        Self {
            record: ProcessingRecord {
                filename: source.filename.clone(),
                file_path: source.file_path.clone(),
                file_size: source.file_size,
                page_count: source.page_count,
                creation_date: source.creation_date,
                processing_status: ProcessingStatus::Pending,
                summary: None,
                keywords: Vec::new(),
                entities: Vec::new(),
                error: None,
                last_updated: Utc::now(),
            },
        }
    }

    /// Start a pending record for a file that could not be read.
    ///
    /// Size and dates come from the filesystem when available; the page count is 0.
    pub fn for_path(path: &Path) -> Self {
        let metadata = std::fs::metadata(path).ok();
        let file_size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
        let creation_date = metadata
            .and_then(|m| m.created().or_else(|_| m.modified()).ok())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(Utc::now);

        Self::from_source(&SourceDocument {
            filename: file_name(path),
            file_path: absolute_path(path).to_string_lossy().into_owned(),
            file_size,
            page_count: 0,
            creation_date,
        })
    }

    /// Finish as a completed record carrying the analysis output
    pub fn completed(mut self, analysis: AnalysisResult) -> ProcessingRecord {
        self.record.processing_status = ProcessingStatus::Completed;
        self.record.summary = Some(analysis.summary);
        self.record.keywords = analysis.keywords;
        self.record.entities = analysis.entities;
        self.record.error = None;
        self.record.last_updated = Utc::now();
        self.record
    }

    /// Finish as a failed record; any analysis output is dropped
    pub fn failed(mut self, error: impl Into<String>) -> ProcessingRecord {
        self.record.processing_status = ProcessingStatus::Failed;
        self.record.summary = None;
        self.record.keywords = Vec::new();
        self.record.entities = Vec::new();
        self.record.error = Some(error.into());
        self.record.last_updated = Utc::now();
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn source() -> SourceDocument {
        SourceDocument {
            filename: "report.pdf".to_string(),
            file_path: "/data/report.pdf".to_string(),
            file_size: 2048,
            page_count: 12,
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            ProcessingStatus::Pending,
            ProcessingStatus::Completed,
            ProcessingStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ProcessingStatus>().unwrap(), status);
        }
        assert!("done".parse::<ProcessingStatus>().is_err());
    }

    #[test]
    fn test_completed_record() {
        let record = RecordBuilder::from_source(&source()).completed(AnalysisResult {
            summary: "Short summary.".to_string(),
            keywords: vec!["summary".to_string()],
            entities: vec![],
        });

        assert_eq!(record.processing_status, ProcessingStatus::Completed);
        assert_eq!(record.summary.as_deref(), Some("Short summary."));
        assert_eq!(record.keywords, vec!["summary"]);
        assert_eq!(record.page_count, 12);
        assert!(record.error.is_none());
    }

    #[test]
    fn test_failed_record_has_no_summary() {
        let record = RecordBuilder::from_source(&source()).failed("parser exploded");

        assert_eq!(record.processing_status, ProcessingStatus::Failed);
        assert!(record.summary.is_none());
        assert!(record.keywords.is_empty());
        assert_eq!(record.error.as_deref(), Some("parser exploded"));
    }

    #[test]
    fn test_for_missing_path() {
        let dir = tempdir().unwrap();
        let record = RecordBuilder::for_path(&dir.path().join("gone.pdf")).failed("missing");

        assert_eq!(record.filename, "gone.pdf");
        assert_eq!(record.file_size, 0);
        assert_eq!(record.page_count, 0);
        assert!(Path::new(&record.file_path).is_absolute());
    }

    #[test]
    fn test_record_json_field_names() {
        let record = RecordBuilder::from_source(&source()).failed("boom");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["processing_status"], "failed");
        assert_eq!(json["file_path"], "/data/report.pdf");
        assert!(json["summary"].is_null());
        assert!(json["creation_date"].as_str().unwrap().contains('T'));
    }
}
