//! # pdfdigest - Batch PDF Summarization for Rust
//!
//! This crate reads a folder of PDF files, extracts their text, produces a
//! length-proportional extractive summary with keywords and named entities, and
//! stores one record per file in a libsql database. Files are processed in parallel
//! on a bounded worker pool, and every run can produce a performance report.
//!
//! ## Features
//!
//! - PDF text extraction with `lopdf`
//! - Extractive summaries whose length follows the document's page count
//! - Frequency-based keywords and capitalised-phrase entities
//! - Idempotent storage keyed by absolute file path (local file or remote libsql)
//! - Per-document failure isolation: a bad file is stored as `failed`, never fatal
//! - Timing, memory and content-quality reporting with PNG charts
//! - Fetching a batch of PDFs listed in a JSON manifest
//!
//! ## Example
//!
//! ```rust,no_run
//! use pdfdigest::analyzer::ExtractiveAnalyzer;
//! use pdfdigest::processor::{DocumentProcessor, ProcessingConfig, process_folder};
//! use pdfdigest::reader::LopdfReader;
//! use pdfdigest::store::LibsqlStore;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = LibsqlStore::new_from_path("documents.db").await?;
//!     let config = ProcessingConfig::default();
//!     let analyzer = ExtractiveAnalyzer::new(config.analyzer.clone());
//!     let processor = Arc::new(DocumentProcessor::new(LopdfReader::new(), analyzer, store, config));
//!
//!     let outcomes = process_folder(processor, Path::new("pdfs"), 4, None).await?;
//!     for outcome in outcomes {
//!         println!("{}: {}", outcome.record().filename, outcome.record().processing_status);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod analyzer;
pub mod download;
pub mod processor;
pub mod reader;
pub mod record;
pub mod report;
pub mod settings;
pub mod store;

pub use error::Error;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::analyzer::{ExtractiveAnalyzer, TextAnalyzer};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::processor::{DocumentProcessor, ProcessingConfig, ProcessingOutcome};
    pub use crate::reader::{DocumentReader, LopdfReader};
    pub use crate::record::{ProcessingRecord, ProcessingStatus};
    pub use crate::store::{DocumentStore, LibsqlStore};
}
