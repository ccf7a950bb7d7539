//! Document processor module
//!
//! This module runs one file through the pipeline: read, pick a summary ratio from
//! the page count, analyze, build the record and store it. Failures at any stage
//! are logged and stored as a failed record instead of being returned as errors,
//! so one bad file never stops a batch.

mod batch;
mod config;
mod error;

pub use batch::{BatchSummary, list_pdfs, process_folder, retry_failed};
pub use config::{DocumentTier, KeywordLimits, ProcessingConfig, ProcessingConfigBuilder};
pub use error::{BatchError, DocumentError, ErrorKind, Stage};

use crate::analyzer::{AnalysisResult, TextAnalyzer};
use crate::reader::{DocumentReader, ExtractedDocument};
use crate::record::{ProcessingRecord, RecordBuilder};
use crate::report::PerformanceMonitor;
use crate::store::DocumentStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Result of processing one document
#[derive(Debug)]
pub enum ProcessingOutcome {
    /// The record was analyzed and stored with status `completed`
    Completed(ProcessingRecord),

    /// Some stage failed; `record` has status `failed`
    Failed {
        /// The failure record (stored when the store accepted it)
        record: ProcessingRecord,
        /// What went wrong
        error: DocumentError,
    },
}

impl ProcessingOutcome {
    /// The record, whichever way processing went
    pub fn record(&self) -> &ProcessingRecord {
        match self {
            Self::Completed(record) | Self::Failed { record, .. } => record,
        }
    }

    /// Consume the outcome, keeping the record
    pub fn into_record(self) -> ProcessingRecord {
        match self {
            Self::Completed(record) | Self::Failed { record, .. } => record,
        }
    }

    /// Whether the document completed
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&DocumentError> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Runs documents through reader, analyzer and store
pub struct DocumentProcessor<R, A, S> {
    reader: Arc<R>,
    analyzer: Arc<A>,
    store: S,
    config: ProcessingConfig,
    monitor: Option<Arc<PerformanceMonitor>>,
}

impl<R, A, S> DocumentProcessor<R, A, S>
where
    R: DocumentReader + 'static,
    A: TextAnalyzer + 'static,
    S: DocumentStore,
{
    /// Create a processor from its collaborators
    pub fn new(reader: R, analyzer: A, store: S, config: ProcessingConfig) -> Self {
        Self {
            reader: Arc::new(reader),
            analyzer: Arc::new(analyzer),
            store,
            config,
            monitor: None,
        }
    }

    /// Record a performance sample for every processed document
    pub fn with_monitor(mut self, monitor: Arc<PerformanceMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// The document store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The processing configuration
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// The performance monitor, if one is attached
    pub fn monitor(&self) -> Option<&Arc<PerformanceMonitor>> {
        self.monitor.as_ref()
    }

    /// Process one file and store its record.
    ///
    /// Never fails: errors are logged and returned as [`ProcessingOutcome::Failed`]
    /// after a failed record has been written.
    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn process_single_pdf(&self, path: &Path) -> ProcessingOutcome {
        match &self.monitor {
            Some(monitor) => monitor.track(self.run(path)).await,
            None => self.run(path).await,
        }
    }

    async fn run(&self, path: &Path) -> ProcessingOutcome {
        let ExtractedDocument { source, text } = match self.extract(path).await {
            Ok(doc) => doc,
            Err(e) => return self.fail(RecordBuilder::for_path(path), e).await,
        };

        let tier = self.config.tier(source.page_count);
        let ratio = self.config.summary_ratio(tier);
        debug!(
            "{} has {} pages: {} document, summary ratio {}",
            source.filename, source.page_count, tier, ratio
        );

        let mut analysis = match self.analyze(text, ratio).await {
            Ok(analysis) => analysis,
            Err(e) => return self.fail(RecordBuilder::from_source(&source), e).await,
        };
        analysis.keywords.truncate(self.config.keyword_limit(source.page_count));

        let record = RecordBuilder::from_source(&source).completed(analysis);
        if let Err(e) = self.store.upsert(&record).await {
            return self
                .fail(RecordBuilder::from_source(&source), DocumentError::from(e))
                .await;
        }

        info!(
            "Processed {}: {} summary chars, {} keywords",
            record.filename,
            record.summary.as_deref().map_or(0, str::len),
            record.keywords.len()
        );
        ProcessingOutcome::Completed(record)
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedDocument, DocumentError> {
        let reader = Arc::clone(&self.reader);
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || reader.read(&path))
            .await
            .map_err(|e| DocumentError::Task {
                stage: Stage::Extraction,
                message: e.to_string(),
            })?
            .map_err(DocumentError::from)
    }

    async fn analyze(&self, text: String, ratio: f64) -> Result<AnalysisResult, DocumentError> {
        let analyzer = Arc::clone(&self.analyzer);

        tokio::task::spawn_blocking(move || analyzer.analyze(&text, ratio))
            .await
            .map_err(|e| DocumentError::Task {
                stage: Stage::Analysis,
                message: e.to_string(),
            })?
            .map_err(DocumentError::from)
    }

    async fn fail(&self, builder: RecordBuilder, error: DocumentError) -> ProcessingOutcome {
        let record = builder.failed(error.to_string());
        error!(
            file = %record.filename,
            stage = %error.stage(),
            "Processing failed: {}",
            error
        );

        if let Err(e) = self.store.upsert(&record).await {
            error!(file = %record.filename, "Failed to store failure record: {}", e);
        }

        ProcessingOutcome::Failed { record, error }
    }
}
