//! Batch orchestration
//!
//! Runs [`DocumentProcessor::process_single_pdf`] over every PDF in a folder, or over
//! every record currently marked failed, with at most `max_workers` documents in
//! flight. Outcomes are returned in completion order.

use super::{BatchError, DocumentProcessor, ProcessingOutcome};
use crate::analyzer::TextAnalyzer;
use crate::reader::DocumentReader;
use crate::record::ProcessingStatus;
use crate::store::DocumentStore;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, instrument};

/// Counts over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Documents with an outcome
    pub total: usize,
    /// Documents stored as completed
    pub completed: usize,
    /// Documents stored as failed
    pub failed: usize,
}

impl BatchSummary {
    /// Tally a list of outcomes
    pub fn from_outcomes(outcomes: &[ProcessingOutcome]) -> Self {
        let completed = outcomes.iter().filter(|o| o.is_completed()).count();
        Self {
            total: outcomes.len(),
            completed,
            failed: outcomes.len() - completed,
        }
    }
}

/// List the PDF files directly inside `folder`, sorted by path.
///
/// The extension match ignores case. Subdirectories are not searched.
pub fn list_pdfs(folder: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let to_error = |source| BatchError::Folder {
        path: folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(to_error)? {
        let path = entry.map_err(to_error)?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Process every PDF in `folder` with at most `max_workers` running at once.
///
/// Each finished document sends its file name on `progress`, when given. A worker
/// that panics is logged and left out of the result.
#[instrument(skip(processor, progress), fields(folder = %folder.display()))]
pub async fn process_folder<R, A, S>(
    processor: Arc<DocumentProcessor<R, A, S>>,
    folder: &Path,
    max_workers: usize,
    progress: Option<mpsc::Sender<String>>,
) -> Result<Vec<ProcessingOutcome>, BatchError>
where
    R: DocumentReader + 'static,
    A: TextAnalyzer + 'static,
    S: DocumentStore,
{
    if max_workers == 0 {
        return Err(BatchError::NoWorkers);
    }

    let files = list_pdfs(folder)?;
    info!(
        "Found {} PDF files in {}",
        files.len(),
        folder.display()
    );

    run_batch(processor, files, max_workers, progress).await
}

/// Reprocess every record whose status is `failed`
#[instrument(skip(processor, progress))]
pub async fn retry_failed<R, A, S>(
    processor: Arc<DocumentProcessor<R, A, S>>,
    max_workers: usize,
    progress: Option<mpsc::Sender<String>>,
) -> Result<Vec<ProcessingOutcome>, BatchError>
where
    R: DocumentReader + 'static,
    A: TextAnalyzer + 'static,
    S: DocumentStore,
{
    if max_workers == 0 {
        return Err(BatchError::NoWorkers);
    }

    let files: Vec<PathBuf> = processor
        .store()
        .list(Some(ProcessingStatus::Failed))
        .await?
        .into_iter()
        .map(|record| PathBuf::from(record.file_path))
        .collect();
    info!("Retrying {} failed documents", files.len());

    run_batch(processor, files, max_workers, progress).await
}

async fn run_batch<R, A, S>(
    processor: Arc<DocumentProcessor<R, A, S>>,
    files: Vec<PathBuf>,
    max_workers: usize,
    progress: Option<mpsc::Sender<String>>,
) -> Result<Vec<ProcessingOutcome>, BatchError>
where
    R: DocumentReader + 'static,
    A: TextAnalyzer + 'static,
    S: DocumentStore,
{
    let semaphore = Arc::new(Semaphore::new(max_workers));
    let mut tasks = FuturesUnordered::new();

    for path in files {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| BatchError::Pool(e.to_string()))?;
        let processor = Arc::clone(&processor);
        let progress = progress.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            debug!("Worker picked up {}", path.display());

            let outcome = processor.process_single_pdf(&path).await;

            if let Some(sender) = progress {
                // the receiver may already be gone
                let _ = sender.send(outcome.record().filename.clone()).await;
            }
            outcome
        }));
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => error!("Worker task failed: {}", e),
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        "Batch finished: {}/{} completed, {} failed",
        summary.completed, summary.total, summary.failed
    );

    Ok(outcomes)
}
