//! # pdfdigest CLI Application
//!
//! This module implements the command-line interface for the pdfdigest pipeline,
//! providing access to its processing and reporting capabilities through a set of
//! subcommands.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `run`: Process every PDF in a folder
//!   - `process`: Process a single file and print its record
//!   - `retry`: Reprocess every record marked failed
//!   - `list`: Inspect stored records
//!   - `bench`: Sequential and concurrent runs with a performance report
//!   - `download`: Fetch the PDFs listed in a JSON manifest
//!
//! Every command except `download` needs the database named by the `uri`
//! environment variable (a `.env` file is read first). Logs go to stderr and to a
//! log file in the working directory.

mod telemetry;

use anyhow::bail;
use clap::{Args, CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfdigest::analyzer::ExtractiveAnalyzer;
use pdfdigest::download::{Downloader, load_manifest};
use pdfdigest::processor::{
    BatchSummary, DocumentProcessor, ProcessingConfig, ProcessingOutcome, list_pdfs,
    process_folder, retry_failed,
};
use pdfdigest::reader::LopdfReader;
use pdfdigest::record::{ProcessingRecord, ProcessingStatus};
use pdfdigest::report::{ConcurrentMetrics, PerformanceMonitor, PerformanceReport, measure};
use pdfdigest::settings::{self, Settings};
use pdfdigest::store::{DocumentStore, LibsqlStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

const PIPELINE_LOG: &str = "pdf_pipeline.log";
const BENCH_LOG: &str = "pipeline_test_results.log";

type PdfProcessor = DocumentProcessor<LopdfReader, ExtractiveAnalyzer, LibsqlStore>;

#[derive(Parser)]
#[command(author, version, about = "Summarize a folder of PDF documents into a database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process every PDF in a folder
    Run(RunArgs),

    /// Process a single file and print the stored record as JSON
    Process(ProcessArgs),

    /// Reprocess every document whose last run failed
    Retry(RetryArgs),

    /// List stored documents
    List(ListArgs),

    /// Benchmark sequential and concurrent processing and write a performance report
    Bench(BenchArgs),

    /// Download the PDFs listed in a JSON manifest of name to URL
    Download(DownloadArgs),
}

impl Commands {
    fn log_file(&self) -> &'static str {
        match self {
            Self::Bench(_) => BENCH_LOG,
            _ => PIPELINE_LOG,
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Folder containing the PDF files
    #[arg(short, long, default_value = "pdfs")]
    folder: PathBuf,

    /// Number of documents processed at once
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Write performance_report.json and charts to the working directory
    #[arg(short, long)]
    report: bool,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// PDF file to process
    #[arg(required = true)]
    file: PathBuf,
}

#[derive(Args, Debug)]
struct RetryArgs {
    /// Number of documents processed at once
    #[arg(short, long, default_value = "4")]
    workers: usize,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only show documents with this status (pending, completed, failed)
    #[arg(short, long)]
    status: Option<ProcessingStatus>,

    /// Show detailed information
    #[arg(short, long)]
    details: bool,
}

#[derive(Args, Debug)]
struct BenchArgs {
    /// Folder containing the test PDF files
    #[arg(short, long, default_value = "test_data")]
    folder: PathBuf,

    /// Number of documents processed at once in the concurrent pass
    #[arg(short, long, default_value = "4")]
    workers: usize,
}

#[derive(Args, Debug)]
struct DownloadArgs {
    /// JSON file mapping document names to URLs
    #[arg(short, long, default_value = "pdf.json")]
    manifest: PathBuf,

    /// Folder the PDFs are saved to
    #[arg(short, long, default_value = "pdfs")]
    folder: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // If no command is provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // .env first so that RUST_LOG reaches the subscriber
    settings::load_dotenv();
    let _otel = telemetry::init_tracing_subscriber(Path::new(command.log_file()))?;

    match command {
        Commands::Download(args) => download_command(args).await,
        Commands::Run(args) => run_command(args, &Settings::from_env()?).await,
        Commands::Process(args) => process_command(args, &Settings::from_env()?).await,
        Commands::Retry(args) => retry_command(args, &Settings::from_env()?).await,
        Commands::List(args) => list_command(args, &Settings::from_env()?).await,
        Commands::Bench(args) => bench_command(args, &Settings::from_env()?).await,
    }
}

/// Fetch every manifest entry into the target folder
#[instrument(skip_all)]
async fn download_command(args: DownloadArgs) -> anyhow::Result<()> {
    let manifest = load_manifest(&args.manifest)?;
    info!(
        "Downloading {} documents from {} into {}",
        manifest.len(),
        args.manifest.display(),
        args.folder.display()
    );

    let summary = Downloader::new()?
        .download_all(&manifest, &args.folder)
        .await?;

    println!(
        "Downloaded {} of {} documents into {}",
        summary.downloaded.len(),
        manifest.len(),
        args.folder.display()
    );
    for (name, reason) in &summary.failed {
        println!("  {}: {}", name, reason);
    }
    Ok(())
}

/// Open the store and wire up a processor with default settings
async fn build_processor(settings: &Settings) -> anyhow::Result<PdfProcessor> {
    let store = LibsqlStore::open(&settings.uri, settings.auth_token.clone()).await?;

    let config = ProcessingConfig::default();
    config.validate()?;
    let analyzer = ExtractiveAnalyzer::new(config.analyzer.clone());

    Ok(DocumentProcessor::new(
        LopdfReader::new(),
        analyzer,
        store,
        config,
    ))
}

/// Progress bar fed by a channel of finished file names
fn progress_bar(total: usize, message: &'static str) -> (mpsc::Sender<String>, JoinHandle<()>) {
    let (progress_sender, mut progress_receiver) = mpsc::channel::<String>(100);

    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    progress_bar.set_message(message);

    let handle = tokio::spawn(async move {
        while let Some(filename) = progress_receiver.recv().await {
            progress_bar.inc(1);
            progress_bar.set_message(format!("Processed {}", filename));
        }
        // all senders are gone
        progress_bar.finish_with_message("Done");
    });

    (progress_sender, handle)
}

fn print_summary(outcomes: &[ProcessingOutcome], elapsed: std::time::Duration) {
    let summary = BatchSummary::from_outcomes(outcomes);
    println!(
        "Processed {} documents in {:.2?}: {} completed, {} failed",
        summary.total, elapsed, summary.completed, summary.failed
    );

    for outcome in outcomes {
        if let ProcessingOutcome::Failed { record, error } = outcome {
            println!("  {} failed during {}: {}", record.filename, error.stage(), error);
        }
    }
}

#[instrument(skip(settings))]
async fn run_command(args: RunArgs, settings: &Settings) -> anyhow::Result<()> {
    let monitor = Arc::new(PerformanceMonitor::new());
    let mut processor = build_processor(settings).await?;
    if args.report {
        processor = processor.with_monitor(Arc::clone(&monitor));
    }
    let processor = Arc::new(processor);

    let total = list_pdfs(&args.folder)?.len();
    println!(
        "Processing {} PDF files from {} with {} workers...",
        total,
        args.folder.display(),
        args.workers
    );

    let (progress_sender, progress_handle) = progress_bar(total, "Processing documents...");
    let (outcomes, measurement) = measure(process_folder(
        processor,
        &args.folder,
        args.workers,
        Some(progress_sender),
    ))
    .await;
    let outcomes = outcomes?;

    // Wait for progress task to complete (it will end when all senders are dropped)
    let _ = progress_handle.await;

    print_summary(&outcomes, measurement.elapsed);

    if args.report {
        let report = PerformanceReport::new(
            monitor.samples(),
            Some(ConcurrentMetrics::new(measurement, outcomes.len())),
        );
        for path in report.write(Path::new("."))? {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

#[instrument(skip(settings))]
async fn process_command(args: ProcessArgs, settings: &Settings) -> anyhow::Result<()> {
    let processor = build_processor(settings).await?;

    let outcome = processor.process_single_pdf(&args.file).await;
    println!("{}", serde_json::to_string_pretty(outcome.record())?);

    if let ProcessingOutcome::Failed { error, .. } = outcome {
        bail!("processing {} failed: {}", args.file.display(), error);
    }
    Ok(())
}

#[instrument(skip(settings))]
async fn retry_command(args: RetryArgs, settings: &Settings) -> anyhow::Result<()> {
    let processor = Arc::new(build_processor(settings).await?);

    let total = processor
        .store()
        .list(Some(ProcessingStatus::Failed))
        .await?
        .len();
    if total == 0 {
        println!("No failed documents to retry");
        return Ok(());
    }
    println!("Retrying {} failed documents...", total);

    let (progress_sender, progress_handle) = progress_bar(total, "Retrying documents...");
    let start_time = std::time::Instant::now();
    let outcomes = retry_failed(processor, args.workers, Some(progress_sender)).await?;
    let _ = progress_handle.await;

    print_summary(&outcomes, start_time.elapsed());
    Ok(())
}

#[instrument(skip(settings))]
async fn list_command(args: ListArgs, settings: &Settings) -> anyhow::Result<()> {
    let store = LibsqlStore::open(&settings.uri, settings.auth_token.clone()).await?;
    let records = store.list(args.status).await?;

    println!("Stored documents: {}", records.len());

    let format_timestamp =
        |ts: &chrono::DateTime<chrono::Utc>| ts.format("%Y-%m-%d %H:%M:%S").to_string();

    for record in records {
        if args.details {
            println!("File: {}", record.file_path);
            println!("Size: {} bytes, {} pages", record.file_size, record.page_count);
            println!("Created: {}", format_timestamp(&record.creation_date));
            println!("Last updated: {}", format_timestamp(&record.last_updated));
            println!("Status: {}", record.processing_status);
            if let Some(summary) = &record.summary {
                println!("Summary: {}", summary);
            }
            if !record.keywords.is_empty() {
                println!("Keywords: {}", record.keywords.join(", "));
            }
            if !record.entities.is_empty() {
                println!("Entities: {}", record.entities.join(", "));
            }
            if let Some(error) = &record.error {
                println!("Error: {}", error);
            }
            println!();
        } else {
            println!(
                "{} - {} ({} pages, last updated {})",
                record.filename,
                record.processing_status,
                record.page_count,
                format_timestamp(&record.last_updated)
            );
        }
    }

    Ok(())
}

/// Problems with a record that a successful run should not have
fn check_record(record: &ProcessingRecord, keyword_limit: usize) -> Vec<String> {
    let mut problems = Vec::new();

    if record.processing_status != ProcessingStatus::Completed {
        problems.push(format!("status is {}", record.processing_status));
    }
    if record.summary.as_deref().is_none_or(str::is_empty) {
        problems.push("summary is empty".to_string());
    }
    if record.keywords.is_empty() {
        problems.push("no keywords extracted".to_string());
    }
    if record.keywords.len() > keyword_limit {
        problems.push(format!(
            "too many keywords: {} > {}",
            record.keywords.len(),
            keyword_limit
        ));
    }

    problems
}

#[instrument(skip(settings))]
async fn bench_command(args: BenchArgs, settings: &Settings) -> anyhow::Result<()> {
    let files = list_pdfs(&args.folder)?;
    if files.is_empty() {
        bail!("no PDF files found in {}", args.folder.display());
    }

    let monitor = Arc::new(PerformanceMonitor::new());
    let processor = build_processor(settings)
        .await?
        .with_monitor(Arc::clone(&monitor));

    // Sequential pass: one document at a time, each checked after processing
    println!("Sequential pass over {} files...", files.len());
    let mut failed_checks = 0;
    for file in &files {
        let outcome = processor.process_single_pdf(file).await;
        let record = outcome.record();
        let tier = processor.config().tier(record.page_count);
        let problems = check_record(record, processor.config().keyword_limit(record.page_count));

        if problems.is_empty() {
            info!("{} passed structure checks ({} document)", record.filename, tier);
        } else {
            failed_checks += 1;
            for problem in &problems {
                warn!("{}: {}", record.filename, problem);
            }
        }
    }

    let samples = monitor.samples();
    for sample in &samples {
        println!(
            "  {}: {:.2}s, {:.2} MB, {} summary chars, {} keywords",
            sample.filename,
            sample.processing_time,
            sample.memory_used as f64 / (1024.0 * 1024.0),
            sample.summary_length,
            sample.keyword_count
        );
    }

    // Concurrent pass over the same folder, measured as a whole
    println!("Concurrent pass with {} workers...", args.workers);
    let concurrent = Arc::new(build_processor(settings).await?);
    let (outcomes, measurement) =
        measure(process_folder(concurrent, &args.folder, args.workers, None)).await;
    let outcomes = outcomes?;
    print_summary(&outcomes, measurement.elapsed);

    let report = PerformanceReport::new(
        samples,
        Some(ConcurrentMetrics::new(measurement, outcomes.len())),
    );
    for path in report.write(Path::new("."))? {
        println!("Wrote {}", path.display());
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    if failed_checks > 0 || summary.failed > 0 {
        bail!(
            "{} files failed structure checks, {} failed in the concurrent pass",
            failed_checks,
            summary.failed
        );
    }

    println!("All checks passed");
    Ok(())
}
