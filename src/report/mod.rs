//! # Performance Reporting Module
//!
//! Measures how long each document takes and how much the process memory moves while
//! it is processed, scores the content of the stored summary, and writes everything
//! out at the end of a run as `performance_report.json` plus three PNG charts.
//!
//! ## Key Components
//!
//! - `PerformanceMonitor`: wraps processing futures and collects `PerformanceSample`s
//! - `QualityMetrics`: simple content scores for a finished record
//! - `PerformanceReport`: aggregated statistics, serialized to JSON
//! - `measure`: timing and memory delta for any future, used for whole-batch runs

mod charts;
pub mod error;

pub use error::ReportError;

use crate::processor::ProcessingOutcome;
use crate::record::{ProcessingRecord, ProcessingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::{debug, info, instrument, warn};

/// File name of the JSON report
pub const REPORT_FILE: &str = "performance_report.json";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Content scores for a processed record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Words per sentence of the summary
    pub avg_sentence_length: f64,
    /// Unique keywords over total keywords
    pub keyword_diversity: f64,
    /// Summary characters over the characters of the space-joined keywords
    pub summary_to_keyword_ratio: f64,
}

impl QualityMetrics {
    /// Score a record's summary and keywords
    pub fn from_record(record: &ProcessingRecord) -> Self {
        let summary = record.summary.as_deref().unwrap_or_default();
        let keywords = &record.keywords;

        let sentences = summary.split(". ").count();
        let words = summary.split_whitespace().count();
        let avg_sentence_length = words as f64 / sentences as f64;

        if keywords.is_empty() {
            return Self {
                avg_sentence_length,
                ..Self::default()
            };
        }

        let unique: std::collections::HashSet<&String> = keywords.iter().collect();
        let joined_len = keywords.join(" ").chars().count();

        Self {
            avg_sentence_length,
            keyword_diversity: unique.len() as f64 / keywords.len() as f64,
            summary_to_keyword_ratio: if joined_len == 0 {
                0.0
            } else {
                summary.chars().count() as f64 / joined_len as f64
            },
        }
    }
}

/// Measurements for one processed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// File name without directory
    pub filename: String,
    /// File size in bytes
    pub file_size: u64,
    /// Wall-clock seconds
    pub processing_time: f64,
    /// Change in resident memory, in bytes
    pub memory_used: i64,
    /// Summary length in characters
    pub summary_length: usize,
    /// Number of stored keywords
    pub keyword_count: usize,
    /// Final status of the record
    pub status: ProcessingStatus,
    /// Content scores
    pub quality_metrics: QualityMetrics,
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
}

/// Elapsed time and memory delta of a measured future
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Wall-clock duration
    pub elapsed: Duration,
    /// Change in resident memory, in bytes
    pub memory_delta: i64,
}

/// Resident memory of this process in bytes, or 0 when it cannot be read
pub fn resident_memory() -> u64 {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };

    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map_or(0, |process| process.memory())
}

/// Run a future, recording wall-clock time and the change in resident memory
pub async fn measure<F, T>(future: F) -> (T, Measurement)
where
    F: Future<Output = T>,
{
    let start_memory = resident_memory();
    let start = Instant::now();

    let output = future.await;

    let elapsed = start.elapsed();
    let memory_delta = resident_memory() as i64 - start_memory as i64;
    (
        output,
        Measurement {
            elapsed,
            memory_delta,
        },
    )
}

/// Collects a sample for every document it tracks
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    samples: Mutex<Vec<PerformanceSample>>,
}

impl PerformanceMonitor {
    /// Create a monitor with no samples
    pub fn new() -> Self {
        Self::default()
    }

    /// Await a processing future and record a sample for its outcome
    pub async fn track<F>(&self, future: F) -> ProcessingOutcome
    where
        F: Future<Output = ProcessingOutcome>,
    {
        let (outcome, measurement) = measure(future).await;
        let record = outcome.record();

        let sample = PerformanceSample {
            filename: record.filename.clone(),
            file_size: record.file_size,
            processing_time: measurement.elapsed.as_secs_f64(),
            memory_used: measurement.memory_delta,
            summary_length: record.summary.as_deref().map_or(0, |s| s.chars().count()),
            keyword_count: record.keywords.len(),
            status: record.processing_status,
            quality_metrics: QualityMetrics::from_record(record),
            timestamp: Utc::now(),
        };
        debug!(
            "{}: {:.2}s, {:.2} MB",
            sample.filename,
            sample.processing_time,
            sample.memory_used as f64 / BYTES_PER_MB
        );

        self.lock().push(sample);
        outcome
    }

    /// Copy of the samples collected so far
    pub fn samples(&self) -> Vec<PerformanceSample> {
        self.lock().clone()
    }

    /// Drop all collected samples
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PerformanceSample>> {
        self.samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Aggregate of a whole concurrent batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrentMetrics {
    /// Wall-clock seconds for the batch
    pub total_time: f64,
    /// `total_time` divided by the number of documents
    pub avg_time_per_doc: f64,
    /// Change in resident memory over the batch, in MB
    pub total_memory_mb: f64,
    /// Number of documents with an outcome
    pub documents_processed: usize,
    /// When the batch finished
    pub timestamp: DateTime<Utc>,
}

impl ConcurrentMetrics {
    /// Build from a batch measurement
    pub fn new(measurement: Measurement, documents_processed: usize) -> Self {
        let total_time = measurement.elapsed.as_secs_f64();
        Self {
            total_time,
            avg_time_per_doc: if documents_processed == 0 {
                0.0
            } else {
                total_time / documents_processed as f64
            },
            total_memory_mb: measurement.memory_delta as f64 / BYTES_PER_MB,
            documents_processed,
            timestamp: Utc::now(),
        }
    }
}

/// Statistics over the per-document samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialStats {
    /// Mean processing time in seconds
    pub avg_time: f64,
    /// Mean memory delta in bytes
    pub avg_memory: f64,
    /// Fastest document in seconds
    pub min_time: f64,
    /// Slowest document in seconds
    pub max_time: f64,
}

impl SequentialStats {
    fn from_samples(samples: &[PerformanceSample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let times = samples.iter().map(|s| s.processing_time);

        Some(Self {
            avg_time: times.clone().sum::<f64>() / n,
            avg_memory: samples.iter().map(|s| s.memory_used as f64).sum::<f64>() / n,
            min_time: times.clone().fold(f64::INFINITY, f64::min),
            max_time: times.fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Body of the performance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of per-document samples
    pub total_files_processed: usize,
    /// Per-document statistics, absent when nothing was sampled
    pub sequential_processing: Option<SequentialStats>,
    /// Whole-batch metrics, when a concurrent run was measured
    pub concurrent_processing: Option<ConcurrentMetrics>,
    /// Every sample
    pub file_specific_metrics: Vec<PerformanceSample>,
}

/// Performance report for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Aggregated statistics
    pub summary: ReportSummary,
}

impl PerformanceReport {
    /// Aggregate samples and optional batch metrics
    pub fn new(samples: Vec<PerformanceSample>, concurrent: Option<ConcurrentMetrics>) -> Self {
        Self {
            timestamp: Utc::now(),
            summary: ReportSummary {
                total_files_processed: samples.len(),
                sequential_processing: SequentialStats::from_samples(&samples),
                concurrent_processing: concurrent,
                file_specific_metrics: samples,
            },
        }
    }

    /// Write the JSON report and charts into `dir`.
    ///
    /// Returns the files that were written. A chart that fails to render is logged
    /// and skipped; failing to write the JSON is an error.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        std::fs::create_dir_all(dir)?;

        let report_path = dir.join(REPORT_FILE);
        std::fs::write(&report_path, serde_json::to_string_pretty(self)?)?;
        let mut written = vec![report_path];

        let samples = &self.summary.file_specific_metrics;
        if samples.is_empty() {
            debug!("No samples, skipping charts");
        } else {
            for (name, render) in charts::CHARTS {
                let path = dir.join(name);
                match render(&path, samples) {
                    Ok(()) => written.push(path),
                    Err(e) => warn!("Failed to render {}: {}", name, e),
                }
            }
        }

        self.log_summary();
        Ok(written)
    }

    fn log_summary(&self) {
        let summary = &self.summary;
        if let Some(stats) = &summary.sequential_processing {
            info!(
                "Performance summary: {} files, avg {:.2}s (min {:.2}s, max {:.2}s), avg memory {:.2} MB",
                summary.total_files_processed,
                stats.avg_time,
                stats.min_time,
                stats.max_time,
                stats.avg_memory / BYTES_PER_MB
            );
        }
        if let Some(concurrent) = &summary.concurrent_processing {
            info!(
                "Concurrent run: {} documents in {:.2}s ({:.2}s per document, {:.2} MB)",
                concurrent.documents_processed,
                concurrent.total_time,
                concurrent.avg_time_per_doc,
                concurrent.total_memory_mb
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisResult;
    use crate::record::RecordBuilder;
    use tempfile::tempdir;

    fn completed(summary: &str, keywords: &[&str]) -> ProcessingRecord {
        RecordBuilder::for_path(Path::new("/tmp/report.pdf")).completed(AnalysisResult {
            summary: summary.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            entities: Vec::new(),
        })
    }

    fn sample(filename: &str, processing_time: f64, memory_used: i64) -> PerformanceSample {
        PerformanceSample {
            filename: filename.to_string(),
            file_size: 2 * 1024 * 1024,
            processing_time,
            memory_used,
            summary_length: 120,
            keyword_count: 4,
            status: ProcessingStatus::Completed,
            quality_metrics: QualityMetrics {
                avg_sentence_length: 12.0,
                keyword_diversity: 1.0,
                summary_to_keyword_ratio: 3.5,
            },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_quality_metrics() {
        let record = completed("One two three. Four five.", &["aaaa", "aaaa", "bb"]);
        let metrics = QualityMetrics::from_record(&record);

        assert_eq!(metrics.avg_sentence_length, 2.5);
        assert!((metrics.keyword_diversity - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.summary_to_keyword_ratio - 25.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_quality_metrics_without_keywords() {
        let record = RecordBuilder::for_path(Path::new("/tmp/x.pdf")).failed("boom");
        let metrics = QualityMetrics::from_record(&record);
        assert_eq!(metrics, QualityMetrics::default());
    }

    #[tokio::test]
    async fn test_measure_returns_output() {
        let (value, measurement) = measure(async { 21 * 2 }).await;
        assert_eq!(value, 42);
        assert!(measurement.elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_monitor_tracks_outcomes() {
        let monitor = PerformanceMonitor::new();
        let record = completed("A short summary. With two sentences.", &["summary"]);

        let outcome = monitor
            .track(async { ProcessingOutcome::Completed(record) })
            .await;

        assert!(outcome.is_completed());
        let samples = monitor.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].filename, "report.pdf");
        assert_eq!(samples[0].keyword_count, 1);
        assert_eq!(samples[0].summary_length, 36);

        monitor.clear();
        assert!(monitor.samples().is_empty());
    }

    #[test]
    fn test_report_aggregates_samples() {
        let samples = vec![sample("a.pdf", 1.0, 100), sample("b.pdf", 3.0, 300), sample("c.pdf", 2.0, -100)];
        let concurrent = ConcurrentMetrics::new(
            Measurement {
                elapsed: Duration::from_secs(3),
                memory_delta: 2 * 1024 * 1024,
            },
            3,
        );

        let report = PerformanceReport::new(samples, Some(concurrent));
        let stats = report.summary.sequential_processing.unwrap();

        assert_eq!(report.summary.total_files_processed, 3);
        assert_eq!(stats.avg_time, 2.0);
        assert_eq!(stats.min_time, 1.0);
        assert_eq!(stats.max_time, 3.0);
        assert!((stats.avg_memory - 100.0).abs() < 1e-9);

        let concurrent = report.summary.concurrent_processing.unwrap();
        assert_eq!(concurrent.avg_time_per_doc, 1.0);
        assert_eq!(concurrent.total_memory_mb, 2.0);
    }

    #[test]
    fn test_empty_report_has_no_stats() {
        let report = PerformanceReport::new(Vec::new(), None);
        assert!(report.summary.sequential_processing.is_none());
        assert_eq!(
            ConcurrentMetrics::new(
                Measurement {
                    elapsed: Duration::from_secs(1),
                    memory_delta: 0
                },
                0
            )
            .avg_time_per_doc,
            0.0
        );
    }

    #[test]
    fn test_write_report_and_charts() {
        let dir = tempdir().unwrap();
        let report = PerformanceReport::new(
            vec![sample("small.pdf", 0.5, 1024), sample("large.pdf", 2.5, -2048)],
            None,
        );

        let written = report.write(dir.path()).unwrap();

        let json = std::fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
        let parsed: PerformanceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary.file_specific_metrics.len(), 2);
        assert!(json.contains("\"sequential_processing\""));

        for name in ["time_vs_size.png", "memory_usage.png", "quality_metrics.png"] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }
        assert_eq!(written.len(), 4);
    }

    #[test]
    fn test_write_report_without_samples() {
        let dir = tempdir().unwrap();
        let written = PerformanceReport::new(Vec::new(), None)
            .write(dir.path())
            .unwrap();

        assert_eq!(written, vec![dir.path().join(REPORT_FILE)]);
        assert!(!dir.path().join("time_vs_size.png").exists());
    }
}
