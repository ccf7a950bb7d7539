//! Text analyzer module
//!
//! Produces a length-proportional extractive summary, frequency-thresholded keywords
//! and named entities from extracted document text.

pub mod error;
mod keywords;
mod summary;

pub use error::AnalysisError;
pub use keywords::{extract_entities, extract_keywords, is_stop_word};
pub use summary::{split_sentences, summarize_sentences};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Output of text analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Extractive summary
    pub summary: String,

    /// Keywords ordered by score, without duplicates
    pub keywords: Vec<String>,

    /// Named entities, empty when entity extraction is disabled
    pub entities: Vec<String>,
}

/// Configuration for the extractive analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Minimum number of occurrences for a keyword
    pub min_keyword_freq: usize,

    /// Whether to extract named entities
    pub extract_entities: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_keyword_freq: 3,
            extract_entities: true,
        }
    }
}

/// Analyzes extracted text
pub trait TextAnalyzer: Send + Sync {
    /// Summarize `text` to about `ratio` of its length and extract keywords/entities
    fn analyze(&self, text: &str, ratio: f64) -> Result<AnalysisResult, AnalysisError>;
}

/// Sentence-ranking summarizer with frequency-based keyword extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractiveAnalyzer {
    config: AnalyzerConfig,
}

impl ExtractiveAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl TextAnalyzer for ExtractiveAnalyzer {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    fn analyze(&self, text: &str, ratio: f64) -> Result<AnalysisResult, AnalysisError> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(AnalysisError::InvalidRatio(ratio));
        }

        if text.trim().is_empty() {
            return Ok(AnalysisResult::default());
        }

        let sentences = split_sentences(text);
        if sentences.is_empty() {
            debug!("No sentences found, passing text through as summary");
            return Ok(AnalysisResult {
                summary: text.to_string(),
                ..Default::default()
            });
        }

        let target = (text.chars().count() as f64 * ratio) as usize;
        let summary = summarize_sentences(&sentences, target);
        let keywords = extract_keywords(&sentences, self.config.min_keyword_freq);
        let entities = if self.config.extract_entities {
            extract_entities(text)
        } else {
            Vec::new()
        };

        debug!(
            "Summary of {} chars (target {}), {} keywords, {} entities",
            summary.chars().count(),
            target,
            keywords.len(),
            entities.len()
        );

        Ok(AnalysisResult {
            summary,
            keywords,
            entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "The Document Processor reads every file in the folder. \
        Each file is parsed and its text is analyzed. \
        Summaries keep the most informative sentences of the document. \
        Keywords are counted across the whole document text. \
        The document store receives one record per processed document. \
        Failures are recorded instead of aborting the batch.";

    #[test]
    fn test_invalid_ratio() {
        let analyzer = ExtractiveAnalyzer::default();
        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                analyzer.analyze(TEXT, ratio),
                Err(AnalysisError::InvalidRatio(_))
            ));
        }
    }

    #[test]
    fn test_empty_text_gives_empty_result() {
        let analyzer = ExtractiveAnalyzer::default();
        let result = analyzer.analyze("   \n\t ", 0.25).unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[test]
    fn test_text_without_sentences_passes_through() {
        let analyzer = ExtractiveAnalyzer::default();
        let result = analyzer.analyze("12 34 56 -- 78", 0.25).unwrap();
        assert_eq!(result.summary, "12 34 56 -- 78");
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_analyze_extracts_keywords_and_entities() {
        let analyzer = ExtractiveAnalyzer::default();
        let result = analyzer.analyze(TEXT, 0.3).unwrap();

        assert!(!result.summary.is_empty());
        assert!(result.keywords.contains(&"document".to_string()));
        assert!(result.entities.contains(&"Document Processor".to_string()));
    }

    #[test]
    fn test_entities_can_be_disabled() {
        let analyzer = ExtractiveAnalyzer::new(AnalyzerConfig {
            min_keyword_freq: 3,
            extract_entities: false,
        });
        let result = analyzer.analyze(TEXT, 0.3).unwrap();
        assert!(result.entities.is_empty());
    }

    #[test]
    fn test_larger_ratio_never_shortens_summary() {
        let analyzer = ExtractiveAnalyzer::default();
        let ratios = [0.05, 0.1, 0.15, 0.2, 0.25, 0.5, 0.75, 1.0];

        let lengths: Vec<usize> = ratios
            .iter()
            .map(|r| analyzer.analyze(TEXT, *r).unwrap().summary.len())
            .collect();

        assert!(lengths.windows(2).all(|w| w[0] <= w[1]), "{lengths:?}");
    }
}
