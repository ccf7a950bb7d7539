//! # Processor Configuration Module
//!
//! Controls how much of each document survives summarization and how many keywords
//! are kept. Documents are sorted into three tiers by page count; each tier has its
//! own summary ratio. Keyword caps use the same thresholds with an exclusive short bound.
//!
//! ## Key Components
//!
//! - `DocumentTier`: short, medium or long, decided by page thresholds
//! - `ProcessingConfig`: thresholds, ratios, keyword caps and analyzer options
//! - `ProcessingConfigBuilder`: builder pattern implementation for easier configuration

use crate::analyzer::AnalyzerConfig;
use crate::error::Error as CrateError;
use serde::Serialize;
use std::fmt;

/// Length class of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentTier {
    /// At most `short_doc_threshold` pages
    Short,
    /// At most `medium_doc_threshold` pages
    Medium,
    /// Everything longer
    Long,
}

impl fmt::Display for DocumentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        };
        f.write_str(name)
    }
}

/// Maximum number of keywords kept per length class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordLimits {
    /// Cap below `short_doc_threshold` pages
    pub short: usize,
    /// Cap up to `medium_doc_threshold` pages
    pub medium: usize,
    /// Cap for long documents
    pub long: usize,
}

impl Default for KeywordLimits {
    fn default() -> Self {
        Self {
            short: 25,
            medium: 75,
            long: 100,
        }
    }
}

/// Configuration for the document processor
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// Page count up to which a document is short
    pub short_doc_threshold: u32,

    /// Page count up to which a document is medium
    pub medium_doc_threshold: u32,

    /// Share of the text kept for short documents
    pub short_summary_ratio: f64,

    /// Share of the text kept for medium documents
    pub medium_summary_ratio: f64,

    /// Share of the text kept for long documents
    pub long_summary_ratio: f64,

    /// Keyword caps per tier
    pub max_keywords: KeywordLimits,

    /// Options passed to the analyzer
    pub analyzer: AnalyzerConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            short_doc_threshold: 10,
            medium_doc_threshold: 50,
            short_summary_ratio: 0.25,
            medium_summary_ratio: 0.2,
            long_summary_ratio: 0.15,
            max_keywords: KeywordLimits::default(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ProcessingConfig {
    /// Create a new builder
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::new()
    }

    /// Classify a document by page count
    pub fn tier(&self, page_count: u32) -> DocumentTier {
        if page_count <= self.short_doc_threshold {
            DocumentTier::Short
        } else if page_count <= self.medium_doc_threshold {
            DocumentTier::Medium
        } else {
            DocumentTier::Long
        }
    }

    /// Summary ratio for a tier
    pub fn summary_ratio(&self, tier: DocumentTier) -> f64 {
        match tier {
            DocumentTier::Short => self.short_summary_ratio,
            DocumentTier::Medium => self.medium_summary_ratio,
            DocumentTier::Long => self.long_summary_ratio,
        }
    }

    /// Keyword cap for a page count
    ///
    /// The short cap stops one page earlier than the short summary tier: a document
    /// of exactly `short_doc_threshold` pages already gets the medium cap.
    pub fn keyword_limit(&self, page_count: u32) -> usize {
        if page_count < self.short_doc_threshold {
            self.max_keywords.short
        } else if page_count <= self.medium_doc_threshold {
            self.max_keywords.medium
        } else {
            self.max_keywords.long
        }
    }

    /// Check thresholds and ratios
    pub fn validate(&self) -> Result<(), CrateError> {
        if self.medium_doc_threshold < self.short_doc_threshold {
            return Err(CrateError::Config(format!(
                "medium threshold ({}) is below short threshold ({})",
                self.medium_doc_threshold, self.short_doc_threshold
            )));
        }

        for (name, ratio) in [
            ("short", self.short_summary_ratio),
            ("medium", self.medium_summary_ratio),
            ("long", self.long_summary_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(CrateError::Config(format!(
                    "{name} summary ratio must be in (0, 1], got {ratio}"
                )));
            }
        }

        Ok(())
    }
}

/// Builder for ProcessingConfig
#[derive(Debug, Default)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ProcessingConfig::default(),
        }
    }

    /// Set the short and medium page thresholds
    pub fn thresholds(mut self, short: u32, medium: u32) -> Self {
        self.config.short_doc_threshold = short;
        self.config.medium_doc_threshold = medium;
        self
    }

    /// Set the summary ratios for short, medium and long documents
    pub fn summary_ratios(mut self, short: f64, medium: f64, long: f64) -> Self {
        self.config.short_summary_ratio = short;
        self.config.medium_summary_ratio = medium;
        self.config.long_summary_ratio = long;
        self
    }

    /// Set the keyword caps
    pub fn max_keywords(mut self, max_keywords: KeywordLimits) -> Self {
        self.config.max_keywords = max_keywords;
        self
    }

    /// Set the minimum keyword frequency
    pub fn min_keyword_freq(mut self, min_keyword_freq: usize) -> Self {
        self.config.analyzer.min_keyword_freq = min_keyword_freq;
        self
    }

    /// Enable or disable named entity extraction
    pub fn extract_entities(mut self, extract_entities: bool) -> Self {
        self.config.analyzer.extract_entities = extract_entities;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ProcessingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let config = ProcessingConfig::default();

        assert_eq!(config.tier(0), DocumentTier::Short);
        assert_eq!(config.tier(10), DocumentTier::Short);
        assert_eq!(config.tier(11), DocumentTier::Medium);
        assert_eq!(config.tier(50), DocumentTier::Medium);
        assert_eq!(config.tier(51), DocumentTier::Long);
    }

    #[test]
    fn test_ratios_and_limits_follow_tier() {
        let config = ProcessingConfig::default();

        assert_eq!(config.summary_ratio(config.tier(5)), 0.25);
        assert_eq!(config.summary_ratio(config.tier(30)), 0.2);
        assert_eq!(config.summary_ratio(config.tier(300)), 0.15);
        assert_eq!(config.keyword_limit(5), 25);
        assert_eq!(config.keyword_limit(300), 100);
    }

    #[test]
    fn test_keyword_limit_boundaries() {
        let config = ProcessingConfig::default();

        assert_eq!(config.keyword_limit(9), 25);
        assert_eq!(config.keyword_limit(10), 75);
        assert_eq!(config.tier(10), DocumentTier::Short);
        assert_eq!(config.keyword_limit(50), 75);
        assert_eq!(config.keyword_limit(51), 100);
    }

    #[test]
    fn test_builder() {
        let config = ProcessingConfig::builder()
            .thresholds(2, 4)
            .summary_ratios(0.5, 0.4, 0.3)
            .min_keyword_freq(1)
            .extract_entities(false)
            .build();

        assert_eq!(config.tier(3), DocumentTier::Medium);
        assert_eq!(config.medium_summary_ratio, 0.4);
        assert_eq!(config.analyzer.min_keyword_freq, 1);
        assert!(!config.analyzer.extract_entities);
    }

    #[test]
    fn test_validate() {
        assert!(ProcessingConfig::default().validate().is_ok());
        assert!(
            ProcessingConfig::builder()
                .thresholds(50, 10)
                .build()
                .validate()
                .is_err()
        );
        assert!(
            ProcessingConfig::builder()
                .summary_ratios(0.25, 0.0, 0.15)
                .build()
                .validate()
                .is_err()
        );
        assert!(
            ProcessingConfig::builder()
                .summary_ratios(1.5, 0.2, 0.15)
                .build()
                .validate()
                .is_err()
        );
    }
}
