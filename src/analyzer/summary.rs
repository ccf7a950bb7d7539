//! # Extractive Summary Module
//!
//! Splits text into sentences and keeps the highest ranked ones until the summary
//! reaches a target share of the original length.
//!
//! Each sentence is scored by the mean of three components:
//!
//! - position: earlier sentences score higher (`1 - i/n`)
//! - length: sentences with more content words score higher, capped at 20 words
//! - word importance: mean content-word length, normalised to 10 characters
//!
//! Selection walks the ranking and stops at the first prefix whose joined length
//! reaches the target. A larger ratio therefore always selects a superset of the
//! sentences picked by a smaller one.

use super::keywords::is_stop_word;
use regex::Regex;
use std::sync::LazyLock;

static SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z'-]*").unwrap());

/// Split text into sentences, collapsing whitespace.
///
/// Fragments without any alphabetic character are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    SENTENCE
        .find_iter(&normalized)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| s.chars().any(char::is_alphabetic))
        .collect()
}

/// Words of a sentence, lower-cased
pub(crate) fn words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(sentence).map(|m| m.as_str().to_lowercase())
}

fn score(sentence: &str, index: usize, total: usize) -> f64 {
    let content: Vec<String> = words(sentence).filter(|w| !is_stop_word(w)).collect();

    let position = 1.0 - index as f64 / total as f64;
    if content.is_empty() {
        return position / 3.0;
    }

    let length = (content.len() as f64 / 20.0).min(1.0);
    let mean_word_len =
        content.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / content.len() as f64;
    let importance = (mean_word_len / 10.0).min(1.0);

    (position + length + importance) / 3.0
}

/// Build a summary of roughly `target_chars` characters from `sentences`.
///
/// At least one sentence is always selected. The chosen sentences keep their
/// original order and are joined by single spaces.
pub fn summarize_sentences(sentences: &[String], target_chars: usize) -> String {
    if sentences.is_empty() {
        return String::new();
    }

    let total = sentences.len();
    let scores: Vec<f64> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| score(s, i, total))
        .collect();

    let mut ranking: Vec<usize> = (0..total).collect();
    ranking.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

    let mut selected = Vec::new();
    let mut length = 0;
    for index in ranking {
        if !selected.is_empty() {
            length += 1;
        }
        length += sentences[index].chars().count();
        selected.push(index);
        if length >= target_chars {
            break;
        }
    }

    selected.sort_unstable();
    selected
        .into_iter()
        .map(|i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
