//! Keyword and entity extraction

use super::summary::words;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "either", "else", "few", "for", "from", "further", "had", "has",
        "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
        "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "may",
        "me", "might", "more", "most", "much", "must", "my", "myself", "neither", "no", "nor",
        "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "same", "shall", "she", "should", "since", "so",
        "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
        "then", "there", "therefore", "these", "they", "this", "those", "though", "through",
        "thus", "to", "too", "under", "until", "up", "upon", "very", "was", "we", "were",
        "what", "when", "where", "whether", "which", "while", "who", "whom", "whose", "why",
        "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z]+(?:[ \t]+[A-Z][A-Za-z]+)+\b").unwrap());

/// Whether `word` (lower-case) is an English stop word
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

fn is_candidate(word: &str) -> bool {
    word.chars().count() > 3 && !is_stop_word(word) && !word.chars().any(|c| c.is_ascii_digit())
}

/// Extract keywords that occur at least `min_freq` times.
///
/// Candidates are single content words and bigrams of adjacent content words within
/// a sentence. The result is ordered by frequency, then by first occurrence.
pub fn extract_keywords(sentences: &[String], min_freq: usize) -> Vec<String> {
    // term -> (count, first occurrence)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0;

    let mut record = |term: String| {
        let entry = counts.entry(term).or_insert((0, order));
        entry.0 += 1;
        order += 1;
    };

    for sentence in sentences {
        let mut previous: Option<String> = None;
        for word in words(sentence) {
            if is_candidate(&word) {
                if let Some(prev) = previous.take() {
                    record(format!("{prev} {word}"));
                }
                record(word.clone());
                previous = Some(word);
            } else {
                previous = None;
            }
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= min_freq.max(1))
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked.into_iter().map(|(term, _, _)| term).collect()
}

/// Extract named entities: runs of two or more capitalised words.
///
/// Leading stop words ("The", "In") are stripped; duplicates keep their first
/// position.
pub fn extract_entities(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for m in ENTITY.find_iter(&normalized) {
        let parts: Vec<&str> = m
            .as_str()
            .split_whitespace()
            .skip_while(|w| is_stop_word(&w.to_lowercase()))
            .collect();
        if parts.len() < 2 {
            continue;
        }
        let entity = parts.join(" ");
        if seen.insert(entity.clone()) {
            entities.push(entity);
        }
    }

    entities
}
