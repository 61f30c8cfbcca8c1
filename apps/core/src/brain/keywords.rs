//! Keyword extraction.
//!
//! Keeps the first few content words of a message, in order of appearance,
//! after stop-word filtering, with plurals folded to their singular. When NLP
//! is disabled the message is simply split on whitespace.

use std::collections::HashSet;

/// Stopwords for English language
const STOPWORDS_EN: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "for", "yet", "so", "i", "you", "he", "she", "it",
    "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
    "mine", "yours", "hers", "ours", "theirs", "this", "that", "these", "those", "who", "whom",
    "which", "what", "whose", "is", "am", "are", "was", "were", "be", "been", "being", "have",
    "has", "had", "having", "do", "does", "did", "doing", "will", "would", "shall", "should",
    "can", "could", "may", "might", "must", "in", "on", "at", "to", "from", "by", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above", "below", "up",
    "down", "out", "off", "over", "under", "again", "further", "here", "there", "where", "when",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "any",
    "no", "not", "only", "own", "same", "than", "too", "very", "just", "also", "now", "then",
    "once", "always", "never", "if", "because", "as", "until", "while", "although", "though",
    "yes", "maybe", "s", "t", "ve", "re", "ll", "d", "m",
];

/// Fold a regular English plural onto its singular: "berries" -> "berry",
/// "cats" -> "cat". Words ending in "ss", "us" or "is" are left alone.
fn singular(word: &str) -> String {
    let len = word.chars().count();
    if len > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
    }
    if len > 3 && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is")) {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

/// Keyword extractor with stop-word filtering
pub struct KeywordExtractor {
    stopwords: HashSet<&'static str>,
    min_word_length: usize,
    max_keywords: usize,
    enabled: bool,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Create a new keyword extractor with default settings
    pub fn new() -> Self {
        Self::with_config(3, 5)
    }

    /// Create a keyword extractor with custom configuration
    pub fn with_config(min_word_length: usize, max_keywords: usize) -> Self {
        Self {
            stopwords: STOPWORDS_EN.iter().copied().collect(),
            min_word_length,
            max_keywords,
            enabled: true,
        }
    }

    /// Extractor that falls back to whitespace splitting.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Tokenize text into words, filtering out non-words
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| {
                word.chars().count() >= self.min_word_length && !self.stopwords.contains(*word)
            })
            .map(singular)
            .collect()
    }

    /// Extract keywords from a message
    pub fn extract(&self, text: &str) -> Vec<String> {
        if !self.enabled {
            return text.split_whitespace().map(str::to_string).collect();
        }

        self.tokenize(text)
            .into_iter()
            .take(self.max_keywords)
            .collect()
    }
}
