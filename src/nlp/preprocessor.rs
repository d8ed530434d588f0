//! Token preprocessing
//!
//! Stopword removal and a light suffix stemmer, applied to the normalized
//! token stream before vectorization.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Common English stopwords
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "so", "of", "at", "by",
    "for", "with", "about", "to", "from", "in", "on", "off", "out", "over",
    "under", "again", "once", "here", "there", "when", "where", "why", "how",
    "is", "am", "are", "was", "were", "be", "been", "being", "do", "does",
    "did", "doing", "have", "has", "had", "having", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "i", "me", "my", "we",
    "our", "you", "your", "he", "him", "his", "she", "her", "it", "its",
    "they", "them", "their", "this", "that", "these", "those", "what", "which",
    "who", "whom", "as", "rt",
];

/// Token preprocessor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    /// Words removed from the token stream
    stopwords: HashSet<String>,
    /// Apply the suffix stemmer
    stem: bool,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().map(|s| s.to_string()).collect(),
            stem: true,
        }
    }

    /// Replace the stopword list
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(|w| w.into()).collect();
        self
    }

    /// Enable or disable stemming
    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stem = stem;
        self
    }

    /// Apply stopword removal and stemming to a token stream.
    pub fn apply(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| !self.stopwords.contains(t.as_str()))
            .map(|t| {
                if self.stem {
                    Self::stem_word(t)
                } else {
                    t.clone()
                }
            })
            .collect()
    }

    /// Light suffix stemmer.
    ///
    /// Handles the regular inflections that matter for bag-of-words
    /// features ("playing"/"played"/"plays" all map to "play"). Short
    /// words and placeholder tokens are left alone.
    fn stem_word(word: &str) -> String {
        if word.starts_with('[') || !word.is_ascii() {
            return word.to_string();
        }

        if word.len() > 4 && word.ends_with("ies") {
            return format!("{}y", &word[..word.len() - 3]);
        }
        if word.len() > 5 && word.ends_with("ing") {
            let stem = &word[..word.len() - 3];
            // "running" -> "run", not "runn"
            return Self::undouble(stem);
        }
        if word.len() > 4 && word.ends_with("ed") {
            let stem = &word[..word.len() - 2];
            return Self::undouble(stem);
        }
        if word.len() > 3 && word.ends_with("ly") {
            return word[..word.len() - 2].to_string();
        }
        if word.len() > 3
            && word.ends_with('s')
            && !word.ends_with("ss")
            && !word.ends_with("us")
        {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }

    /// Collapse a doubled final consonant left by suffix stripping.
    fn undouble(stem: &str) -> String {
        let bytes = stem.as_bytes();
        let n = bytes.len();

        if n >= 2 && bytes[n - 1] == bytes[n - 2] && !b"aeiouls".contains(&bytes[n - 1]) {
            return stem[..n - 1].to_string();
        }

        stem.to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
