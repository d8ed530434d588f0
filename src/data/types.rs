//! Core data types for the sentiment pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use ndarray::{Array1, Array2};

/// Binary sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Parse a raw dataset label.
    ///
    /// Accepts the common string and numeric encodings found in Twitter
    /// sentiment dumps. Returns `None` for anything non-binary (neutral,
    /// irrelevant, malformed) so callers can filter those rows out.
    pub fn parse_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "pos" | "4" | "1" => Some(Sentiment::Positive),
            "negative" | "neg" | "0" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    /// Numeric encoding used by the classifiers (positive = 1.0).
    pub fn as_f64(self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Negative => 0.0,
        }
    }

    /// Map a classifier output back to a label (threshold at 0.5).
    pub fn from_f64(value: f64) -> Self {
        if value >= 0.5 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled row of the training dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledTweet {
    /// Dataset row identifier
    pub id: u64,
    /// Binary sentiment label
    pub sentiment: Sentiment,
    /// Raw tweet text
    pub text: String,
}

/// Token produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Original surface form
    pub original: String,
    /// Normalized form (lowercased, placeholders substituted)
    pub normalized: String,
    /// Position in the token stream
    pub position: usize,
    /// Token class
    pub token_type: TokenType,
}

/// Token class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Plain word
    Word,
    /// Numeric literal
    Number,
    /// URL (normalized to a placeholder)
    Url,
    /// @mention (normalized to a placeholder)
    Mention,
    /// #hashtag (normalized to the bare word)
    Hashtag,
    /// Emoticon such as `:)` or `:(`
    Emoticon,
}

/// Document-term matrix produced by a vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    /// Document names (row order)
    pub documents: Vec<String>,
    /// Term -> column index
    pub vocabulary: HashMap<String, usize>,
    /// Column index -> term
    pub terms: Vec<String>,
    /// Dense rows of feature values
    pub matrix: Vec<Vec<f64>>,
}

impl DocumentTermMatrix {
    pub fn n_documents(&self) -> usize {
        self.matrix.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Convert to an ndarray matrix for the classifiers.
    pub fn to_array(&self) -> Array2<f64> {
        let n_rows = self.n_documents();
        let n_cols = self.n_terms();
        let mut array = Array2::<f64>::zeros((n_rows, n_cols));

        for (i, row) in self.matrix.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                array[[i, j]] = value;
            }
        }

        array
    }
}

/// Build the label vector for a set of tweets.
pub fn label_vector(tweets: &[LabeledTweet]) -> Array1<f64> {
    Array1::from_iter(tweets.iter().map(|t| t.sentiment.as_f64()))
}
