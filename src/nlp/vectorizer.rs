//! Text vectorization
//!
//! Turns tokenized documents into numeric feature vectors:
//! - Bag of Words (term counts)
//! - TF-IDF (term frequency weighted by inverse document frequency)

use crate::data::DocumentTermMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait for vectorizers
pub trait Vectorizer {
    /// Fit the vectorizer on a corpus of tokenized documents
    fn fit(&mut self, documents: &[Vec<String>]);

    /// Transform one document into a feature vector
    fn transform(&self, document: &[String]) -> Vec<f64>;

    /// Fit and transform in one pass
    fn fit_transform(&mut self, documents: &[Vec<String>]) -> DocumentTermMatrix;

    /// Fitted vocabulary
    fn vocabulary(&self) -> &HashMap<String, usize>;
}

/// Bag of Words vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagOfWords {
    /// Term -> column index
    vocabulary: HashMap<String, usize>,
    /// Column index -> term
    terms: Vec<String>,
    /// Minimum document frequency
    min_df: usize,
    /// Maximum document frequency (fraction of the corpus)
    max_df: f64,
    /// Binary mode (1.0 if the term occurs, 0.0 otherwise)
    binary: bool,
}

impl BagOfWords {
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            min_df: 1,
            max_df: 1.0,
            binary: false,
        }
    }

    /// Set the minimum document frequency
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Set the maximum document frequency (fraction of all documents)
    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    /// Binary mode
    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Number of fitted terms
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }
}

impl Default for BagOfWords {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for BagOfWords {
    fn fit(&mut self, documents: &[Vec<String>]) {
        // Document frequency per term
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let unique_terms: std::collections::HashSet<_> = doc.iter().collect();
            for term in unique_terms {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Filter by min_df and max_df
        let n_docs = documents.len();
        let max_count = (self.max_df * n_docs as f64).ceil() as usize;

        self.vocabulary.clear();
        self.terms.clear();

        let mut filtered_terms: Vec<_> = doc_freq
            .into_iter()
            .filter(|(_, count)| *count >= self.min_df && *count <= max_count)
            .collect();

        // Sort for a deterministic column order
        filtered_terms.sort_by(|a, b| a.0.cmp(&b.0));

        for (idx, (term, _)) in filtered_terms.into_iter().enumerate() {
            self.vocabulary.insert(term.clone(), idx);
            self.terms.push(term);
        }
    }

    fn transform(&self, document: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0; self.terms.len()];

        for term in document {
            if let Some(&idx) = self.vocabulary.get(term) {
                if self.binary {
                    vector[idx] = 1.0;
                } else {
                    vector[idx] += 1.0;
                }
            }
        }

        vector
    }

    fn fit_transform(&mut self, documents: &[Vec<String>]) -> DocumentTermMatrix {
        self.fit(documents);

        let matrix: Vec<Vec<f64>> = documents.iter().map(|doc| self.transform(doc)).collect();

        let doc_names: Vec<String> = (0..documents.len())
            .map(|i| format!("doc_{}", i))
            .collect();

        DocumentTermMatrix {
            documents: doc_names,
            vocabulary: self.vocabulary.clone(),
            terms: self.terms.clone(),
            matrix,
        }
    }

    fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }
}

/// TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdf {
    /// Underlying Bag of Words
    bow: BagOfWords,
    /// IDF value per term
    idf: Vec<f64>,
    /// L2-normalize the output vectors
    normalize: bool,
    /// Smooth IDF (add one to document counts)
    smooth_idf: bool,
    /// Sublinear TF scaling (1 + ln(tf))
    sublinear_tf: bool,
}

impl TfIdf {
    pub fn new() -> Self {
        Self {
            bow: BagOfWords::new(),
            idf: Vec::new(),
            normalize: true,
            smooth_idf: true,
            sublinear_tf: false,
        }
    }

    /// Set the minimum document frequency
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.bow = self.bow.with_min_df(min_df);
        self
    }

    /// Set the maximum document frequency
    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.bow = self.bow.with_max_df(max_df);
        self
    }

    /// L2-normalize the output vectors
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Smooth IDF
    pub fn with_smooth_idf(mut self, smooth: bool) -> Self {
        self.smooth_idf = smooth;
        self
    }

    /// Sublinear TF scaling
    pub fn with_sublinear_tf(mut self, sublinear: bool) -> Self {
        self.sublinear_tf = sublinear;
        self
    }

    fn calculate_idf(&mut self, documents: &[Vec<String>]) {
        let n_docs = documents.len() as f64;
        let n_terms = self.bow.n_terms();

        self.idf = vec![0.0; n_terms];

        let mut doc_freq = vec![0usize; n_terms];

        for doc in documents {
            let unique_terms: std::collections::HashSet<_> = doc.iter().collect();
            for term in unique_terms {
                if let Some(&idx) = self.bow.vocabulary.get(term) {
                    doc_freq[idx] += 1;
                }
            }
        }

        for (idx, df) in doc_freq.into_iter().enumerate() {
            let df_smooth = if self.smooth_idf {
                df as f64 + 1.0
            } else {
                (df as f64).max(1.0)
            };

            let n_smooth = if self.smooth_idf {
                n_docs + 1.0
            } else {
                n_docs
            };

            self.idf[idx] = (n_smooth / df_smooth).ln() + 1.0;
        }
    }

    /// L2 normalization in place
    fn l2_normalize(vector: &mut [f64]) {
        let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in vector.iter_mut() {
                *x /= norm;
            }
        }
    }

    /// Fitted IDF values
    pub fn get_idf(&self) -> &[f64] {
        &self.idf
    }

    /// Top-N terms by IDF
    pub fn top_terms(&self, n: usize) -> Vec<(String, f64)> {
        let mut term_idf: Vec<_> = self
            .bow
            .terms
            .iter()
            .zip(self.idf.iter())
            .map(|(term, idf)| (term.clone(), *idf))
            .collect();

        term_idf.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        term_idf.truncate(n);
        term_idf
    }
}

impl Default for TfIdf {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for TfIdf {
    fn fit(&mut self, documents: &[Vec<String>]) {
        self.bow.fit(documents);
        self.calculate_idf(documents);
    }

    fn transform(&self, document: &[String]) -> Vec<f64> {
        let mut tf_vector = self.bow.transform(document);

        for (idx, tf) in tf_vector.iter_mut().enumerate() {
            if self.sublinear_tf && *tf > 0.0 {
                *tf = 1.0 + tf.ln();
            }
            *tf *= self.idf[idx];
        }

        if self.normalize {
            Self::l2_normalize(&mut tf_vector);
        }

        tf_vector
    }

    fn fit_transform(&mut self, documents: &[Vec<String>]) -> DocumentTermMatrix {
        self.fit(documents);

        let matrix: Vec<Vec<f64>> = documents.iter().map(|doc| self.transform(doc)).collect();

        let doc_names: Vec<String> = (0..documents.len())
            .map(|i| format!("doc_{}", i))
            .collect();

        DocumentTermMatrix {
            documents: doc_names,
            vocabulary: self.bow.vocabulary.clone(),
            terms: self.bow.terms.clone(),
            matrix,
        }
    }

    fn vocabulary(&self) -> &HashMap<String, usize> {
        self.bow.vocabulary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_bag_of_words() {
        let documents = docs(&[&["great", "game", "today"], &["awful", "game", "today"]]);

        let mut bow = BagOfWords::new();
        let dtm = bow.fit_transform(&documents);

        assert_eq!(dtm.n_documents(), 2);
        assert_eq!(dtm.n_terms(), 4); // great, game, today, awful
    }

    #[test]
    fn test_bag_of_words_counts() {
        let documents = docs(&[&["fun", "fun", "fun"]]);

        let mut bow = BagOfWords::new();
        let dtm = bow.fit_transform(&documents);

        assert_eq!(dtm.matrix[0][dtm.vocabulary["fun"]], 3.0);
    }

    #[test]
    fn test_binary_mode() {
        let documents = docs(&[&["fun", "fun", "fun"]]);

        let mut bow = BagOfWords::new().with_binary(true);
        let dtm = bow.fit_transform(&documents);

        assert_eq!(dtm.matrix[0][dtm.vocabulary["fun"]], 1.0);
    }

    #[test]
    fn test_min_df_filters_rare_terms() {
        let documents = docs(&[&["common", "rare"], &["common"], &["common"]]);

        let mut bow = BagOfWords::new().with_min_df(2);
        bow.fit(&documents);

        assert!(bow.vocabulary().contains_key("common"));
        assert!(!bow.vocabulary().contains_key("rare"));
    }

    #[test]
    fn test_unknown_terms_ignored() {
        let documents = docs(&[&["known"]]);

        let mut bow = BagOfWords::new();
        bow.fit(&documents);

        let vector = bow.transform(&["unknown".to_string()]);
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tfidf_rare_terms_weigh_more() {
        let documents = docs(&[
            &["game", "win"],
            &["game", "loss"],
            &["game", "win"],
        ]);

        let mut tfidf = TfIdf::new().with_normalize(false);
        let dtm = tfidf.fit_transform(&documents);

        let game_idx = dtm.vocabulary["game"];
        let loss_idx = dtm.vocabulary["loss"];

        // "loss" appears in one document, "game" in all three
        assert!(dtm.matrix[1][loss_idx] > dtm.matrix[1][game_idx]);
    }

    #[test]
    fn test_tfidf_l2_normalized() {
        let documents = docs(&[&["up", "down", "up"], &["down", "flat"]]);

        let mut tfidf = TfIdf::new();
        let dtm = tfidf.fit_transform(&documents);

        for row in &dtm.matrix {
            let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_document_is_zero_vector() {
        let documents = docs(&[&["word"]]);

        let mut tfidf = TfIdf::new();
        tfidf.fit(&documents);

        let vector = tfidf.transform(&[]);
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_deterministic_vocabulary_order() {
        let documents = docs(&[&["b", "a", "c"]]);

        let mut bow = BagOfWords::new().with_min_df(1);
        bow.fit(&documents);

        // Sorted order regardless of discovery order
        assert_eq!(bow.vocabulary()["a"], 0);
        assert_eq!(bow.vocabulary()["b"], 1);
        assert_eq!(bow.vocabulary()["c"], 2);
    }
}
