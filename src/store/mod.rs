//! Model persistence
//!
//! A fitted pipeline (tokenizer, preprocessor, vectorizer, ensemble) is
//! saved to disk as one JSON bundle and reloaded for classification.

use crate::ensemble::{EnsembleError, Vote, VotingEnsemble};
use crate::nlp::{Preprocessor, TfIdf, Tokenizer, Vectorizer};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Fitted pipeline bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Tweet tokenizer configuration
    pub tokenizer: Tokenizer,
    /// Stopword/stemming configuration
    pub preprocessor: Preprocessor,
    /// Fitted TF-IDF vectorizer
    pub vectorizer: TfIdf,
    /// Fitted voting ensemble
    pub ensemble: VotingEnsemble,
    /// When the bundle was trained
    pub trained_at: DateTime<Utc>,
}

impl ModelBundle {
    pub fn new(
        tokenizer: Tokenizer,
        preprocessor: Preprocessor,
        vectorizer: TfIdf,
        ensemble: VotingEnsemble,
    ) -> Self {
        Self {
            tokenizer,
            preprocessor,
            vectorizer,
            ensemble,
            trained_at: Utc::now(),
        }
    }

    /// Run one text through the full pipeline and vote.
    pub fn classify(&self, text: &str) -> Result<Vote, EnsembleError> {
        let features = self.features(text);
        let row = ndarray::Array1::from_vec(features);
        self.ensemble.vote_row(&row.view())
    }

    /// Tokenize, preprocess and vectorize one text.
    pub fn features(&self, text: &str) -> Vec<f64> {
        let tokens = self.tokenizer.tokenize_to_strings(text);
        let processed = self.preprocessor.apply(&tokens);
        self.vectorizer.transform(&processed)
    }

    /// Vectorize a batch of texts into a feature matrix.
    pub fn feature_matrix(&self, texts: &[String]) -> Array2<f64> {
        let n_terms = self.vectorizer.vocabulary().len();
        let mut matrix = Array2::<f64>::zeros((texts.len(), n_terms));

        for (i, text) in texts.iter().enumerate() {
            for (j, value) in self.features(text).into_iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }

        matrix
    }

    /// Save the bundle as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create model file: {:?}", path.as_ref()))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, self)?;

        Ok(())
    }

    /// Load a bundle from JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open model file: {:?}", path.as_ref()))?;

        let reader = BufReader::new(file);
        let bundle = serde_json::from_reader(reader)?;

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sentiment;
    use crate::data::{label_vector, LabeledTweet};
    use tempfile::tempdir;

    fn trained_bundle() -> ModelBundle {
        let tweets = vec![
            LabeledTweet {
                id: 1,
                sentiment: Sentiment::Positive,
                text: "love this great game".to_string(),
            },
            LabeledTweet {
                id: 2,
                sentiment: Sentiment::Positive,
                text: "great win love it".to_string(),
            },
            LabeledTweet {
                id: 3,
                sentiment: Sentiment::Negative,
                text: "hate this awful loss".to_string(),
            },
            LabeledTweet {
                id: 4,
                sentiment: Sentiment::Negative,
                text: "awful game hate it".to_string(),
            },
        ];

        let tokenizer = Tokenizer::new();
        let preprocessor = Preprocessor::new().with_stemming(false);

        let documents: Vec<Vec<String>> = tweets
            .iter()
            .map(|t| preprocessor.apply(&tokenizer.tokenize_to_strings(&t.text)))
            .collect();

        let mut vectorizer = TfIdf::new();
        let dtm = vectorizer.fit_transform(&documents);

        let x = dtm.to_array();
        let y = label_vector(&tweets);

        let mut ensemble = VotingEnsemble::with_default_members();
        ensemble.fit(&x, &y).unwrap();

        ModelBundle::new(tokenizer, preprocessor, vectorizer, ensemble)
    }

    #[test]
    fn test_classify_through_pipeline() {
        let bundle = trained_bundle();

        let vote = bundle.classify("love this win").unwrap();
        assert_eq!(vote.label, Sentiment::Positive);

        let vote = bundle.classify("awful hate").unwrap();
        assert_eq!(vote.label, Sentiment::Negative);
    }

    #[test]
    fn test_save_load_round_trip_preserves_predictions() {
        let bundle = trained_bundle();
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        bundle.save(&path).unwrap();
        let loaded = ModelBundle::load(&path).unwrap();

        let texts = ["love this", "hate this", "great game", "awful loss"];
        for text in texts {
            let before = bundle.classify(text).unwrap();
            let after = loaded.classify(text).unwrap();

            assert_eq!(before.label, after.label);
            assert!((before.confidence - after.confidence).abs() < 1e-12);
        }
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(ModelBundle::load("/nonexistent/model.json").is_err());
    }
}
