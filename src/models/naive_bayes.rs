//! Multinomial Naive Bayes
//!
//! Works on term-count or TF-IDF feature matrices; probabilities are kept
//! in log space for numerical stability.

use super::{check_training_set, Classifier, ModelError};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Multinomial Naive Bayes classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Laplace smoothing parameter
    alpha: f64,
    /// Log prior per class, index 0 = negative, 1 = positive
    class_log_prior: Option<Array1<f64>>,
    /// Log P(term | class), shape (2, n_features)
    feature_log_prob: Option<Array2<f64>>,
}

impl MultinomialNb {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            class_log_prior: None,
            feature_log_prob: None,
        }
    }

    /// Set the smoothing parameter
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Per-class probabilities for one row, softmax-normalized.
    ///
    /// Returns `[p_negative, p_positive]`.
    pub fn predict_proba_row(&self, row: &ArrayView1<f64>) -> Result<[f64; 2], ModelError> {
        let scores = self.joint_log_likelihood(row)?;

        let max_score = scores[0].max(scores[1]);
        let exp: [f64; 2] = [(scores[0] - max_score).exp(), (scores[1] - max_score).exp()];
        let sum = exp[0] + exp[1];

        Ok([exp[0] / sum, exp[1] / sum])
    }

    /// Unnormalized log P(class) + sum log P(term|class) for one row.
    fn joint_log_likelihood(&self, row: &ArrayView1<f64>) -> Result<[f64; 2], ModelError> {
        let prior = self.class_log_prior.as_ref().ok_or(ModelError::NotFitted)?;
        let log_prob = self.feature_log_prob.as_ref().ok_or(ModelError::NotFitted)?;

        if row.len() != log_prob.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: log_prob.ncols(),
                got: row.len(),
            });
        }

        let mut scores = [prior[0], prior[1]];
        for class in 0..2 {
            scores[class] += row.dot(&log_prob.row(class));
        }

        Ok(scores)
    }
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for MultinomialNb {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_set(x, y)?;

        let n_features = x.ncols();
        let n_samples = y.len() as f64;

        // Class counts and per-class feature sums
        let mut class_counts = [0.0f64; 2];
        let mut feature_counts = Array2::<f64>::zeros((2, n_features));

        for (row, &label) in x.axis_iter(Axis(0)).zip(y.iter()) {
            let class = label as usize;
            class_counts[class] += 1.0;

            let mut target = feature_counts.row_mut(class);
            target += &row;
        }

        let mut class_log_prior = Array1::<f64>::zeros(2);
        let mut feature_log_prob = Array2::<f64>::zeros((2, n_features));

        for class in 0..2 {
            // An absent class keeps a vanishing prior instead of -inf
            let prior = (class_counts[class].max(f64::MIN_POSITIVE)) / n_samples;
            class_log_prior[class] = prior.ln();

            let total: f64 = feature_counts.row(class).sum();
            let denominator = total + self.alpha * n_features as f64;

            for feature in 0..n_features {
                let count = feature_counts[[class, feature]];
                feature_log_prob[[class, feature]] = ((count + self.alpha) / denominator).ln();
            }
        }

        self.class_log_prior = Some(class_log_prior);
        self.feature_log_prob = Some(feature_log_prob);

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let mut predictions = Array1::<f64>::zeros(x.nrows());

        for (i, row) in x.axis_iter(Axis(0)).enumerate() {
            predictions[i] = self.predict_row(&row)?;
        }

        Ok(predictions)
    }

    fn predict_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError> {
        let scores = self.joint_log_likelihood(row)?;
        Ok(if scores[1] > scores[0] { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &'static str {
        "naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // Columns: good, great, bad, terrible
    fn training_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [2.0, 1.0, 0.0, 0.0],
            [1.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 1.0],
            [0.0, 0.0, 1.0, 2.0],
        ];
        let y = array![1.0, 1.0, 0.0, 0.0];
        (x, y)
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = training_data();

        let mut nb = MultinomialNb::new();
        nb.fit(&x, &y).unwrap();

        let test = array![[1.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 1.0]];
        let predictions = nb.predict(&test).unwrap();

        assert_eq!(predictions[0], 1.0);
        assert_eq!(predictions[1], 0.0);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let (x, y) = training_data();

        let mut nb = MultinomialNb::new();
        nb.fit(&x, &y).unwrap();

        let row = array![1.0, 0.0, 1.0, 0.0];
        let proba = nb.predict_proba_row(&row.view()).unwrap();

        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_positive_evidence_raises_positive_proba() {
        let (x, y) = training_data();

        let mut nb = MultinomialNb::new();
        nb.fit(&x, &y).unwrap();

        let positive_row = array![2.0, 2.0, 0.0, 0.0];
        let proba = nb.predict_proba_row(&positive_row.view()).unwrap();

        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let nb = MultinomialNb::new();
        let x = array![[1.0, 0.0]];

        assert!(matches!(nb.predict(&x), Err(ModelError::NotFitted)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let (x, y) = training_data();

        let mut nb = MultinomialNb::new();
        nb.fit(&x, &y).unwrap();

        let wrong = array![[1.0, 0.0]];
        assert!(matches!(
            nb.predict(&wrong),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_smoothing_handles_unseen_terms() {
        let (x, y) = training_data();

        let mut nb = MultinomialNb::new().with_alpha(1.0);
        nb.fit(&x, &y).unwrap();

        // A term never seen with the positive class must not zero out the score
        let row = array![1.0, 0.0, 1.0, 0.0];
        let proba = nb.predict_proba_row(&row.view()).unwrap();

        assert!(proba[0].is_finite() && proba[1].is_finite());
        assert!(proba[0] > 0.0 && proba[1] > 0.0);
    }
}
