//! Linear support vector machine
//!
//! Pegasos-style subgradient training of a soft-margin linear SVM.

use super::{check_training_set, Classifier, ModelError};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

/// Linear SVM classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvm {
    /// Fitted weights
    weights: Option<Array1<f64>>,
    /// Bias term
    bias: f64,
    /// Regularization parameter
    lambda: f64,
    /// Training epochs
    epochs: usize,
}

impl LinearSvm {
    pub fn new(lambda: f64, epochs: usize) -> Self {
        Self {
            weights: None,
            bias: 0.0,
            lambda,
            epochs,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Signed distance to the separating hyperplane, per row.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;

        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: x.ncols(),
            });
        }

        Ok(x.dot(weights) + self.bias)
    }
}

impl Default for LinearSvm {
    fn default() -> Self {
        Self::new(1e-3, 50)
    }
}

impl Classifier for LinearSvm {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_set(x, y)?;

        let n_features = x.ncols();
        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;

        let mut indices: Vec<usize> = (0..x.nrows()).collect();
        let mut rng = thread_rng();
        let mut t = 1u64;

        for _epoch in 0..self.epochs {
            indices.shuffle(&mut rng);

            for &i in &indices {
                let row = x.row(i);
                // Labels in {-1, +1} for the margin
                let target = 2.0 * y[i] - 1.0;

                // Schedule capped so the first steps stay bounded
                let eta = (1.0 / (self.lambda * t as f64)).min(1.0);
                let margin = target * (row.dot(&weights) + bias);

                if margin < 1.0 {
                    weights = &(&weights * (1.0 - eta * self.lambda)) + &(&row * (eta * target));
                    bias += eta * target;
                } else {
                    weights *= 1.0 - eta * self.lambda;
                }

                t += 1;
            }
        }

        self.weights = Some(weights);
        self.bias = bias;

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let scores = self.decision_function(x)?;
        Ok(scores.mapv(|s| if s >= 0.0 { 1.0 } else { 0.0 }))
    }

    fn predict_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;

        if row.len() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: row.len(),
            });
        }

        let score = row.dot(weights) + self.bias;
        Ok(if score >= 0.0 { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &'static str {
        "linear_svm"
    }
}
