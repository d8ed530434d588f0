//! SGD classifier
//!
//! Stochastic gradient descent over shuffled epochs with hinge or log
//! loss and an inverse-scaling learning-rate schedule.

use super::{check_training_set, Classifier, ModelError};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

/// Loss function for the SGD classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SgdLoss {
    /// Hinge loss (linear SVM objective)
    Hinge,
    /// Log loss (logistic regression objective)
    Log,
}

/// Linear classifier trained with stochastic gradient descent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgdClassifier {
    /// Fitted weights
    weights: Option<Array1<f64>>,
    /// Bias term
    bias: f64,
    /// Loss function
    loss: SgdLoss,
    /// Initial learning rate
    eta0: f64,
    /// Inverse-scaling exponent: eta = eta0 / t^power_t
    power_t: f64,
    /// L2 regularization strength
    alpha: f64,
    /// Training epochs
    epochs: usize,
}

impl SgdClassifier {
    pub fn new(loss: SgdLoss, eta0: f64, alpha: f64, epochs: usize) -> Self {
        Self {
            weights: None,
            bias: 0.0,
            loss,
            eta0,
            power_t: 0.5,
            alpha,
            epochs,
        }
    }

    /// Set the inverse-scaling exponent
    pub fn with_power_t(mut self, power_t: f64) -> Self {
        self.power_t = power_t;
        self
    }

    pub fn loss(&self) -> SgdLoss {
        self.loss
    }

    /// Raw linear score for one row
    fn score_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;

        if row.len() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: row.len(),
            });
        }

        Ok(row.dot(weights) + self.bias)
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }
}

impl Default for SgdClassifier {
    fn default() -> Self {
        Self::new(SgdLoss::Hinge, 0.1, 1e-4, 20)
    }
}

impl Classifier for SgdClassifier {
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
                let eta = self.eta0 / (t as f64).powf(self.power_t);

                // L2 shrinkage applies every step
                weights *= 1.0 - eta * self.alpha;

                match self.loss {
                    SgdLoss::Hinge => {
                        // Labels in {-1, +1} for the margin
                        let target = 2.0 * y[i] - 1.0;
                        let margin = target * (row.dot(&weights) + bias);

                        if margin < 1.0 {
                            weights = &weights + &(&row * (eta * target));
                            bias += eta * target;
                        }
                    }
                    SgdLoss::Log => {
                        let p = Self::sigmoid(row.dot(&weights) + bias);
                        let error = p - y[i];

                        weights = &weights - &(&row * (eta * error));
                        bias -= eta * error;
                    }
                }

                t += 1;
            }
        }

        self.weights = Some(weights);
        self.bias = bias;

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let mut predictions = Array1::<f64>::zeros(x.nrows());

        for (i, row) in x.rows().into_iter().enumerate() {
            predictions[i] = self.predict_row(&row)?;
        }

        Ok(predictions)
    }

    fn predict_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError> {
        let score = self.score_row(row)?;
        Ok(if score >= 0.0 { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &'static str {
        "sgd"
    }
}
