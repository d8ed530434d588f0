//! Logistic regression
//!
//! Batch gradient descent with optional L1/L2 regularization.

use super::{check_training_set, Classifier, ModelError};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Regularization type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Regularization {
    /// No regularization
    None,
    /// L1 (Lasso)
    L1(f64),
    /// L2 (Ridge)
    L2(f64),
}

/// Logistic regression classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients
    coefficients: Option<Array1<f64>>,
    /// Intercept term
    intercept: Option<f64>,
    /// Learning rate
    learning_rate: f64,
    /// Maximum iterations
    max_iter: usize,
    /// Convergence tolerance on the loss
    tolerance: f64,
    /// Regularization type
    regularization: Regularization,
    /// Log-loss per iteration during the last fit
    pub cost_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.1, 1000, 1e-6, Regularization::None)
    }
}

impl LogisticRegression {
    pub fn new(
        learning_rate: f64,
        max_iter: usize,
        tolerance: f64,
        regularization: Regularization,
    ) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            regularization,
            cost_history: Vec::new(),
        }
    }

    /// Create with L2 regularization, sklearn-style C (inverse strength)
    pub fn with_l2(c: f64) -> Self {
        Self::new(0.1, 1000, 1e-6, Regularization::L2(1.0 / c))
    }

    /// Create with L1 regularization, sklearn-style C (inverse strength)
    pub fn with_l1(c: f64) -> Self {
        Self::new(0.1, 1000, 1e-6, Regularization::L1(1.0 / c))
    }

    pub fn regularization(&self) -> Regularization {
        self.regularization
    }

    /// Numerically stable sigmoid
    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn sigmoid_array(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(Self::sigmoid)
    }

    /// Binary cross-entropy
    fn log_loss(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;

        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p_clipped = p.clamp(eps, 1.0 - eps);
                y * p_clipped.ln() + (1.0 - y) * (1.0 - p_clipped).ln()
            })
            .sum::<f64>()
            / n
    }

    /// Predict probabilities of the positive class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        Ok(Self::sigmoid_array(&self.decision_function(x)?))
    }

    /// Log-odds of the positive class
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;

        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: x.ncols(),
            });
        }

        Ok(x.dot(weights) + bias)
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_set(x, y)?;

        let n_samples = x.nrows() as f64;
        let n_features = x.ncols();

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;

        self.cost_history.clear();

        for iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid_array(&linear);

            let errors = &predictions - y;
            let mut dw = x.t().dot(&errors) / n_samples;
            let db = errors.sum() / n_samples;

            match self.regularization {
                Regularization::L2(alpha) => {
                    dw = &dw + &(&weights * alpha);
                }
                Regularization::L1(alpha) => {
                    let sign = weights.mapv(|w| {
                        if w > 0.0 {
                            1.0
                        } else if w < 0.0 {
                            -1.0
                        } else {
                            0.0
                        }
                    });
                    dw = &dw + &(&sign * alpha);
                }
                Regularization::None => {}
            }

            weights = &weights - &(&dw * self.learning_rate);
            bias -= self.learning_rate * db;

            let cost = Self::log_loss(y, &predictions);
            self.cost_history.push(cost);

            if iter > 0 {
                let cost_diff = (self.cost_history[iter - 1] - cost).abs();
                if cost_diff < self.tolerance {
                    debug!(iteration = iter, "converged");
                    break;
                }
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    fn predict_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError> {
        let weights = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;

        if row.len() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: row.len(),
            });
        }

        let p = Self::sigmoid(row.dot(weights) + bias);
        Ok(if p >= 0.5 { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [0.0, 0.0],
            [0.5, 0.5],
            [1.0, 1.0],
            [5.0, 5.0],
            [5.5, 5.5],
            [6.0, 6.0],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-10);
        assert!(LogisticRegression::sigmoid(100.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-100.0) < 0.01);
    }

    #[test]
    fn test_fit_separable() {
        let (x, y) = separable_data();

        let mut model = LogisticRegression::new(0.5, 1000, 1e-8, Regularization::None);
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();

        let accuracy: f64 = predictions
            .iter()
            .zip(y.iter())
            .filter(|(&p, &a)| (p - a).abs() < 0.5)
            .count() as f64
            / y.len() as f64;

        assert!(accuracy >= 0.8);
    }

    #[test]
    fn test_cost_decreases() {
        let (x, y) = separable_data();

        let mut model = LogisticRegression::new(0.1, 200, 0.0, Regularization::None);
        model.fit(&x, &y).unwrap();

        let first = model.cost_history.first().unwrap();
        let last = model.cost_history.last().unwrap();
        assert!(last < first);
    }

    #[test]
    fn test_l2_bounds_coefficients() {
        let (x, y) = separable_data();

        let mut model = LogisticRegression::with_l2(1.0);
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        let coef_norm: f64 = coef.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!(coef_norm < 10.0);
    }

    #[test]
    fn test_predict_row_matches_batch() {
        let (x, y) = separable_data();

        let mut model = LogisticRegression::default();
        model.fit(&x, &y).unwrap();

        let batch = model.predict(&x).unwrap();
        for (i, row) in x.rows().into_iter().enumerate() {
            assert_eq!(model.predict_row(&row).unwrap(), batch[i]);
        }
    }

    #[test]
    fn test_unfitted_fails() {
        let model = LogisticRegression::default();
        let x = array![[1.0, 0.0]];
        assert!(matches!(model.predict(&x), Err(ModelError::NotFitted)));
    }
}
