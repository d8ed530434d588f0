//! Classifier implementations
//!
//! Four binary classifiers sharing one trait: multinomial Naive Bayes,
//! logistic regression, an SGD classifier, and a linear SVM. Labels are
//! encoded as 0.0 (negative) and 1.0 (positive) throughout.

mod logistic;
mod naive_bayes;
mod sgd;
mod svm;

pub use logistic::{LogisticRegression, Regularization};
pub use naive_bayes::MultinomialNb;
pub use sgd::{SgdClassifier, SgdLoss};
pub use svm::LinearSvm;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors shared by the classifiers
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Labels must be 0.0 or 1.0, got {0}")]
    InvalidLabel(f64),

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),
}

/// Common interface for the binary classifiers
pub trait Classifier {
    /// Fit on a feature matrix and a 0/1 label vector
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError>;

    /// Predict 0/1 labels for a batch of rows
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Predict the 0/1 label for one feature row
    fn predict_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError>;

    /// Short machine-readable name
    fn name(&self) -> &'static str;
}

/// Validate a label vector against the training matrix.
fn check_training_set(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    for &label in y.iter() {
        if label != 0.0 && label != 1.0 {
            return Err(ModelError::InvalidLabel(label));
        }
    }
    Ok(())
}

/// Serializable wrapper over the concrete classifiers.
///
/// Lets the ensemble and the grid search hold a heterogeneous set of
/// fitted models and persist them as one bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Model {
    NaiveBayes(MultinomialNb),
    Logistic(LogisticRegression),
    Sgd(SgdClassifier),
    Svm(LinearSvm),
}

impl Classifier for Model {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        match self {
            Model::NaiveBayes(m) => m.fit(x, y),
            Model::Logistic(m) => m.fit(x, y),
            Model::Sgd(m) => m.fit(x, y),
            Model::Svm(m) => m.fit(x, y),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        match self {
            Model::NaiveBayes(m) => m.predict(x),
            Model::Logistic(m) => m.predict(x),
            Model::Sgd(m) => m.predict(x),
            Model::Svm(m) => m.predict(x),
        }
    }

    fn predict_row(&self, row: &ArrayView1<f64>) -> Result<f64, ModelError> {
        match self {
            Model::NaiveBayes(m) => m.predict_row(row),
            Model::Logistic(m) => m.predict_row(row),
            Model::Sgd(m) => m.predict_row(row),
            Model::Svm(m) => m.predict_row(row),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Model::NaiveBayes(m) => m.name(),
            Model::Logistic(m) => m.name(),
            Model::Sgd(m) => m.name(),
            Model::Svm(m) => m.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_check_training_set_rejects_empty() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            check_training_set(&x, &y),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_check_training_set_rejects_bad_labels() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![0.0, 2.0];
        assert!(matches!(
            check_training_set(&x, &y),
            Err(ModelError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_check_training_set_rejects_length_mismatch() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![0.0];
        assert!(matches!(
            check_training_set(&x, &y),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_model_names() {
        assert_eq!(Model::NaiveBayes(MultinomialNb::new()).name(), "naive_bayes");
        assert_eq!(
            Model::Logistic(LogisticRegression::default()).name(),
            "logistic_regression"
        );
        assert_eq!(Model::Sgd(SgdClassifier::default()).name(), "sgd");
        assert_eq!(Model::Svm(LinearSvm::default()).name(), "linear_svm");
    }
}
