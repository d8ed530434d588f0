//! Hyperparameter grid search
//!
//! Exhaustively scores a set of candidate models with stratified
//! cross-validation. Ties on mean accuracy go to the first candidate in
//! grid order.

use super::cross_validation::{cross_validate, CrossValidator};
use crate::models::{
    Classifier, LinearSvm, LogisticRegression, Model, ModelError, MultinomialNb, Regularization,
    SgdClassifier, SgdLoss,
};
use ndarray::{Array1, Array2};
use tracing::info;

/// One candidate configuration to score
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Human-readable parameter description
    pub params: String,
    /// Unfitted model carrying those parameters
    pub model: Model,
}

impl Candidate {
    pub fn new(params: impl Into<String>, model: Model) -> Self {
        Self {
            params: params.into(),
            model,
        }
    }
}

/// Score of one candidate after cross-validation
#[derive(Debug, Clone)]
pub struct CandidateScore {
    pub name: &'static str,
    pub params: String,
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
}

/// Full grid-search report
#[derive(Debug, Clone)]
pub struct GridSearchReport {
    /// Scores in grid order
    pub scores: Vec<CandidateScore>,
    /// Index of the winning candidate
    pub best_index: usize,
}

impl GridSearchReport {
    pub fn best(&self) -> &CandidateScore {
        &self.scores[self.best_index]
    }
}

/// Exhaustive grid search over candidate models
pub struct GridSearch {
    n_folds: usize,
}

impl GridSearch {
    pub fn new(n_folds: usize) -> Self {
        Self { n_folds }
    }

    /// Cross-validate every candidate and pick the best mean accuracy.
    ///
    /// The winner is the first candidate to reach the maximal score, so
    /// ties resolve in grid order.
    pub fn search(
        &self,
        candidates: &[Candidate],
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<GridSearchReport, ModelError> {
        assert!(!candidates.is_empty(), "candidate grid must not be empty");

        let splits = CrossValidator::stratified_k_fold(y, self.n_folds);
        let mut scores = Vec::with_capacity(candidates.len());
        let mut best_index = 0;
        let mut best_accuracy = f64::NEG_INFINITY;

        for (i, candidate) in candidates.iter().enumerate() {
            let cv = cross_validate(&candidate.model, x, y, &splits)?;
            let mean = cv.mean();

            info!(
                model = candidate.model.name(),
                params = %candidate.params,
                accuracy = mean,
                "scored candidate"
            );

            if mean > best_accuracy {
                best_accuracy = mean;
                best_index = i;
            }

            scores.push(CandidateScore {
                name: candidate.model.name(),
                params: candidate.params.clone(),
                mean_accuracy: mean,
                std_accuracy: cv.std(),
            });
        }

        Ok(GridSearchReport { scores, best_index })
    }
}

/// Naive Bayes smoothing grid
pub fn naive_bayes_grid() -> Vec<Candidate> {
    [0.1, 0.5, 1.0, 2.0]
        .iter()
        .map(|&alpha| {
            Candidate::new(
                format!("alpha={}", alpha),
                Model::NaiveBayes(MultinomialNb::new().with_alpha(alpha)),
            )
        })
        .collect()
}

/// Logistic regression learning-rate x regularization grid
pub fn logistic_grid() -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for &lr in &[0.1, 0.5] {
        for &reg in &[Regularization::None, Regularization::L2(0.01), Regularization::L2(0.1)] {
            let params = match reg {
                Regularization::None => format!("lr={}, reg=none", lr),
                Regularization::L2(a) => format!("lr={}, l2={}", lr, a),
                Regularization::L1(a) => format!("lr={}, l1={}", lr, a),
            };
            candidates.push(Candidate::new(
                params,
                Model::Logistic(LogisticRegression::new(lr, 500, 1e-6, reg)),
            ));
        }
    }

    candidates
}

/// SGD loss x learning-rate grid
pub fn sgd_grid() -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for &loss in &[SgdLoss::Hinge, SgdLoss::Log] {
        for &eta0 in &[0.1, 0.5] {
            let loss_name = match loss {
                SgdLoss::Hinge => "hinge",
                SgdLoss::Log => "log",
            };
            candidates.push(Candidate::new(
                format!("loss={}, eta0={}", loss_name, eta0),
                Model::Sgd(SgdClassifier::new(loss, eta0, 1e-4, 20)),
            ));
        }
    }

    candidates
}

/// SVM regularization grid
pub fn svm_grid() -> Vec<Candidate> {
    [1e-4, 1e-3, 1e-2]
        .iter()
        .map(|&lambda| {
            Candidate::new(
                format!("lambda={}", lambda),
                Model::Svm(LinearSvm::new(lambda, 50)),
            )
        })
        .collect()
}

/// The full default grid across all four model families
pub fn default_grid() -> Vec<Candidate> {
    let mut candidates = naive_bayes_grid();
    candidates.extend(logistic_grid());
    candidates.extend(sgd_grid());
    candidates.extend(svm_grid());
    candidates
}
