//! Majority-vote ensemble
//!
//! Combines the fitted classifiers by plurality. The confidence of a vote
//! is the fraction of members agreeing with the winning label.

use crate::data::Sentiment;
use crate::models::{Classifier, Model, ModelError};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ensemble errors
#[derive(Error, Debug)]
pub enum EnsembleError {
    #[error("Ensemble has no members")]
    NoMembers,

    #[error("No outputs to vote on")]
    NoOutputs,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result of one majority vote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Winning label
    pub label: Sentiment,
    /// Fraction of members that agree with the winning label
    pub confidence: f64,
}

/// Majority vote over a set of member outputs.
///
/// Returns the label occurring most frequently; confidence is the modal
/// count divided by the number of outputs. Ties break toward the label
/// that reached the maximal count first in input order.
pub fn majority_vote(outputs: &[Sentiment]) -> Result<Vote, EnsembleError> {
    if outputs.is_empty() {
        return Err(EnsembleError::NoOutputs);
    }

    // Counts keyed in discovery order
    let mut counts: Vec<(Sentiment, usize)> = Vec::new();
    for &output in outputs {
        match counts.iter_mut().find(|(label, _)| *label == output) {
            Some((_, count)) => *count += 1,
            None => counts.push((output, 1)),
        }
    }

    let (mut label, mut best) = counts[0];
    for &(candidate, count) in &counts[1..] {
        if count > best {
            label = candidate;
            best = count;
        }
    }

    Ok(Vote {
        label,
        confidence: best as f64 / outputs.len() as f64,
    })
}

/// Majority-vote ensemble over the classifier models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingEnsemble {
    members: Vec<Model>,
}

impl VotingEnsemble {
    pub fn new(members: Vec<Model>) -> Self {
        Self { members }
    }

    /// The default four-member ensemble: NB, logistic regression, SGD, SVM.
    pub fn with_default_members() -> Self {
        use crate::models::{
            LinearSvm, LogisticRegression, MultinomialNb, SgdClassifier, SgdLoss,
        };

        Self::new(vec![
            Model::NaiveBayes(MultinomialNb::new()),
            Model::Logistic(LogisticRegression::default()),
            Model::Sgd(SgdClassifier::new(SgdLoss::Hinge, 0.1, 1e-4, 20)),
            Model::Svm(LinearSvm::default()),
        ])
    }

    pub fn members(&self) -> &[Model] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fit every member on the same training data.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), EnsembleError> {
        if self.members.is_empty() {
            return Err(EnsembleError::NoMembers);
        }

        for member in &mut self.members {
            member.fit(x, y)?;
        }

        Ok(())
    }

    /// Vote on one feature row.
    pub fn vote_row(&self, row: &ArrayView1<f64>) -> Result<Vote, EnsembleError> {
        if self.members.is_empty() {
            return Err(EnsembleError::NoMembers);
        }

        let mut outputs = Vec::with_capacity(self.members.len());
        for member in &self.members {
            outputs.push(Sentiment::from_f64(member.predict_row(row)?));
        }

        majority_vote(&outputs)
    }

    /// Vote on every row of a feature matrix.
    pub fn vote(&self, x: &Array2<f64>) -> Result<Vec<Vote>, EnsembleError> {
        x.axis_iter(Axis(0))
            .map(|row| self.vote_row(&row))
            .collect()
    }

    /// Ensemble predictions as a 0/1 label vector, for the metrics.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, EnsembleError> {
        let votes = self.vote(x)?;
        Ok(Array1::from_iter(
            votes.into_iter().map(|v| v.label.as_f64()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sentiment::{Negative, Positive};
    use ndarray::array;

    #[test]
    fn test_vote_returns_modal_label() {
        let vote = majority_vote(&[Positive, Negative, Positive]).unwrap();

        assert_eq!(vote.label, Positive);
    }

    #[test]
    fn test_confidence_is_modal_fraction() {
        let vote = majority_vote(&[Positive, Negative, Positive, Positive]).unwrap();

        assert!((vote.confidence - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_unanimous_vote() {
        let vote = majority_vote(&[Negative, Negative, Negative]).unwrap();

        assert_eq!(vote.label, Negative);
        assert_eq!(vote.confidence, 1.0);
    }

    #[test]
    fn test_tie_breaks_to_first_discovered() {
        // 2-2 tie: the first label seen wins
        let vote = majority_vote(&[Negative, Positive, Positive, Negative]).unwrap();
        assert_eq!(vote.label, Negative);
        assert_eq!(vote.confidence, 0.5);

        let vote = majority_vote(&[Positive, Negative, Negative, Positive]).unwrap();
        assert_eq!(vote.label, Positive);
    }

    #[test]
    fn test_permutation_invariant_without_tie() {
        let a = majority_vote(&[Positive, Positive, Negative]).unwrap();
        let b = majority_vote(&[Negative, Positive, Positive]).unwrap();
        let c = majority_vote(&[Positive, Negative, Positive]).unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_empty_outputs_rejected() {
        assert!(matches!(
            majority_vote(&[]),
            Err(EnsembleError::NoOutputs)
        ));
    }

    #[test]
    fn test_ensemble_fit_and_vote() {
        let x = array![
            [3.0, 0.0],
            [2.0, 0.0],
            [4.0, 1.0],
            [0.0, 3.0],
            [0.0, 2.0],
            [1.0, 4.0],
        ];
        let y = array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

        let mut ensemble = VotingEnsemble::with_default_members();
        ensemble.fit(&x, &y).unwrap();

        let positive_row = array![3.0, 0.0];
        let vote = ensemble.vote_row(&positive_row.view()).unwrap();

        assert_eq!(vote.label, Positive);
        assert!(vote.confidence >= 0.5);
        assert!(vote.confidence <= 1.0);
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        let x = array![[1.0, 0.0]];
        let y = array![1.0];

        let mut ensemble = VotingEnsemble::new(vec![]);
        assert!(matches!(
            ensemble.fit(&x, &y),
            Err(EnsembleError::NoMembers)
        ));
    }

    #[test]
    fn test_unfitted_member_propagates_error() {
        let ensemble = VotingEnsemble::with_default_members();
        let row = array![1.0, 0.0];

        assert!(matches!(
            ensemble.vote_row(&row.view()),
            Err(EnsembleError::Model(ModelError::NotFitted))
        ));
    }
}
