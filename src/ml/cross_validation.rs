//! Cross-validation utilities for model selection
//!
//! Includes:
//! - K-Fold cross-validation
//! - Stratified K-Fold (preserves class ratios per fold)
//! - A driver that scores any classifier over a set of splits

use crate::models::{Classifier, Model, ModelError};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Cross-validation split
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Cross-validator
pub struct CrossValidator;

impl CrossValidator {
    /// K-Fold cross-validation splits
    ///
    /// # Arguments
    /// * `n_samples` - Total number of samples
    /// * `n_folds` - Number of folds
    /// * `shuffle` - Whether to shuffle indices
    pub fn k_fold(n_samples: usize, n_folds: usize, shuffle: bool) -> Vec<CVSplit> {
        assert!(n_folds > 1, "n_folds must be > 1");
        assert!(n_samples >= n_folds, "n_samples must be >= n_folds");

        let mut indices: Vec<usize> = (0..n_samples).collect();

        if shuffle {
            let mut rng = thread_rng();
            indices.shuffle(&mut rng);
        }

        Self::deal_folds(indices, n_folds)
    }

    /// Stratified K-Fold splits.
    ///
    /// Indices are grouped by label and dealt round-robin, so each fold's
    /// class ratio matches the full dataset to within rounding.
    pub fn stratified_k_fold(y: &Array1<f64>, n_folds: usize) -> Vec<CVSplit> {
        assert!(n_folds > 1, "n_folds must be > 1");
        assert!(y.len() >= n_folds, "n_samples must be >= n_folds");

        let mut positive: Vec<usize> = Vec::new();
        let mut negative: Vec<usize> = Vec::new();

        for (i, &label) in y.iter().enumerate() {
            if label == 1.0 {
                positive.push(i);
            } else {
                negative.push(i);
            }
        }

        let mut rng = thread_rng();
        positive.shuffle(&mut rng);
        negative.shuffle(&mut rng);

        // Deal each class round-robin across the folds
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); n_folds];
        for (i, &idx) in positive.iter().chain(negative.iter()).enumerate() {
            folds[i % n_folds].push(idx);
        }

        Self::splits_from_folds(folds)
    }

    fn deal_folds(indices: Vec<usize>, n_folds: usize) -> Vec<CVSplit> {
        let n_samples = indices.len();
        let fold_size = n_samples / n_folds;
        let remainder = n_samples % n_folds;

        let mut folds: Vec<Vec<usize>> = Vec::with_capacity(n_folds);
        let mut start = 0;

        for fold in 0..n_folds {
            // The first `remainder` folds take one extra sample
            let size = fold_size + usize::from(fold < remainder);
            folds.push(indices[start..start + size].to_vec());
            start += size;
        }

        Self::splits_from_folds(folds)
    }

    fn splits_from_folds(folds: Vec<Vec<usize>>) -> Vec<CVSplit> {
        (0..folds.len())
            .map(|test_fold| {
                let test_indices = folds[test_fold].clone();
                let train_indices = folds
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != test_fold)
                    .flat_map(|(_, fold)| fold.iter().copied())
                    .collect();

                CVSplit {
                    train_indices,
                    test_indices,
                }
            })
            .collect()
    }
}

/// Per-fold accuracies from a cross-validation run
#[derive(Debug, Clone)]
pub struct CvScores {
    pub fold_accuracies: Vec<f64>,
}

impl CvScores {
    pub fn mean(&self) -> f64 {
        if self.fold_accuracies.is_empty() {
            return 0.0;
        }
        self.fold_accuracies.iter().sum::<f64>() / self.fold_accuracies.len() as f64
    }

    pub fn std(&self) -> f64 {
        let n = self.fold_accuracies.len();
        if n < 2 {
            return 0.0;
        }

        let mean = self.mean();
        let variance = self
            .fold_accuracies
            .iter()
            .map(|a| (a - mean).powi(2))
            .sum::<f64>()
            / n as f64;

        variance.sqrt()
    }
}

/// Fit a fresh copy of `model` on each split's training rows and score
/// accuracy on its test rows.
pub fn cross_validate(
    model: &Model,
    x: &Array2<f64>,
    y: &Array1<f64>,
    splits: &[CVSplit],
) -> Result<CvScores, ModelError> {
    let mut fold_accuracies = Vec::with_capacity(splits.len());

    for split in splits {
        let x_train = x.select(Axis(0), &split.train_indices);
        let y_train = y.select(Axis(0), &split.train_indices);
        let x_test = x.select(Axis(0), &split.test_indices);
        let y_test = y.select(Axis(0), &split.test_indices);

        let mut fold_model = model.clone();
        fold_model.fit(&x_train, &y_train)?;

        let predictions = fold_model.predict(&x_test)?;
        let correct = predictions
            .iter()
            .zip(y_test.iter())
            .filter(|(&p, &t)| p == t)
            .count();

        fold_accuracies.push(correct as f64 / y_test.len() as f64);
    }

    Ok(CvScores { fold_accuracies })
}
