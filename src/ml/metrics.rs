//! Evaluation metrics for the classifiers
//!
//! Accuracy, precision, recall, F1 and the confusion matrix for binary
//! labels encoded as 0.0/1.0.

use ndarray::Array1;

/// Metrics calculator
pub struct Metrics;

impl Metrics {
    /// Accuracy: (correct predictions) / (total predictions)
    pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        assert_eq!(y_true.len(), y_pred.len(), "Arrays must have same length");

        if y_true.is_empty() {
            return 0.0;
        }

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (*t - *p).abs() < 1e-10)
            .count();

        correct as f64 / y_true.len() as f64
    }

    /// Precision: TP / (TP + FP)
    pub fn precision(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let (tp, fp, _, _) = Self::confusion_values(y_true, y_pred);

        if tp + fp == 0 {
            0.0
        } else {
            tp as f64 / (tp + fp) as f64
        }
    }

    /// Recall: TP / (TP + FN)
    pub fn recall(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let (tp, _, fn_, _) = Self::confusion_values(y_true, y_pred);

        if tp + fn_ == 0 {
            0.0
        } else {
            tp as f64 / (tp + fn_) as f64
        }
    }

    /// F1: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let precision = Self::precision(y_true, y_pred);
        let recall = Self::recall(y_true, y_pred);

        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }

    /// Confusion matrix values (TP, FP, FN, TN) with 1.0 as the positive class
    pub fn confusion_values(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
    ) -> (usize, usize, usize, usize) {
        let mut tp = 0;
        let mut fp = 0;
        let mut fn_ = 0;
        let mut tn = 0;

        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            let is_true_positive = (*t - 1.0).abs() < 1e-10;
            let is_pred_positive = (*p - 1.0).abs() < 1e-10;

            match (is_true_positive, is_pred_positive) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => tn += 1,
            }
        }

        (tp, fp, fn_, tn)
    }

    /// Printable classification report
    pub fn classification_report(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> String {
        let (tp, fp, fn_, tn) = Self::confusion_values(y_true, y_pred);

        let mut report = String::new();
        report.push_str("Classification Report\n");
        report.push_str("=====================\n\n");
        report.push_str(&format!(
            "Accuracy:  {:.4}\n",
            Self::accuracy(y_true, y_pred)
        ));
        report.push_str(&format!(
            "Precision: {:.4}\n",
            Self::precision(y_true, y_pred)
        ));
        report.push_str(&format!("Recall:    {:.4}\n", Self::recall(y_true, y_pred)));
        report.push_str(&format!(
            "F1 score:  {:.4}\n\n",
            Self::f1_score(y_true, y_pred)
        ));
        report.push_str("Confusion matrix (rows: actual, cols: predicted)\n");
        report.push_str(&format!(
            "             negative  positive\n  negative  {:>8}  {:>8}\n  positive  {:>8}  {:>8}\n",
            tn, fp, fn_, tp
        ));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        let y_true = array![1.0, 0.0, 1.0, 0.0];
        let y_pred = array![1.0, 0.0, 0.0, 0.0];

        assert!((Metrics::accuracy(&y_true, &y_pred) - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_perfect_predictions() {
        let y = array![1.0, 0.0, 1.0];

        assert_eq!(Metrics::accuracy(&y, &y), 1.0);
        assert_eq!(Metrics::precision(&y, &y), 1.0);
        assert_eq!(Metrics::recall(&y, &y), 1.0);
        assert_eq!(Metrics::f1_score(&y, &y), 1.0);
    }

    #[test]
    fn test_precision_and_recall() {
        // 1 TP, 1 FP, 1 FN, 1 TN
        let y_true = array![1.0, 0.0, 1.0, 0.0];
        let y_pred = array![1.0, 1.0, 0.0, 0.0];

        assert!((Metrics::precision(&y_true, &y_pred) - 0.5).abs() < 1e-10);
        assert!((Metrics::recall(&y_true, &y_pred) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_no_positive_predictions() {
        let y_true = array![1.0, 1.0];
        let y_pred = array![0.0, 0.0];

        assert_eq!(Metrics::precision(&y_true, &y_pred), 0.0);
        assert_eq!(Metrics::recall(&y_true, &y_pred), 0.0);
        assert_eq!(Metrics::f1_score(&y_true, &y_pred), 0.0);
    }

    #[test]
    fn test_confusion_values() {
        let y_true = array![1.0, 0.0, 1.0, 0.0, 1.0];
        let y_pred = array![1.0, 1.0, 0.0, 0.0, 1.0];

        let (tp, fp, fn_, tn) = Metrics::confusion_values(&y_true, &y_pred);
        assert_eq!((tp, fp, fn_, tn), (2, 1, 1, 1));
    }

    #[test]
    fn test_report_contains_sections() {
        let y_true = array![1.0, 0.0];
        let y_pred = array![1.0, 0.0];

        let report = Metrics::classification_report(&y_true, &y_pred);
        assert!(report.contains("Accuracy"));
        assert!(report.contains("Confusion matrix"));
    }
}
