//! Model selection: cross-validation, grid search and metrics

mod cross_validation;
mod grid_search;
mod metrics;

pub use cross_validation::{cross_validate, CrossValidator, CvScores, CVSplit};
pub use grid_search::{
    default_grid, logistic_grid, naive_bayes_grid, sgd_grid, svm_grid, Candidate,
    CandidateScore, GridSearch, GridSearchReport,
};
pub use metrics::Metrics;
