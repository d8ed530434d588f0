//! # Twitter Sentiment Classification
//!
//! Trains several binary text classifiers over bag-of-words / TF-IDF
//! features from a labeled tweet dataset, combines them with a
//! majority-vote ensemble, and classifies a live tweet stream.
//!
//! ## Modules
//!
//! - `data` - Dataset types, loading and filtering
//! - `nlp` - Tokenization, preprocessing and vectorization
//! - `models` - Classifiers (Naive Bayes, logistic regression, SGD, SVM)
//! - `ml` - Cross-validation, grid search and metrics
//! - `ensemble` - Majority-vote ensemble with confidence scoring
//! - `store` - Fitted-pipeline persistence
//! - `stream` - Live stream client, simulator and monitor

pub mod data;
pub mod ensemble;
pub mod ml;
pub mod models;
pub mod nlp;
pub mod store;
pub mod stream;

pub use data::{DataLoader, LabeledTweet, Sentiment};
pub use ensemble::{majority_vote, Vote, VotingEnsemble};
pub use models::{Classifier, Model};
pub use nlp::{BagOfWords, Preprocessor, TfIdf, Tokenizer, Vectorizer};
pub use store::ModelBundle;
pub use stream::{StreamMonitor, StreamSimulator, TweetStreamClient};
