//! Dataset loading and saving utilities
//!
//! Loads the labeled tweet table from CSV or JSON, filters it down to the
//! binary labels the classifiers understand, and produces shuffled
//! train/test splits.

use super::types::{LabeledTweet, Sentiment};
use anyhow::{bail, Context, Result};
use csv::{Reader, Writer};
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Raw CSV row: `(id, label, text)` with the label still unparsed
#[derive(Debug, Deserialize, Serialize)]
struct RawRecord {
    id: u64,
    label: String,
    text: String,
}

/// Data loader for the labeled tweet table
pub struct DataLoader;

impl DataLoader {
    /// Load tweets from a CSV file.
    ///
    /// Rows whose label is not a binary sentiment are dropped, so the
    /// result upholds the invariant that every label is positive or
    /// negative.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledTweet>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        let mut reader = Reader::from_reader(file);
        let mut tweets = Vec::new();
        let mut dropped = 0usize;

        for result in reader.deserialize() {
            let record: RawRecord = result.context("Failed to parse dataset row")?;

            match Sentiment::parse_label(&record.label) {
                Some(sentiment) => tweets.push(LabeledTweet {
                    id: record.id,
                    sentiment,
                    text: record.text,
                }),
                None => dropped += 1,
            }
        }

        debug!(kept = tweets.len(), dropped, "loaded dataset");
        Ok(tweets)
    }

    /// Save tweets to a CSV file.
    pub fn save_csv<P: AsRef<Path>>(tweets: &[LabeledTweet], path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;

        let mut writer = Writer::from_writer(file);

        for tweet in tweets {
            writer.serialize(RawRecord {
                id: tweet.id,
                label: tweet.sentiment.as_str().to_string(),
                text: tweet.text.clone(),
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load tweets from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledTweet>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        let tweets: Vec<LabeledTweet> = serde_json::from_reader(file)?;
        Ok(tweets)
    }

    /// Save tweets to a JSON file.
    pub fn save_json<P: AsRef<Path>>(tweets: &[LabeledTweet], path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;

        serde_json::to_writer_pretty(file, tweets)?;
        Ok(())
    }

    /// Shuffled train/test split.
    ///
    /// `test_ratio` is the fraction of rows held out for testing and must
    /// be in (0, 1).
    pub fn train_test_split(
        tweets: &[LabeledTweet],
        test_ratio: f64,
    ) -> Result<(Vec<LabeledTweet>, Vec<LabeledTweet>)> {
        if tweets.is_empty() {
            bail!("Cannot split an empty dataset");
        }
        if !(0.0..1.0).contains(&test_ratio) || test_ratio == 0.0 {
            bail!("test_ratio must be in (0, 1), got {}", test_ratio);
        }

        let mut shuffled: Vec<LabeledTweet> = tweets.to_vec();
        shuffled.shuffle(&mut thread_rng());

        let n_test = ((tweets.len() as f64) * test_ratio).round() as usize;
        let n_test = n_test.clamp(1, tweets.len() - 1);

        let train = shuffled.split_off(n_test);
        Ok((train, shuffled))
    }

    /// Count positive and negative rows for class-balance reporting.
    pub fn label_counts(tweets: &[LabeledTweet]) -> (usize, usize) {
        let positive = tweets
            .iter()
            .filter(|t| t.sentiment == Sentiment::Positive)
            .count();
        (positive, tweets.len() - positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_tweets() -> Vec<LabeledTweet> {
        vec![
            LabeledTweet {
                id: 1,
                sentiment: Sentiment::Positive,
                text: "loving this".to_string(),
            },
            LabeledTweet {
                id: 2,
                sentiment: Sentiment::Negative,
                text: "worst day ever".to_string(),
            },
            LabeledTweet {
                id: 3,
                sentiment: Sentiment::Positive,
                text: "great stuff".to_string(),
            },
            LabeledTweet {
                id: 4,
                sentiment: Sentiment::Negative,
                text: "so annoyed".to_string(),
            },
        ]
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tweets.csv");

        DataLoader::save_csv(&sample_tweets(), &path).unwrap();
        let loaded = DataLoader::load_csv(&path).unwrap();

        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[1].sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_non_binary_rows_are_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,label,text").unwrap();
        writeln!(file, "1,positive,nice").unwrap();
        writeln!(file, "2,neutral,meh").unwrap();
        writeln!(file, "3,negative,ugh").unwrap();
        writeln!(file, "4,irrelevant,spam").unwrap();

        let loaded = DataLoader::load_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded
            .iter()
            .all(|t| matches!(t.sentiment, Sentiment::Positive | Sentiment::Negative)));
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tweets.json");

        DataLoader::save_json(&sample_tweets(), &path).unwrap();
        let loaded = DataLoader::load_json(&path).unwrap();

        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[2].text, "great stuff");
    }

    #[test]
    fn test_train_test_split_sizes() {
        let tweets = sample_tweets();
        let (train, test) = DataLoader::train_test_split(&tweets, 0.25).unwrap();

        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn test_split_rejects_empty_dataset() {
        assert!(DataLoader::train_test_split(&[], 0.2).is_err());
    }

    #[test]
    fn test_label_counts() {
        let (positive, negative) = DataLoader::label_counts(&sample_tweets());
        assert_eq!(positive, 2);
        assert_eq!(negative, 2);
    }
}
