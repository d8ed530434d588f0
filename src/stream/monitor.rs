//! Stream monitor
//!
//! Runs incoming tweets through the fitted pipeline, appends one
//! `label,confidence` line per tweet to the output file, and keeps
//! running counts for the terminal summary. Per-tweet failures are
//! logged and skipped; the stream keeps flowing.

use super::StreamMessage;
use crate::data::Sentiment;
use crate::ensemble::Vote;
use crate::store::ModelBundle;
use anyhow::{Context, Result};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Running stream statistics
#[derive(Debug, Clone, Default)]
pub struct StreamSummary {
    /// Tweets classified
    pub total: usize,
    /// Classified positive
    pub positive: usize,
    /// Classified negative
    pub negative: usize,
    /// Tweets that failed classification
    pub errors: usize,
}

impl StreamSummary {
    /// Fraction of classified tweets that were positive
    pub fn positive_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.positive as f64 / self.total as f64
    }
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stream summary")?;
        writeln!(f, "==============")?;
        writeln!(f, "Classified: {}", self.total)?;
        writeln!(f, "Positive:   {}", self.positive)?;
        writeln!(f, "Negative:   {}", self.negative)?;
        writeln!(f, "Errors:     {}", self.errors)?;
        write!(f, "Positive ratio: {:.1}%", self.positive_ratio() * 100.0)
    }
}

/// Classifies a stream of tweets through a fitted bundle
pub struct StreamMonitor {
    bundle: ModelBundle,
    writer: BufWriter<File>,
    summary: StreamSummary,
}

impl StreamMonitor {
    /// Create a monitor appending to `output_path`.
    pub fn new<P: AsRef<Path>>(bundle: ModelBundle, output_path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&output_path)
            .with_context(|| format!("Failed to open output file: {:?}", output_path.as_ref()))?;

        Ok(Self {
            bundle,
            writer: BufWriter::new(file),
            summary: StreamSummary::default(),
        })
    }

    /// Classify one text, record the `label,confidence` line, update counts.
    pub fn process_text(&mut self, text: &str) -> Result<Vote> {
        let vote = self.bundle.classify(text)?;

        writeln!(self.writer, "{},{:.2}", vote.label, vote.confidence)?;
        self.writer.flush()?;

        self.summary.total += 1;
        match vote.label {
            Sentiment::Positive => self.summary.positive += 1,
            Sentiment::Negative => self.summary.negative += 1,
        }

        Ok(vote)
    }

    /// Current statistics
    pub fn summary(&self) -> &StreamSummary {
        &self.summary
    }

    /// Consume a stream until it disconnects or `limit` tweets have been
    /// classified.
    ///
    /// Classification failures and transport errors are logged and do not
    /// stop the loop.
    pub async fn run(
        &mut self,
        mut receiver: broadcast::Receiver<StreamMessage>,
        limit: Option<usize>,
    ) -> Result<StreamSummary> {
        loop {
            if let Some(limit) = limit {
                if self.summary.total >= limit {
                    info!(limit, "reached tweet limit");
                    break;
                }
            }

            match receiver.recv().await {
                Ok(StreamMessage::Tweet(tweet)) => match self.process_text(&tweet.text) {
                    Ok(vote) => {
                        info!(
                            id = tweet.id,
                            label = %vote.label,
                            confidence = vote.confidence,
                            "classified tweet"
                        );
                    }
                    Err(e) => {
                        warn!(id = tweet.id, error = %e, "failed to classify tweet");
                        self.summary.errors += 1;
                    }
                },
                Ok(StreamMessage::Connected) => {
                    info!("stream connected");
                }
                Ok(StreamMessage::Disconnected) => {
                    info!("stream disconnected");
                    break;
                }
                Ok(StreamMessage::Error(e)) => {
                    warn!(error = %e, "stream error");
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "receiver lagged, tweets dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }

        Ok(self.summary.clone())
    }
}
