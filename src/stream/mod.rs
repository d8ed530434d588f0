//! Live tweet stream classification
//!
//! A WebSocket client receives tweet payloads and fans them out over a
//! broadcast channel; the monitor runs each text through the fitted
//! pipeline and appends `label,confidence` lines to an output file. A
//! simulator replays a saved dataset through the same path for offline
//! runs.

mod client;
mod monitor;
mod simulator;

pub use client::TweetStreamClient;
pub use monitor::{StreamMonitor, StreamSummary};
pub use simulator::StreamSimulator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tweet received from the stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamTweet {
    /// Tweet identifier (0 when the feed does not provide one)
    #[serde(default)]
    pub id: u64,
    /// Tweet text
    pub text: String,
    /// Receive timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Messages fanned out to stream consumers
#[derive(Debug, Clone)]
pub enum StreamMessage {
    Tweet(StreamTweet),
    Connected,
    Disconnected,
    Error(String),
}
