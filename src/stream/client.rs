//! WebSocket tweet stream client
//!
//! Connects to a line-oriented JSON tweet feed and fans incoming tweets
//! out over a broadcast channel. Transport errors are reported as
//! messages; consumers decide whether to keep listening.

use super::{StreamMessage, StreamTweet};
use anyhow::Result;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

/// WebSocket client for a live tweet feed
pub struct TweetStreamClient {
    sender: broadcast::Sender<StreamMessage>,
    is_connected: Arc<RwLock<bool>>,
}

impl TweetStreamClient {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self {
            sender,
            is_connected: Arc::new(RwLock::new(false)),
        }
    }

    /// Subscribe to receive messages
    pub fn subscribe(&self) -> broadcast::Receiver<StreamMessage> {
        self.sender.subscribe()
    }

    /// Check if connected
    pub async fn is_connected(&self) -> bool {
        *self.is_connected.read().await
    }

    /// Connect to the feed and spawn the read loop.
    ///
    /// Text frames are parsed as one JSON tweet each; frames that do not
    /// parse are skipped. Read errors become `StreamMessage::Error` and
    /// the loop keeps going until the peer closes.
    pub async fn connect(&self, url: &str) -> Result<()> {
        let (ws_stream, _) = connect_async(url).await?;
        let (_write, mut read) = ws_stream.split();

        {
            let mut connected = self.is_connected.write().await;
            *connected = true;
        }
        let _ = self.sender.send(StreamMessage::Connected);

        let sender = self.sender.clone();
        let is_connected = self.is_connected.clone();

        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<StreamTweet>(&text) {
                            Ok(tweet) => {
                                let _ = sender.send(StreamMessage::Tweet(tweet));
                            }
                            Err(e) => {
                                debug!(error = %e, "skipping unparseable frame");
                            }
                        }
                    }
                    Ok(Message::Ping(data)) => {
                        debug!("received ping: {:?}", data);
                    }
                    Ok(Message::Close(_)) => {
                        let mut connected = is_connected.write().await;
                        *connected = false;
                        let _ = sender.send(StreamMessage::Disconnected);
                        break;
                    }
                    Err(e) => {
                        let _ = sender.send(StreamMessage::Error(e.to_string()));
                    }
                    _ => {}
                }
            }
        });

        Ok(())
    }
}

impl Default for TweetStreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_starts_disconnected() {
        let client = TweetStreamClient::new();
        assert!(!client.is_connected().await);
    }

    #[tokio::test]
    async fn test_subscribe_before_connect() {
        let client = TweetStreamClient::new();
        let mut rx = client.subscribe();

        // Nothing sent yet
        assert!(rx.try_recv().is_err());
    }
}
