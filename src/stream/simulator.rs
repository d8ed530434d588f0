//! Stream simulator
//!
//! Replays a loaded dataset as a tweet stream, for exercising the monitor
//! without a live feed.

use super::{StreamMessage, StreamTweet};
use crate::data::LabeledTweet;
use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{sleep, Duration};

/// Replays saved tweets as a stream
#[derive(Debug)]
pub struct StreamSimulator {
    tweets: Vec<LabeledTweet>,
    position: usize,
}

impl StreamSimulator {
    pub fn new(tweets: Vec<LabeledTweet>) -> Self {
        Self {
            tweets,
            position: 0,
        }
    }

    /// Total number of tweets to replay
    pub fn total(&self) -> usize {
        self.tweets.len()
    }

    /// Remaining tweets
    pub fn remaining(&self) -> usize {
        self.tweets.len() - self.position
    }

    /// Next tweet in replay order, stamped with the current time.
    pub fn next_tweet(&mut self) -> Option<StreamTweet> {
        let tweet = self.tweets.get(self.position)?;
        self.position += 1;

        Some(StreamTweet {
            id: tweet.id,
            text: tweet.text.clone(),
            timestamp: Utc::now(),
        })
    }

    /// Replay everything into a broadcast channel, with an optional delay
    /// between tweets, then signal disconnection.
    pub async fn play(
        mut self,
        sender: broadcast::Sender<StreamMessage>,
        delay: Option<Duration>,
    ) {
        let _ = sender.send(StreamMessage::Connected);

        while let Some(tweet) = self.next_tweet() {
            let _ = sender.send(StreamMessage::Tweet(tweet));

            if let Some(delay) = delay {
                sleep(delay).await;
            }
        }

        let _ = sender.send(StreamMessage::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sentiment;

    fn tweets() -> Vec<LabeledTweet> {
        vec![
            LabeledTweet {
                id: 1,
                sentiment: Sentiment::Positive,
                text: "first".to_string(),
            },
            LabeledTweet {
                id: 2,
                sentiment: Sentiment::Negative,
                text: "second".to_string(),
            },
        ]
    }

    #[test]
    fn test_replay_order() {
        let mut simulator = StreamSimulator::new(tweets());

        assert_eq!(simulator.total(), 2);
        assert_eq!(simulator.next_tweet().unwrap().text, "first");
        assert_eq!(simulator.next_tweet().unwrap().text, "second");
        assert!(simulator.next_tweet().is_none());
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut simulator = StreamSimulator::new(tweets());

        assert_eq!(simulator.remaining(), 2);
        simulator.next_tweet();
        assert_eq!(simulator.remaining(), 1);
    }

    #[tokio::test]
    async fn test_play_sends_all_messages() {
        let (sender, mut rx) = broadcast::channel(16);

        StreamSimulator::new(tweets()).play(sender, None).await;

        assert!(matches!(rx.recv().await.unwrap(), StreamMessage::Connected));
        assert!(matches!(rx.recv().await.unwrap(), StreamMessage::Tweet(_)));
        assert!(matches!(rx.recv().await.unwrap(), StreamMessage::Tweet(_)));
        assert!(matches!(
            rx.recv().await.unwrap(),
            StreamMessage::Disconnected
        ));
    }
}
