//! The analytics event type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sentiment::SentimentLabel;

/// One scored message, as recorded by the analytics log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentEvent {
    pub timestamp: DateTime<Utc>,
    pub label: SentimentLabel,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Source message text.
    pub message: String,
    pub user_id: String,
    pub conversation_id: String,
}

impl SentimentEvent {
    /// Create an event stamped with the current time.
    pub fn new(
        label: SentimentLabel,
        confidence: f64,
        message: impl Into<String>,
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            label,
            confidence,
            message: message.into(),
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
        }
    }

    /// Replace the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
