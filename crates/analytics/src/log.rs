//! The capped sentiment event log.

use std::collections::VecDeque;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::conversation::{self, ConversationAnalytics};
use crate::dashboard::{self, DashboardData};
use crate::event::SentimentEvent;
use crate::metrics::{self, SentimentMetrics};

/// Default number of events kept before the oldest are evicted.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Process-lifetime log of sentiment events.
///
/// Appends and evictions happen under one write lock, so concurrent
/// recorders never lose events and queries always see a consistent
/// snapshot.
#[derive(Debug)]
pub struct SentimentAnalytics {
    events: RwLock<VecDeque<SentimentEvent>>,
    capacity: usize,
}

impl SentimentAnalytics {
    /// Create a log holding up to [`DEFAULT_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a log holding up to `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an event, evicting the oldest ones beyond capacity.
    pub async fn record(&self, event: SentimentEvent) {
        let mut events = self.events.write().await;
        events.push_back(event);

        let mut evicted = 0usize;
        while events.len() > self.capacity {
            events.pop_front();
            evicted += 1;
        }

        if evicted > 0 {
            debug!(evicted, len = events.len(), "Evicted oldest sentiment events");
        }
    }

    /// Copy of all events, oldest first.
    pub async fn snapshot(&self) -> Vec<SentimentEvent> {
        self.events.read().await.iter().cloned().collect()
    }

    /// Number of events currently held.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether the log is empty.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Metrics for the last `hours_back` hours, optionally of one conversation.
    pub async fn metrics(
        &self,
        hours_back: i64,
        conversation_id: Option<&str>,
    ) -> SentimentMetrics {
        let events = self.snapshot().await;
        metrics::compute(&events, Utc::now(), hours_back, conversation_id)
    }

    /// Analysis of one conversation. Unknown ids yield an empty analysis.
    pub async fn conversation_analysis(&self, conversation_id: &str) -> ConversationAnalytics {
        let events = self.snapshot().await;
        conversation::analyze(&events, conversation_id, Utc::now())
    }

    /// All dashboard rollups computed from one snapshot.
    pub async fn dashboard(&self) -> DashboardData {
        let events = self.snapshot().await;
        dashboard::build(&events, Utc::now())
    }
}

impl Default for SentimentAnalytics {
    fn default() -> Self {
        Self::new()
    }
}
