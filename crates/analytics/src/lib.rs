//! Sentiment analytics for LEAN BOT.
//!
//! Keeps a capped, process-lifetime log of [`SentimentEvent`]s and answers
//! windowed aggregate queries over a snapshot of it:
//!
//! - [`SentimentMetrics`] - counts, trend, dominant label and hourly histogram
//!   for a time window
//! - [`ConversationAnalytics`] - evolution, stability, engagement and key
//!   moments of one conversation
//! - [`DashboardData`] - everything the dashboard page shows
//!
//! Nothing here is persisted; a restart discards all state.
//!
//! # Example
//!
//! ```rust
//! use analytics::{SentimentAnalytics, SentimentEvent};
//! use sentiment::SentimentLabel;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let analytics = SentimentAnalytics::new();
//!     analytics
//!         .record(SentimentEvent::new(
//!             SentimentLabel::Positive,
//!             0.8,
//!             "Me encanta el servicio",
//!             "u1",
//!             "chat-1",
//!         ))
//!         .await;
//!
//!     let metrics = analytics.metrics(24, None).await;
//!     assert_eq!(metrics.total_messages, 1);
//! }
//! ```

mod conversation;
mod dashboard;
mod event;
mod log;
mod metrics;

pub use conversation::{ConversationAnalytics, EvolutionPoint, KeyMoment};
pub use dashboard::{ActiveConversation, DashboardData, HourlyTrend, SentimentKeywords};
pub use event::SentimentEvent;
pub use log::{SentimentAnalytics, DEFAULT_CAPACITY};
pub use metrics::{dominant_label, ConfidenceDistribution, HourlyBucket, SentimentMetrics, Trend};
