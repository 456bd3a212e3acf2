//! The Classifier trait definition.

use async_trait::async_trait;

use crate::error::SentimentError;
use crate::label::Classification;

/// An external sentiment classifier (typically an LLM prompt).
///
/// This trait is object-safe and can be used with `Arc<dyn Classifier>`.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a user message.
    ///
    /// # Arguments
    ///
    /// * `text` - The user message, already trimmed and truncated.
    /// * `reply` - The bot reply to the message, when one exists.
    /// * `api_key` - A per-request credential overriding the configured one.
    async fn classify(
        &self,
        text: &str,
        reply: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Classification, SentimentError>;

    /// Get a human-readable name for this classifier.
    fn name(&self) -> &str;
}
