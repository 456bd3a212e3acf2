//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::request::GenerationRequest;

/// A reply provider.
///
/// Implementations range from deterministic test doubles to remote
/// generative-language APIs. This trait is object-safe and can be used with
/// `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Generate the reply text for a request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to process messages.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
