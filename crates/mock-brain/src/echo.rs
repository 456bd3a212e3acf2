//! Echo brain implementation - echoes messages back.

use std::sync::{Arc, Mutex};

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

/// A simple brain that echoes the message back.
///
/// Every request is recorded, so tests can check the context window and
/// credential that reached the provider.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
    seen: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoBrain;
    ///
    /// let brain = EchoBrain::with_prefix("Echo: ");
    /// // Will respond with "Echo: <original message>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BrainError> {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, request.message),
            None => request.message.clone(),
        })
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_no_prefix() {
        let brain = EchoBrain::new();
        let response = brain.generate(&GenerationRequest::new("Hola!")).await.unwrap();
        assert_eq!(response, "Hola!");
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let brain = EchoBrain::with_prefix("Echo: ");
        let response = brain.generate(&GenerationRequest::new("Hola!")).await.unwrap();
        assert_eq!(response, "Echo: Hola!");
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let brain = EchoBrain::new();
        let clone = brain.clone();

        let request = GenerationRequest::new("uno").with_api_key(Some("k".into()));
        brain.generate(&request).await.unwrap();

        let seen = clone.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].api_key.as_deref(), Some("k"));
    }

    #[tokio::test]
    async fn test_brain_is_ready() {
        let brain = EchoBrain::new();
        assert_eq!(brain.name(), "EchoBrain");
        assert!(brain.is_ready().await);
    }
}
