//! Failing brain implementation - always returns the same error.

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

/// A brain whose every call fails with a fixed error.
///
/// Useful for exercising the apology replies.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    error: BrainError,
}

impl FailingBrain {
    pub fn new(error: BrainError) -> Self {
        Self { error }
    }

    /// A brain that always times out.
    pub fn timeout() -> Self {
        Self::new(BrainError::Timeout)
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, BrainError> {
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}
