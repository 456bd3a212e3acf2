//! Mock reply providers and classifiers for LEAN BOT.
//!
//! This crate provides deterministic implementations for tests and for
//! running the service without provider credentials:
//! - `EchoBrain` - Echoes messages back and records requests
//! - `FailingBrain` - Always fails with a fixed error
//! - `FixedClassifier` - Answers every classification the same way
//!
//! For production replies, use the `gemini-brain` or `mistral-brain` crates.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, EchoBrain, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = EchoBrain::new();
//!
//!     let response = brain.generate(&GenerationRequest::new("Hola!")).await?;
//!     println!("Response: {}", response);
//!     Ok(())
//! }
//! ```

// Mock implementations
mod classifier;
mod echo;
mod failing;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

// Export mock implementations
pub use classifier::FixedClassifier;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
