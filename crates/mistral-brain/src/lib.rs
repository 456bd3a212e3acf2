//! Mistral reply provider for LEAN BOT.
//!
//! Sends the LEAN BOT persona, the context window and the new message to the
//! Mistral chat-completions API and returns the first choice.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mistral_brain::{Brain, GenerationRequest, MistralBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = MistralBrain::from_env()?;
//!     let reply = brain.generate(&GenerationRequest::new("Hola")).await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::MistralBrain;
pub use config::{MistralBrainConfig, MistralBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
