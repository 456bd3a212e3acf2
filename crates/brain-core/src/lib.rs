//! Core trait and types for LEAN BOT reply providers.
//!
//! This crate provides the shared interface for every reply provider. It
//! defines:
//!
//! - [`Brain`] - The trait that all providers implement
//! - [`GenerationRequest`] / [`ContextTurn`] - The message and its context window
//! - [`BrainError`] - Error types, each with a fixed apology for the user
//! - [`BrainRegistry`] - Providers looked up by name
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, GenerationRequest};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn generate(&self, request: &GenerationRequest) -> Result<String, BrainError> {
//!         Ok(format!("Hola! Recibí: {}", request.message))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod error;
mod persona;
mod registry;
mod request;
mod trait_def;

pub use error::BrainError;
pub use persona::{DEFAULT_SYSTEM_PROMPT, PROBE_MESSAGE};
pub use registry::BrainRegistry;
pub use request::{context_from_history, ContextTurn, GenerationRequest, CONTEXT_TURNS};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
