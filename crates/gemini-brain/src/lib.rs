//! Google Gemini provider for LEAN BOT.
//!
//! This crate talks to the Gemini `generateContent` endpoint for two jobs:
//!
//! - [`GeminiBrain`] generates LEAN BOT replies from the persona, the context
//!   window and the new message
//! - [`GeminiClassifier`] labels the sentiment of a user message for
//!   [`sentiment::SentimentScorer`]
//!
//! No key is embedded. Each call uses the per-request key when given, else
//! `GEMINI_API_KEY`, and fails with a missing-credential error otherwise.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gemini_brain::{Brain, GeminiBrain, GeminiBrainConfig, GeminiClassifier, GenerationRequest};
//! use sentiment::SentimentScorer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiBrainConfig::from_env()?;
//!     let brain = GeminiBrain::new(config.clone())?;
//!     let reply = brain.generate(&GenerationRequest::new("Hola")).await?;
//!
//!     let classifier = GeminiClassifier::new(&config, gemini_brain::DEFAULT_CLASSIFIER_TIMEOUT)?;
//!     let scorer = SentimentScorer::with_classifier(
//!         Arc::new(classifier),
//!         gemini_brain::DEFAULT_CLASSIFIER_TIMEOUT,
//!     );
//!     let analysis = scorer.analyze_exchange("Hola", Some(&reply), None).await;
//!     println!("{} ({})", reply, analysis.score);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod classifier;
mod client;
mod config;

pub use brain::GeminiBrain;
pub use classifier::{GeminiClassifier, DEFAULT_CLASSIFIER_TIMEOUT, DEFAULT_CONFIDENCE};
pub use config::{GeminiBrainConfig, GeminiBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
