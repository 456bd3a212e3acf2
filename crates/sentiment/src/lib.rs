//! Sentiment scoring for LEAN BOT.
//!
//! This crate maps a text to a [`SentimentLabel`], a confidence and a numeric
//! score in `[1, 10]`. It defines:
//!
//! - [`Classifier`] - The trait external classifiers (LLM prompts) implement
//! - [`SentimentScorer`] - Classifier call with timeout, falling back to the
//!   keyword heuristic; never fails
//! - [`keywords::analyze`] - The deterministic keyword heuristic
//!
//! # Example
//!
//! ```rust
//! use sentiment::{SentimentLabel, SentimentScorer};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let scorer = SentimentScorer::keywords_only();
//!
//!     let analysis = scorer.analyze("Me encanta el servicio").await;
//!     assert_eq!(analysis.label, SentimentLabel::Positive);
//!     assert!(analysis.score > 6.5);
//! }
//! ```

mod classifier;
mod error;
pub mod keywords;
mod label;
mod scorer;

pub use classifier::Classifier;
pub use error::SentimentError;
pub use label::{
    score_for, AnalysisType, Classification, LabelScores, SentimentAnalysis, SentimentLabel,
    NEUTRAL_SCORE,
};
pub use scorer::{ModelInfo, SentimentScorer, DEFAULT_CLASSIFIER_TIMEOUT, MAX_TEXT_CHARS};

// Re-export async_trait for classifier implementations
pub use async_trait::async_trait;
