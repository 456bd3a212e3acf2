//! Message pipeline for LEAN BOT.
//!
//! This crate provides the [`Orchestrator`] type, which ties the reply
//! providers, the sentiment scorer, the database and the analytics log
//! together.
//!
//! # Architecture
//!
//! ```text
//! Message (from the HTTP layer)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Resolve provider (registry) and credential              │
//! │         ↓                                                   │
//! │  2. Generate reply with the last 5 exchanges as context     │
//! │     (provider failure → fixed apology)                      │
//! │         ↓                                                   │
//! │  3. Score the message (classifier, keyword fallback)        │
//! │         ↓                                                   │
//! │  4. Append {message, response, score, timestamp}            │
//! │     under the per-chat lock                                 │
//! │         ↓                                                   │
//! │  5. Record a sentiment event                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use analytics::SentimentAnalytics;
//! use brain_core::BrainRegistry;
//! use database::Database;
//! use orchestrator::{MessageRequest, Orchestrator};
//! use sentiment::SentimentScorer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:leanbot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let registry = BrainRegistry::new("gemini").with("gemini", Arc::new(gemini_brain::GeminiBrain::from_env()?));
//!     let orchestrator = Orchestrator::new(
//!         db,
//!         registry,
//!         SentimentScorer::keywords_only(),
//!         Arc::new(SentimentAnalytics::new()),
//!     );
//!
//!     let reply = orchestrator
//!         .process_message_for_user("12345", MessageRequest::new("Hola"))
//!         .await?;
//!     println!("LEAN BOT: {}", reply.response);
//!     Ok(())
//! }
//! ```

mod admin;
mod credentials;
mod error;
mod orchestrator;
mod views;

// Public exports
pub use admin::SELF_TEST_CONVERSATION;
pub use credentials::{CredentialStore, GEMINI_PROVIDER};
pub use error::{OrchestratorError, Result};
pub use orchestrator::Orchestrator;
pub use views::{
    AdminStats, AnalyzedMessage, ChatDetails, ChatSentimentSummary, ChatStats, ChatSummary,
    ChatView, MessageRequest, MessageResponse, ProbeResult, ProviderInfo, ProviderList,
    SelfTestReport, SelfTestResult, SentimentCounts, UserInfo, UserView,
};
