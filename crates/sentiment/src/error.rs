//! Error types for classifier calls.

use thiserror::Error;

/// Errors an external classifier can report.
///
/// These never escape [`crate::SentimentScorer`]; they select the fallback path.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// No credential was configured for the classifier.
    #[error("classifier credential not configured")]
    MissingCredential,

    /// The classifier could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The classifier did not answer in time.
    #[error("classifier timed out")]
    Timeout,

    /// The classifier answered with something that is not a sentiment.
    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),

    /// The classifier is temporarily unavailable.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}
