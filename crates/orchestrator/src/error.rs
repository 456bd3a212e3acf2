//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur during orchestration.
///
/// Provider and classifier failures never show up here; they degrade to
/// apology replies and keyword scores.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A user or chat does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The caller sent something unusable.
    #[error("{0}")]
    Validation(String),

    /// The requested provider is not registered.
    #[error("{0}")]
    UnknownProvider(String),

    /// Persistence failed.
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for OrchestratorError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => OrchestratorError::NotFound(err.to_string()),
            other => OrchestratorError::Database(other),
        }
    }
}

impl From<BrainError> for OrchestratorError {
    fn from(err: BrainError) -> Self {
        match err {
            BrainError::UnknownProvider { .. } => OrchestratorError::UnknownProvider(err.to_string()),
            other => OrchestratorError::Validation(other.to_string()),
        }
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_split_from_other_database_errors() {
        let err: OrchestratorError = DatabaseError::NotFound {
            entity: "Chat",
            id: "abc".into(),
        }
        .into();
        assert!(matches!(err, OrchestratorError::NotFound(ref m) if m == "Chat not found: abc"));

        let err: OrchestratorError = DatabaseError::AlreadyExists {
            entity: "User",
            id: "1".into(),
        }
        .into();
        assert!(matches!(err, OrchestratorError::Database(_)));
    }

    #[test]
    fn test_unknown_provider_keeps_listing() {
        let err: OrchestratorError = BrainError::UnknownProvider {
            name: "gpt".into(),
            available: vec!["gemini".into(), "mistral".into()],
        }
        .into();
        assert_eq!(
            err.to_string(),
            "unknown provider 'gpt', available: gemini, mistral"
        );
    }
}
