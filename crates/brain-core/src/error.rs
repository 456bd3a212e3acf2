//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur while generating a reply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrainError {
    /// The provider is misconfigured (bad URL, unusable client, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No provider is registered under the requested name.
    #[error("unknown provider '{name}', available: {}", available.join(", "))]
    UnknownProvider { name: String, available: Vec<String> },

    /// No API key was supplied and none is configured.
    #[error("no API key configured for {0}")]
    MissingCredential(String),

    /// The provider could not be reached or answered with an error status.
    #[error("network error: {0}")]
    Network(String),

    /// The provider did not answer in time.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with something that is not a usable reply.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Any other failure.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

impl BrainError {
    /// The fixed apology sent to the user instead of a reply.
    pub fn user_reply(&self) -> &'static str {
        match self {
            BrainError::Timeout => {
                "Lo siento, la respuesta está tomando más tiempo del esperado. ¿Podrías intentarlo de nuevo?"
            }
            BrainError::Network(_) => {
                "Lo siento, tengo problemas de conectividad. ¿Podrías intentarlo más tarde?"
            }
            BrainError::InvalidResponse(_) => {
                "Lo siento, no pude generar una respuesta en este momento."
            }
            BrainError::MissingCredential(_) => {
                "Lo siento, no tengo configurada la conexión con el servicio de chat. Por favor, configura la API key."
            }
            BrainError::Configuration(_)
            | BrainError::UnknownProvider { .. }
            | BrainError::ProcessingFailed(_) => {
                "Lo siento, algo salió mal. ¿Podrías intentarlo de nuevo?"
            }
        }
    }
}
