//! GeminiBrain implementation.

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
use tracing::{info, warn};

use crate::api_types::{Content, GenerateContentRequest, GenerationConfig};
use crate::client::GeminiClient;
use crate::config::GeminiBrainConfig;

/// A brain that asks Gemini for the reply.
///
/// The persona, the context window and the new message are rendered into a
/// single transcript prompt.
pub struct GeminiBrain {
    client: GeminiClient,
    config: GeminiBrainConfig,
}

impl GeminiBrain {
    /// Create a new GeminiBrain with the given configuration.
    pub fn new(config: GeminiBrainConfig) -> Result<Self, BrainError> {
        let client =
            GeminiClient::new(config.endpoint(), config.timeout).map_err(BrainError::Configuration)?;

        info!(
            model = %config.model,
            has_default_key = config.api_key.is_some(),
            "GeminiBrain initialized"
        );

        Ok(Self { client, config })
    }

    /// Create a GeminiBrain from environment variables.
    ///
    /// See [`GeminiBrainConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GeminiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiBrainConfig {
        &self.config
    }

    fn build_prompt(&self, request: &GenerationRequest) -> String {
        let mut prompt = format!("{}\n\n", self.config.system_prompt);

        for turn in &request.context {
            if let Some(ref message) = turn.message {
                prompt.push_str(&format!("Usuario: {}\n", message));
            }
            if let Some(ref response) = turn.response {
                prompt.push_str(&format!("LEAN BOT: {}\n", response));
            }
        }

        prompt.push_str(&format!(
            "Usuario: {}\n\nResponde como LEAN BOT:",
            request.message
        ));
        prompt
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(self.build_prompt(request))],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: self.config.top_p,
                top_k: Some(self.config.top_k),
            },
        }
    }
}

#[async_trait]
impl Brain for GeminiBrain {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BrainError> {
        let api_key = request
            .resolve_api_key(self.config.api_key.as_deref())
            .ok_or_else(|| BrainError::MissingCredential("gemini".to_string()))?;

        let body = self.build_request(request);
        self.client
            .generate(api_key, &body)
            .await
            .map_err(BrainError::from)
            .inspect_err(|e| warn!(error = %e, "Gemini reply failed"))
    }

    fn name(&self) -> &str {
        "GeminiBrain"
    }

    async fn is_ready(&self) -> bool {
        self.config.api_key.is_some()
    }
}
