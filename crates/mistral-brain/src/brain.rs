//! MistralBrain implementation using the Mistral chat-completions API.

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorBody, Role};
use crate::config::MistralBrainConfig;

/// A brain that asks Mistral for the reply.
///
/// Stateless: the conversation context arrives with each request.
pub struct MistralBrain {
    client: Client,
    config: MistralBrainConfig,
}

impl MistralBrain {
    /// Create a new MistralBrain with the given configuration.
    pub fn new(config: MistralBrainConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            model = %config.model,
            has_default_key = config.api_key.is_some(),
            "MistralBrain initialized"
        );

        Ok(Self { client, config })
    }

    /// Create a MistralBrain from environment variables.
    ///
    /// See [`MistralBrainConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(MistralBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &MistralBrainConfig {
        &self.config
    }

    /// Build the messages array: persona, context turns, new message.
    fn build_messages(&self, request: &GenerationRequest) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::new(Role::System, self.config.system_prompt.clone())];

        for turn in &request.context {
            if let Some(ref message) = turn.message {
                messages.push(ChatMessage::new(Role::User, message.clone()));
            }
            if let Some(ref response) = turn.response {
                messages.push(ChatMessage::new(Role::Assistant, response.clone()));
            }
        }

        messages.push(ChatMessage::new(Role::User, request.message.clone()));
        messages
    }

    async fn chat_completion(
        &self,
        api_key: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = self.config.endpoint();

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %body.model, messages = body.messages.len(), "Sending request to Mistral API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&error_text)
                .map(|e| e.message)
                .unwrap_or(error_text);

            return Err(BrainError::Network(format!(
                "API error ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let text = response.text().await.map_err(map_read_error)?;
        parse_completion(&text)
    }
}

fn map_send_error(e: reqwest::Error) -> BrainError {
    if e.is_timeout() {
        BrainError::Timeout
    } else {
        BrainError::Network(format!("Failed to send request: {}", e))
    }
}

/// A timeout while the body streams in is still a timeout.
fn map_read_error(e: reqwest::Error) -> BrainError {
    if e.is_timeout() {
        BrainError::Timeout
    } else {
        BrainError::InvalidResponse(format!("Failed to read response: {}", e))
    }
}

fn parse_completion(text: &str) -> Result<ChatCompletionResponse, BrainError> {
    serde_json::from_str(text)
        .map_err(|e| BrainError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

/// First non-empty choice content.
fn extract_reply(completion: &ChatCompletionResponse) -> Result<String, BrainError> {
    completion
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BrainError::InvalidResponse("no content in response".to_string()))
}

#[async_trait]
impl Brain for MistralBrain {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BrainError> {
        let api_key = request
            .resolve_api_key(self.config.api_key.as_deref())
            .ok_or_else(|| BrainError::MissingCredential("mistral".to_string()))?;

        let messages = self.build_messages(request);
        let completion = self.chat_completion(api_key, messages).await?;

        if let Some(ref usage) = completion.usage {
            debug!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                "Mistral token usage"
            );
        }

        extract_reply(&completion).inspect_err(|e| warn!(error = %e, "Mistral returned no reply"))
    }

    fn name(&self) -> &str {
        "MistralBrain"
    }

    async fn is_ready(&self) -> bool {
        self.config.api_key.is_some()
    }
}
