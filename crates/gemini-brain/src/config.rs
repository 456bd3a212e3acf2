//! Configuration for the Gemini provider.

use std::env;
use std::time::Duration;

use brain_core::{BrainError, DEFAULT_SYSTEM_PROMPT};

/// Default Gemini API URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default timeout for reply generation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by [`GeminiBrain`](crate::GeminiBrain) and
/// [`GeminiClassifier`](crate::GeminiClassifier).
#[derive(Clone)]
pub struct GeminiBrainConfig {
    /// Gemini API URL.
    pub api_url: String,

    /// API key used when a request carries none.
    pub api_key: Option<String>,

    /// Model name to use.
    pub model: String,

    /// Persona placed before the conversation.
    pub system_prompt: String,

    /// Temperature for replies.
    pub temperature: f32,

    /// Maximum tokens for replies.
    pub max_output_tokens: u32,

    /// Nucleus sampling for replies.
    pub top_p: f32,

    /// Top-k sampling for replies.
    pub top_k: u32,

    /// Request timeout for replies.
    pub timeout: Duration,
}

impl Default for GeminiBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.7,
            max_output_tokens: 300,
            top_p: 0.95,
            top_k: 40,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for GeminiBrainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBrainConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional; without `GEMINI_API_KEY` every request
    /// must carry its own key.
    ///
    /// - `GEMINI_API_KEY` - API key
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-1.5-flash-latest)
    /// - `GEMINI_SYSTEM_PROMPT` - Persona (default: LEAN BOT persona)
    /// - `GEMINI_TIMEOUT_SECS` - Reply timeout (default: 30)
    pub fn from_env() -> Result<Self, BrainError> {
        let defaults = Self::default();

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let api_url = env::var("GEMINI_API_URL").unwrap_or(defaults.api_url);

        let model = env::var("GEMINI_MODEL").unwrap_or(defaults.model);

        let system_prompt = env::var("GEMINI_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt);

        let timeout = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BrainError::Configuration(format!(
                        "GEMINI_TIMEOUT_SECS must be a positive integer, got '{}'",
                        v
                    )))
                }
            },
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            timeout,
            ..defaults
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiBrainConfigBuilder {
        GeminiBrainConfigBuilder::default()
    }

    /// `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Builder for GeminiBrainConfig.
#[derive(Debug, Default)]
pub struct GeminiBrainConfigBuilder {
    config: GeminiBrainConfig,
}

impl GeminiBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the persona.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the reply temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the reply token limit.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Set the reply timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiBrainConfig {
        self.config
    }
}
