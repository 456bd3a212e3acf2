//! Configuration for MistralBrain.

use std::env;
use std::time::Duration;

use brain_core::{BrainError, DEFAULT_SYSTEM_PROMPT};

/// Default Mistral API URL.
pub const DEFAULT_API_URL: &str = "https://api.mistral.ai";

/// Default model.
pub const DEFAULT_MODEL: &str = "mistral-small-latest";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for MistralBrain.
#[derive(Clone)]
pub struct MistralBrainConfig {
    /// Mistral API URL.
    pub api_url: String,

    /// API key used when a request carries none.
    pub api_key: Option<String>,

    /// Model name to use.
    pub model: String,

    /// System prompt.
    pub system_prompt: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for MistralBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: Some(300),
            temperature: Some(0.7),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for MistralBrainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralBrainConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MistralBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional; without `MISTRAL_API_KEY` every request
    /// must carry its own key.
    ///
    /// - `MISTRAL_API_KEY` - API key
    /// - `MISTRAL_API_URL` - API URL (default: https://api.mistral.ai)
    /// - `MISTRAL_MODEL` - Model name (default: mistral-small-latest)
    /// - `MISTRAL_SYSTEM_PROMPT` - System prompt (default: LEAN BOT persona)
    /// - `MISTRAL_MAX_TOKENS` - Max tokens (default: 300)
    /// - `MISTRAL_TEMPERATURE` - Temperature (default: 0.7)
    /// - `MISTRAL_TIMEOUT_SECS` - Request timeout (default: 30)
    pub fn from_env() -> Result<Self, BrainError> {
        let defaults = Self::default();

        let api_key = env::var("MISTRAL_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let api_url = env::var("MISTRAL_API_URL").unwrap_or(defaults.api_url);

        let model = env::var("MISTRAL_MODEL").unwrap_or(defaults.model);

        let system_prompt = env::var("MISTRAL_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt);

        let max_tokens = env::var("MISTRAL_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("MISTRAL_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let timeout = match env::var("MISTRAL_TIMEOUT_SECS") {
            Ok(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BrainError::Configuration(format!(
                        "MISTRAL_TIMEOUT_SECS must be a positive integer, got '{}'",
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
            max_tokens,
            temperature,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> MistralBrainConfigBuilder {
        MistralBrainConfigBuilder::default()
    }

    /// Chat-completions URL.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for MistralBrainConfig.
#[derive(Debug, Default)]
pub struct MistralBrainConfigBuilder {
    config: MistralBrainConfig,
}

impl MistralBrainConfigBuilder {
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

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MistralBrainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MistralBrainConfig::default();

        assert_eq!(config.api_url, "https://api.mistral.ai");
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "mistral-small-latest");
        assert!(config.system_prompt.contains("LEAN BOT"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let config = MistralBrainConfig::builder()
            .api_url("http://localhost:9999/")
            .build();
        assert_eq!(config.endpoint(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(
            MistralBrainConfig::default().endpoint(),
            "https://api.mistral.ai/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = MistralBrainConfig::builder().api_key("secret-key").build();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_mistral_vars() {
            for var in [
                "MISTRAL_API_KEY",
                "MISTRAL_API_URL",
                "MISTRAL_MODEL",
                "MISTRAL_SYSTEM_PROMPT",
                "MISTRAL_MAX_TOKENS",
                "MISTRAL_TEMPERATURE",
                "MISTRAL_TIMEOUT_SECS",
            ] {
                std::env::remove_var(var);
            }
        }

        // Scenario 1: nothing set, key stays absent
        clear_all_mistral_vars();
        let config = MistralBrainConfig::from_env().unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);

        // Scenario 2: everything set
        std::env::set_var("MISTRAL_API_KEY", "env-key");
        std::env::set_var("MISTRAL_API_URL", "http://localhost:9999");
        std::env::set_var("MISTRAL_MODEL", "mistral-large-latest");
        std::env::set_var("MISTRAL_SYSTEM_PROMPT", "Sé breve");
        std::env::set_var("MISTRAL_TIMEOUT_SECS", "5");

        let config = MistralBrainConfig::from_env().unwrap();
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.model, "mistral-large-latest");
        assert_eq!(config.system_prompt, "Sé breve");
        assert_eq!(config.timeout, Duration::from_secs(5));

        // Scenario 3: bad timeout
        std::env::set_var("MISTRAL_TIMEOUT_SECS", "soon");
        assert!(matches!(
            MistralBrainConfig::from_env(),
            Err(BrainError::Configuration(_))
        ));

        // Scenario 4: blank key is treated as absent
        clear_all_mistral_vars();
        std::env::set_var("MISTRAL_API_KEY", "   ");
        assert!(MistralBrainConfig::from_env().unwrap().api_key.is_none());

        clear_all_mistral_vars();
    }
}
