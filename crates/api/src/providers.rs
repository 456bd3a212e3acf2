//! Reply providers and sentiment scorer assembled from configuration.

use std::sync::Arc;

use brain_core::{BrainError, BrainRegistry};
use gemini_brain::{GeminiBrain, GeminiBrainConfig, GeminiClassifier};
use mistral_brain::{MistralBrain, MistralBrainConfig};
use mock_brain::EchoBrain;
use sentiment::{SentimentError, SentimentScorer};
use tracing::{info, warn};

use crate::config::Config;

pub const MISTRAL_PROVIDER: &str = "mistral";
pub const MOCK_PROVIDER: &str = "mock";

/// Register every configured provider.
///
/// Fails when the default provider is not among them.
pub fn build_registry(
    config: &Config,
    gemini: GeminiBrainConfig,
    mistral: MistralBrainConfig,
) -> Result<BrainRegistry, BrainError> {
    if gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY not set; Gemini requests need a runtime or per-request key");
    }

    let mut registry = BrainRegistry::new(config.default_provider.as_str())
        .with(orchestrator::GEMINI_PROVIDER, Arc::new(GeminiBrain::new(gemini)?))
        .with(MISTRAL_PROVIDER, Arc::new(MistralBrain::new(mistral)?));

    if config.enable_mock_provider {
        registry.register(MOCK_PROVIDER, Arc::new(EchoBrain::with_prefix("LEAN BOT: ")));
    }

    if !registry.contains(registry.default_name()) {
        return Err(BrainError::UnknownProvider {
            name: registry.default_name().to_string(),
            available: registry.names(),
        });
    }

    info!(
        providers = ?registry.names(),
        default = registry.default_name(),
        "Providers registered"
    );
    Ok(registry)
}

/// The sentiment scorer: Gemini first when enabled, keywords otherwise.
pub fn build_scorer(
    config: &Config,
    gemini: &GeminiBrainConfig,
) -> Result<SentimentScorer, SentimentError> {
    if !config.sentiment_use_gemini {
        info!("Sentiment scoring uses keywords only");
        return Ok(SentimentScorer::keywords_only());
    }

    let classifier = GeminiClassifier::new(gemini, config.sentiment_timeout)?;
    Ok(SentimentScorer::with_classifier(
        Arc::new(classifier),
        config.sentiment_timeout,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(default_provider: &str, mock: bool, use_gemini: bool) -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "sqlite::memory:".to_string(),
            default_provider: default_provider.to_string(),
            sentiment_timeout: Duration::from_secs(2),
            sentiment_use_gemini: use_gemini,
            enable_mock_provider: mock,
        }
    }

    #[test]
    fn test_registry_contents() {
        let registry = build_registry(
            &config("gemini", true, true),
            GeminiBrainConfig::default(),
            MistralBrainConfig::default(),
        )
        .unwrap();

        assert_eq!(registry.names(), vec!["gemini", "mistral", "mock"]);
        assert_eq!(registry.default_name(), "gemini");
    }

    #[test]
    fn test_unregistered_default_fails() {
        let result = build_registry(
            &config("mock", false, true),
            GeminiBrainConfig::default(),
            MistralBrainConfig::default(),
        );
        assert!(matches!(result, Err(BrainError::UnknownProvider { .. })));
    }

    #[test]
    fn test_scorer_selection() {
        let gemini = GeminiBrainConfig::default();

        let scorer = build_scorer(&config("gemini", false, false), &gemini).unwrap();
        assert!(!scorer.model_info().classifier_available);

        let scorer = build_scorer(&config("gemini", false, true), &gemini).unwrap();
        let info = scorer.model_info();
        assert!(info.classifier_available);
        assert_eq!(info.timeout_secs, 2);
    }
}
