//! Classifier call with timeout and keyword fallback.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::keywords;
use crate::label::{AnalysisType, LabelScores, SentimentAnalysis};

/// Default timeout for one classifier call.
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(10);

/// Texts longer than this are truncated before classification.
pub const MAX_TEXT_CHARS: usize = 512;

/// Description of the configured scoring chain.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Classifier name, or `keywords` when only the heuristic is configured.
    pub model_name: String,
    /// Whether an external classifier is configured.
    pub classifier_available: bool,
    /// Classifier timeout in seconds.
    pub timeout_secs: u64,
    /// Path taken when the classifier fails.
    pub fallback: &'static str,
}

/// Scores texts, preferring an external classifier and never failing.
#[derive(Clone)]
pub struct SentimentScorer {
    classifier: Option<Arc<dyn Classifier>>,
    timeout: Duration,
}

impl SentimentScorer {
    /// A scorer that only uses the keyword heuristic.
    pub fn keywords_only() -> Self {
        Self {
            classifier: None,
            timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    /// A scorer that calls `classifier` first, bounded by `timeout`.
    pub fn with_classifier(classifier: Arc<dyn Classifier>, timeout: Duration) -> Self {
        Self {
            classifier: Some(classifier),
            timeout,
        }
    }

    /// Analyze a single text.
    pub async fn analyze(&self, text: &str) -> SentimentAnalysis {
        self.analyze_exchange(text, None, None).await
    }

    /// Analyze a user message, with the bot reply as extra context.
    ///
    /// Empty text is neutral without calling the classifier. Classifier
    /// failures and timeouts fall back to [`keywords::analyze`].
    pub async fn analyze_exchange(
        &self,
        text: &str,
        reply: Option<&str>,
        api_key: Option<&str>,
    ) -> SentimentAnalysis {
        let text = preprocess(text);
        if text.is_empty() {
            return SentimentAnalysis::empty();
        }

        let Some(classifier) = &self.classifier else {
            return keywords::analyze(&text);
        };

        let call = classifier.classify(&text, reply, api_key);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(classification)) if is_valid_confidence(classification.confidence) => {
                debug!(
                    classifier = classifier.name(),
                    label = %classification.label,
                    confidence = classification.confidence,
                    "Classifier answered"
                );
                SentimentAnalysis::new(
                    classification,
                    LabelScores::from_classification(classification),
                    AnalysisType::Classifier,
                )
            }
            Ok(Ok(classification)) => {
                warn!(
                    classifier = classifier.name(),
                    confidence = classification.confidence,
                    "Classifier returned out-of-range confidence, using keywords"
                );
                keywords::analyze(&text)
            }
            Ok(Err(err)) => {
                warn!(classifier = classifier.name(), error = %err, "Classifier failed, using keywords");
                keywords::analyze(&text)
            }
            Err(_) => {
                warn!(
                    classifier = classifier.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Classifier timed out, using keywords"
                );
                keywords::analyze(&text)
            }
        }
    }

    /// Numeric score in `[1, 10]` for a text.
    pub async fn score(&self, text: &str) -> f64 {
        self.analyze(text).await.score
    }

    /// Describe the configured chain.
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self
                .classifier
                .as_ref()
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| "keywords".to_string()),
            classifier_available: self.classifier.is_some(),
            timeout_secs: self.timeout.as_secs(),
            fallback: "keywords",
        }
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::keywords_only()
    }
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn is_valid_confidence(confidence: f64) -> bool {
    confidence.is_finite() && (0.0..=1.0).contains(&confidence)
}

fn preprocess(text: &str) -> String {
    text.trim().chars().take(MAX_TEXT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SentimentError;
    use crate::label::{Classification, SentimentLabel, NEUTRAL_SCORE};
    use async_trait::async_trait;

    struct FixedClassifier(Result<Classification, ()>);

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(
            &self,
            _text: &str,
            _reply: Option<&str>,
            _api_key: Option<&str>,
        ) -> Result<Classification, SentimentError> {
            self.0
                .map_err(|_| SentimentError::Network("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl Classifier for SlowClassifier {
        async fn classify(
            &self,
            _text: &str,
            _reply: Option<&str>,
            _api_key: Option<&str>,
        ) -> Result<Classification, SentimentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Classification {
                label: SentimentLabel::Positive,
                confidence: 1.0,
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_neutral() {
        let scorer = SentimentScorer::keywords_only();
        let analysis = scorer.analyze("   ").await;
        assert_eq!(analysis.label, SentimentLabel::Neutral);
        assert_eq!(analysis.score, NEUTRAL_SCORE);
        assert_eq!(analysis.analysis_type, AnalysisType::EmptyText);
    }

    #[tokio::test]
    async fn test_classifier_result_is_mapped() {
        let scorer = SentimentScorer::with_classifier(
            Arc::new(FixedClassifier(Ok(Classification {
                label: SentimentLabel::Negative,
                confidence: 0.5,
            }))),
            DEFAULT_CLASSIFIER_TIMEOUT,
        );
        let analysis = scorer.analyze("me da igual").await;
        assert_eq!(analysis.analysis_type, AnalysisType::Classifier);
        assert!((analysis.score - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_classifier_error_falls_back() {
        let scorer = SentimentScorer::with_classifier(
            Arc::new(FixedClassifier(Err(()))),
            DEFAULT_CLASSIFIER_TIMEOUT,
        );
        let analysis = scorer.analyze("Me encanta el servicio").await;
        assert_eq!(analysis.analysis_type, AnalysisType::Keywords);
        assert_eq!(analysis.label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_falls_back() {
        let scorer = SentimentScorer::with_classifier(
            Arc::new(FixedClassifier(Ok(Classification {
                label: SentimentLabel::Positive,
                confidence: 3.5,
            }))),
            DEFAULT_CLASSIFIER_TIMEOUT,
        );
        let analysis = scorer.analyze("Esto es terrible").await;
        assert_eq!(analysis.analysis_type, AnalysisType::Keywords);
        assert_eq!(analysis.label, SentimentLabel::Negative);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let scorer =
            SentimentScorer::with_classifier(Arc::new(SlowClassifier), Duration::from_secs(1));
        let analysis = scorer.analyze("Esto es terrible").await;
        assert_eq!(analysis.analysis_type, AnalysisType::Keywords);
        assert_eq!(analysis.label, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_score_always_in_range() {
        let scorer = SentimentScorer::keywords_only();
        let texts = [
            "",
            "excelente genial perfecto gracias feliz maravilloso estupendo",
            "malo terrible horrible pésimo odio detesto molesto",
            "🙂",
            "a".repeat(5000).as_str(),
        ]
        .map(|t| t.to_string());

        for text in texts {
            let score = scorer.score(&text).await;
            assert!((1.0..=10.0).contains(&score), "{} out of range", score);
        }
    }

    #[test]
    fn test_preprocess_truncates() {
        let long = "ñ".repeat(MAX_TEXT_CHARS + 10);
        assert_eq!(preprocess(&long).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_model_info() {
        let info = SentimentScorer::keywords_only().model_info();
        assert_eq!(info.model_name, "keywords");
        assert!(!info.classifier_available);
    }
}
