//! Fixed sentiment classifier.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sentiment::{Classification, Classifier, SentimentError, SentimentLabel};

/// A classifier that always returns the same answer, or always fails.
///
/// Records the credential of each call.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    answer: Option<Classification>,
    keys: Arc<Mutex<Vec<Option<String>>>>,
}

impl FixedClassifier {
    /// Always answer `label` with `confidence`.
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            answer: Some(Classification { label, confidence }),
            keys: Arc::default(),
        }
    }

    /// Always fail with a network error.
    pub fn failing() -> Self {
        Self {
            answer: None,
            keys: Arc::default(),
        }
    }

    /// Credentials seen so far, oldest first.
    pub fn api_keys(&self) -> Vec<Option<String>> {
        self.keys.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(
        &self,
        _text: &str,
        _reply: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Classification, SentimentError> {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(api_key.map(str::to_string));

        self.answer
            .ok_or_else(|| SentimentError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_answer() {
        let classifier = FixedClassifier::new(SentimentLabel::Positive, 0.9);
        let c = classifier.classify("x", None, Some("k")).await.unwrap();
        assert_eq!(c.label, SentimentLabel::Positive);
        assert_eq!(classifier.api_keys(), vec![Some("k".to_string())]);
    }

    #[tokio::test]
    async fn test_failing() {
        let classifier = FixedClassifier::failing();
        assert!(classifier.classify("x", None, None).await.is_err());
    }
}
