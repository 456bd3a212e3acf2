//! Sentiment classification through a Gemini prompt.

use std::time::Duration;

use async_trait::async_trait;
use sentiment::{Classification, Classifier, SentimentError, SentimentLabel};
use tracing::debug;

use crate::api_types::{Content, GenerateContentRequest, GenerationConfig};
use crate::client::GeminiClient;
use crate::config::GeminiBrainConfig;

/// Confidence assumed when the model answers with a bare label.
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

/// Default timeout for one classification call.
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(10);

const INSTRUCTIONS: &str = "\
Eres un analizador de sentimientos profesional. \
Analiza el sentimiento del texto del usuario y responde únicamente con una de estas palabras: \
positivo, negativo o neutro, seguida de una barra vertical y tu confianza entre 0 y 1 \
(por ejemplo: positivo|0.85). No expliques tu respuesta.";

/// A [`Classifier`] backed by Gemini.
pub struct GeminiClassifier {
    client: GeminiClient,
    api_key: Option<String>,
    name: String,
}

impl GeminiClassifier {
    /// Create a classifier sharing the brain's URL, model and key.
    pub fn new(config: &GeminiBrainConfig, timeout: Duration) -> Result<Self, SentimentError> {
        let client =
            GeminiClient::new(config.endpoint(), timeout).map_err(SentimentError::Unavailable)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            name: format!("gemini:{}", config.model),
        })
    }

    fn build_prompt(text: &str, reply: Option<&str>) -> String {
        let mut prompt = format!("{}\n\nTexto: {}", INSTRUCTIONS, text);
        if let Some(reply) = reply.filter(|r| !r.trim().is_empty()) {
            prompt.push_str(&format!("\nRespuesta del asistente (solo contexto): {}", reply));
        }
        prompt
    }
}

/// Parse answers like `positivo|0.85`, `Negativo`, or `neutral 0.6`.
pub(crate) fn parse_answer(answer: &str) -> Result<Classification, SentimentError> {
    let mut pieces = answer
        .split(|c: char| c == '|' || c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());

    let label_text = pieces
        .next()
        .ok_or_else(|| SentimentError::InvalidResponse("empty answer".to_string()))?;
    let label: SentimentLabel = label_text
        .parse()
        .map_err(SentimentError::InvalidResponse)?;

    let confidence = match pieces.next() {
        None => DEFAULT_CONFIDENCE,
        Some(raw) => raw.parse::<f64>().map_err(|_| {
            SentimentError::InvalidResponse(format!("unparseable confidence: {}", raw))
        })?,
    };

    Ok(Classification { label, confidence })
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(
        &self,
        text: &str,
        reply: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Classification, SentimentError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key.as_deref())
            .ok_or(SentimentError::MissingCredential)?;

        let body = GenerateContentRequest {
            contents: vec![Content::text(Self::build_prompt(text, reply))],
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 20,
                top_p: 0.95,
                top_k: None,
            },
        };

        let answer = self.client.generate(api_key, &body).await?;
        debug!(answer = %answer, "Gemini classifier answered");
        parse_answer(&answer)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
