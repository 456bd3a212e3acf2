//! The `generateContent` call shared by the brain and the classifier.

use std::time::Duration;

use brain_core::BrainError;
use reqwest::Client;
use sentiment::SentimentError;
use tracing::debug;

use crate::api_types::{ApiError, GenerateContentRequest, GenerateContentResponse};

/// Failure of one call, before it is mapped to the caller's error type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CallError {
    Timeout,
    Network(String),
    InvalidResponse(String),
}

impl From<CallError> for BrainError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Timeout => BrainError::Timeout,
            CallError::Network(msg) => BrainError::Network(msg),
            CallError::InvalidResponse(msg) => BrainError::InvalidResponse(msg),
        }
    }
}

impl From<CallError> for SentimentError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Timeout => SentimentError::Timeout,
            CallError::Network(msg) => SentimentError::Network(msg),
            CallError::InvalidResponse(msg) => SentimentError::InvalidResponse(msg),
        }
    }
}

pub(crate) struct GeminiClient {
    client: Client,
    endpoint: String,
}

impl GeminiClient {
    pub(crate) fn new(endpoint: String, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client, endpoint })
    }

    /// Send one request and return the first candidate's text.
    pub(crate) async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, CallError> {
        debug!(endpoint = %self.endpoint, "Sending request to Gemini API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallError::Timeout
                } else {
                    CallError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);

            return Err(CallError::Network(format!(
                "API error ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CallError::Timeout
            } else {
                CallError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        body.first_text()
            .map(str::to_string)
            .ok_or_else(|| CallError::InvalidResponse("no candidate text in response".to_string()))
    }
}
