//! Request and report types exchanged with the HTTP layer.
//!
//! Field names follow the JSON the LEAN BOT frontend already speaks
//! (`mensajes`, `found`, ...).

use analytics::SentimentMetrics;
use chrono::{DateTime, Utc};
use database::{Chat, ChatWithOwner, History, User};
use sentiment::{ModelInfo, SentimentAnalysis, SentimentLabel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message sent to LEAN BOT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    /// Provider name; the registry default when absent.
    #[serde(default)]
    pub ai_provider: Option<String>,
    /// Per-request API key.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl MessageRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.ai_provider = Some(provider.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// The exchange produced for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub response: String,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
    pub ai_provider: String,
}

/// A chat as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatView {
    pub id: String,
    pub mensajes: History,
    pub score: Option<f64>,
}

impl From<Chat> for ChatView {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            mensajes: chat.messages,
            score: chat.score,
        }
    }
}

/// A user with its chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: String,
    pub doc_id: String,
    pub chat: ChatView,
}

impl UserView {
    pub(crate) fn new(user: User, chat: Chat) -> Self {
        Self {
            id: user.id,
            doc_id: user.doc_id,
            chat: chat.into(),
        }
    }
}

/// One row of the chat listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSummary {
    pub doc_id: Option<String>,
    pub mensajes: Value,
    pub score: Option<f64>,
}

impl From<ChatWithOwner> for ChatSummary {
    fn from(row: ChatWithOwner) -> Self {
        Self {
            doc_id: row.doc_id,
            mensajes: row.chat.messages.to_value(),
            score: row.chat.score,
        }
    }
}

/// Headline numbers for the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_chats: i64,
    /// Mean stored exchange score as a percentage of 10.
    pub avg_sentiment: u32,
}

/// Per-label message counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub(crate) fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub doc_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatStats {
    pub total_messages: usize,
    pub score: Option<f64>,
    pub chat_id: String,
}

/// A stored exchange re-analyzed for the details view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedMessage {
    pub message: String,
    pub response: Option<String>,
    pub timestamp: Option<String>,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    /// Score stored with the exchange.
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSentimentSummary {
    pub avg_confidence: f64,
    pub dominant_sentiment: SentimentLabel,
    pub sentiment_counts: SentimentCounts,
}

/// Per-message sentiment of one user's chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatDetails {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_stats: Option<ChatStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<AnalyzedMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_analysis: Option<ChatSentimentSummary>,
}

impl ChatDetails {
    pub(crate) fn not_found() -> Self {
        Self {
            found: false,
            message: Some("Usuario o chat no encontrado".to_string()),
            user_info: None,
            chat_stats: None,
            messages: Vec::new(),
            sentiment_analysis: None,
        }
    }
}

/// One provider as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    /// Whether the provider has a usable configuration.
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderList {
    pub providers: Vec<ProviderInfo>,
    pub default: String,
}

/// Outcome of a probe generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub provider: String,
    pub working: bool,
    pub response: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfTestResult {
    pub text: String,
    pub sentiment: SentimentAnalysis,
}

/// Canned texts scored into the analytics log.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    pub status: &'static str,
    pub test_results: Vec<SelfTestResult>,
    pub test_metrics: SentimentMetrics,
    pub model_info: ModelInfo,
}
