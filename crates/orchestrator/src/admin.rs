//! Admin panel, analytics and provider queries.

use analytics::{dominant_label, SentimentEvent};
use brain_core::{GenerationRequest, PROBE_MESSAGE};
use chrono::{SecondsFormat, Utc};
use database::{chat, user, DatabaseError, History};
use sentiment::{SentimentAnalysis, SentimentLabel, NEUTRAL_SCORE};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::credentials::GEMINI_PROVIDER;
use crate::error::{OrchestratorError, Result};
use crate::orchestrator::{Orchestrator, UNKNOWN_USER};
use crate::views::{
    AdminStats, AnalyzedMessage, ChatDetails, ChatSentimentSummary, ChatStats, ChatSummary,
    ProbeResult, ProviderInfo, ProviderList, SelfTestReport, SelfTestResult, SentimentCounts,
    UserInfo,
};

/// Conversation the self test records into.
pub const SELF_TEST_CONVERSATION: &str = "test_conversation";

const DEFAULT_CONVERSATION: &str = "default";

const SELF_TEST_TEXTS: [&str; 4] = [
    "¡Este chatbot es increíble! Me ha ayudado muchísimo.",
    "El servicio al cliente fue pésimo, estoy muy molesto.",
    "Necesito información sobre los horarios de atención.",
    "La idea es buena, pero la implementación fue un desastre.",
];

impl Orchestrator {
    /// Score a free text and record it in the analytics log.
    pub async fn analyze_text(
        &self,
        text: &str,
        user_id: Option<&str>,
        conversation_id: Option<&str>,
    ) -> Result<SentimentAnalysis> {
        if text.trim().is_empty() {
            return Err(OrchestratorError::Validation("Texto vacío".to_string()));
        }

        let analysis = self.scorer().analyze(text).await;
        self.analytics()
            .record(SentimentEvent::new(
                analysis.label,
                analysis.confidence,
                text,
                user_id.unwrap_or(UNKNOWN_USER),
                conversation_id.unwrap_or(DEFAULT_CONVERSATION),
            ))
            .await;

        Ok(analysis)
    }

    /// Re-analyze every exchange of the chat owned by `doc_id`.
    pub async fn chat_details(&self, doc_id: &str) -> Result<ChatDetails> {
        let owner = match user::get_user_by_doc_id(self.database().pool(), doc_id).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound { .. }) => return Ok(ChatDetails::not_found()),
            Err(e) => return Err(e.into()),
        };
        let chat = match chat::get_chat(self.database().pool(), &owner.chat_id).await {
            Ok(chat) => chat,
            Err(DatabaseError::NotFound { .. }) => return Ok(ChatDetails::not_found()),
            Err(e) => return Err(e.into()),
        };

        let entries = chat.messages.entries();
        let mut counts = SentimentCounts::default();
        let mut labels = Vec::new();
        let mut confidence_sum = 0.0;
        let mut messages = Vec::new();

        for entry in &entries {
            let Some(text) = entry.get("message").and_then(Value::as_str) else {
                continue;
            };

            let analysis = self.scorer().analyze(text).await;
            counts.add(analysis.label);
            labels.push(analysis.label);
            confidence_sum += analysis.confidence;

            messages.push(AnalyzedMessage {
                message: text.to_string(),
                response: entry
                    .get("response")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                timestamp: entry
                    .get("timestamp")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                sentiment: analysis.label,
                confidence: analysis.confidence,
                score: entry.get("score").and_then(Value::as_f64),
            });
        }

        let avg_confidence = if labels.is_empty() {
            0.0
        } else {
            confidence_sum / labels.len() as f64
        };

        Ok(ChatDetails {
            found: true,
            message: None,
            user_info: Some(UserInfo {
                doc_id: owner.doc_id,
                user_id: owner.id,
            }),
            chat_stats: Some(ChatStats {
                total_messages: entries.len(),
                score: chat.score,
                chat_id: chat.id,
            }),
            messages,
            sentiment_analysis: Some(ChatSentimentSummary {
                avg_confidence,
                dominant_sentiment: dominant_label(labels),
                sentiment_counts: counts,
            }),
        })
    }

    /// User and chat counts with the mean stored exchange score.
    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let pool = self.database().pool();
        let total_users = user::count_users(pool).await?;
        let total_chats = chat::count_chats(pool).await?;

        let mut sum = 0.0;
        let mut count = 0usize;
        for row in chat::list_chats_with_owner(pool).await? {
            for entry in row.chat.messages.entries() {
                if let Some(score) = usable_score(entry.get("score")) {
                    sum += score;
                    count += 1;
                }
            }
        }

        let avg = if count > 0 {
            sum / count as f64
        } else {
            NEUTRAL_SCORE
        };

        Ok(AdminStats {
            total_users,
            total_chats,
            avg_sentiment: (avg * 10.0).clamp(0.0, 100.0) as u32,
        })
    }

    /// Every chat with its owner, with unscored exchanges scored on read.
    ///
    /// Exchanges missing a timestamp get the current time. Nothing is
    /// written back.
    pub async fn all_chats_admin(&self) -> Result<Vec<ChatSummary>> {
        let rows = chat::list_chats_with_owner(self.database().pool()).await?;
        let mut chats = Vec::with_capacity(rows.len());

        for row in rows {
            let mensajes = match row.chat.messages {
                History::List(entries) => {
                    let mut filled = Vec::with_capacity(entries.len());
                    for entry in entries {
                        filled.push(self.fill_entry(entry).await);
                    }
                    Value::Array(filled)
                }
                other => other.to_value(),
            };

            chats.push(ChatSummary {
                doc_id: row.doc_id,
                mensajes,
                score: row.chat.score,
            });
        }

        Ok(chats)
    }

    async fn fill_entry(&self, entry: Value) -> Value {
        let mut map = match entry {
            Value::Object(map) => map,
            other => return other,
        };

        if usable_score(map.get("score")).is_none() {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                let reply = map.get("response").and_then(Value::as_str);
                let analysis = self.scorer().analyze_exchange(message, reply, None).await;
                map.insert("score".to_string(), Value::from(analysis.score));
            }
        }

        if !has_timestamp(&map) {
            map.insert(
                "timestamp".to_string(),
                Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }

        Value::Object(map)
    }

    /// Score the canned texts into [`SELF_TEST_CONVERSATION`].
    pub async fn sentiment_self_test(&self) -> SelfTestReport {
        let mut test_results = Vec::with_capacity(SELF_TEST_TEXTS.len());

        for (i, text) in SELF_TEST_TEXTS.iter().enumerate() {
            let analysis = self.scorer().analyze(text).await;
            self.analytics()
                .record(SentimentEvent::new(
                    analysis.label,
                    analysis.confidence,
                    *text,
                    format!("test_user_{}", i),
                    SELF_TEST_CONVERSATION,
                ))
                .await;

            test_results.push(SelfTestResult {
                text: text.to_string(),
                sentiment: analysis,
            });
        }

        let test_metrics = self
            .analytics()
            .metrics(1, Some(SELF_TEST_CONVERSATION))
            .await;
        info!(
            total = test_metrics.total_messages,
            dominant = %test_metrics.dominant_sentiment,
            "Sentiment self test complete"
        );

        SelfTestReport {
            status: "success",
            test_results,
            test_metrics,
            model_info: self.scorer().model_info(),
        }
    }

    /// Registered providers and the default.
    pub async fn providers(&self) -> ProviderList {
        let registry = self.registry();
        let runtime_gemini_key = self.credentials().gemini_key().await.is_some();
        let mut providers = Vec::new();

        for name in registry.names() {
            let ready = match registry.get(Some(name.as_str())) {
                Ok(_) if runtime_gemini_key && name == GEMINI_PROVIDER => true,
                Ok(brain) => brain.is_ready().await,
                Err(_) => false,
            };
            providers.push(ProviderInfo { name, ready });
        }

        ProviderList {
            providers,
            default: registry.default_name().to_string(),
        }
    }

    /// Run a probe generation against a provider.
    pub async fn probe_provider(
        &self,
        provider: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<ProbeResult> {
        let name = self.registry().resolve_name(provider).to_string();
        let brain = self.registry().get(Some(name.as_str()))?;

        let key = self.credentials().for_provider(&name, api_key).await;
        let request = GenerationRequest::new(PROBE_MESSAGE).with_api_key(key);

        let result = match brain.generate(&request).await {
            Ok(reply) => ProbeResult {
                provider: name,
                working: true,
                response: Some(reply),
                error: None,
            },
            Err(err) => {
                warn!(provider = %name, error = %err, "Provider probe failed");
                ProbeResult {
                    provider: name,
                    working: false,
                    response: None,
                    error: Some(err.to_string()),
                }
            }
        };

        Ok(result)
    }
}

/// A score stored with an exchange. Missing, zero and non-numeric scores
/// count as absent.
fn usable_score(score: Option<&Value>) -> Option<f64> {
    score
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite() && *score != 0.0)
}

fn has_timestamp(map: &Map<String, Value>) -> bool {
    match map.get("timestamp") {
        Some(Value::String(ts)) => !ts.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::SentimentAnalytics;
    use brain_core::{BrainError, BrainRegistry};
    use database::{Database, HistoryUpdate};
    use mock_brain::{EchoBrain, FailingBrain};
    use sentiment::SentimentScorer;
    use serde_json::json;
    use std::sync::Arc;

    async fn orchestrator() -> Orchestrator {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let registry = BrainRegistry::new("mock")
            .with("mock", Arc::new(EchoBrain::new()))
            .with(
                "broken",
                Arc::new(FailingBrain::new(BrainError::Network("refused".into()))),
            );

        Orchestrator::new(
            db,
            registry,
            SentimentScorer::keywords_only(),
            Arc::new(SentimentAnalytics::new()),
        )
    }

    #[tokio::test]
    async fn test_analyze_text_records_event() {
        let orchestrator = orchestrator().await;

        let analysis = orchestrator
            .analyze_text("Excelente servicio", None, Some("conv-1"))
            .await
            .unwrap();
        assert_eq!(analysis.label, SentimentLabel::Positive);

        let events = orchestrator.analytics().snapshot().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, "unknown");
        assert_eq!(events[0].conversation_id, "conv-1");

        let result = orchestrator.analyze_text("  ", None, None).await;
        assert!(matches!(result, Err(OrchestratorError::Validation(_))));
    }

    #[tokio::test]
    async fn test_chat_details() {
        let orchestrator = orchestrator().await;

        let details = orchestrator.chat_details("ghost").await.unwrap();
        assert!(!details.found);

        let user = orchestrator.ensure_user("u1").await.unwrap();
        let empty = orchestrator.chat_details("u1").await.unwrap();
        assert!(empty.found);
        let summary = empty.sentiment_analysis.unwrap();
        assert_eq!(summary.dominant_sentiment, SentimentLabel::Neutral);
        assert_eq!(summary.avg_confidence, 0.0);

        orchestrator
            .append_history(
                &user.chat.id,
                HistoryUpdate::Many(vec![
                    json!({"message": "Me encanta", "response": "!", "score": 8.5}),
                    json!({"message": "Gracias, genial"}),
                    json!({"message": "Esto es terrible"}),
                    json!("legacy text"),
                ]),
                None,
            )
            .await
            .unwrap();

        let details = orchestrator.chat_details("u1").await.unwrap();
        assert_eq!(details.chat_stats.unwrap().total_messages, 4);
        assert_eq!(details.messages.len(), 3);
        assert_eq!(details.messages[0].score, Some(8.5));
        let summary = details.sentiment_analysis.unwrap();
        assert_eq!(summary.sentiment_counts.positive, 2);
        assert_eq!(summary.sentiment_counts.negative, 1);
        assert_eq!(summary.dominant_sentiment, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_admin_stats() {
        let orchestrator = orchestrator().await;

        let stats = orchestrator.admin_stats().await.unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.avg_sentiment, 50);

        let a = orchestrator.ensure_user("a").await.unwrap();
        orchestrator.ensure_user("b").await.unwrap();
        orchestrator
            .append_history(
                &a.chat.id,
                HistoryUpdate::Many(vec![json!({"score": 8.0}), json!({"score": 6.0})]),
                None,
            )
            .await
            .unwrap();

        let stats = orchestrator.admin_stats().await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_chats, 2);
        assert_eq!(stats.avg_sentiment, 70);
    }

    #[tokio::test]
    async fn test_all_chats_admin_fills_without_writing() {
        let orchestrator = orchestrator().await;
        let user = orchestrator.ensure_user("u1").await.unwrap();
        orchestrator
            .append_history(
                &user.chat.id,
                HistoryUpdate::One(json!({"message": "Excelente", "response": "ok"})),
                Some(5.0),
            )
            .await
            .unwrap();

        let chats = orchestrator.all_chats_admin().await.unwrap();
        assert_eq!(chats.len(), 1);
        let entry = &chats[0].mensajes[0];
        assert!(entry["score"].as_f64().unwrap() > 5.0);
        assert!(entry["timestamp"].is_string());

        let stored = orchestrator.chat_messages(&user.chat.id).await.unwrap();
        assert!(stored[0].get("score").is_none());
        assert!(stored[0].get("timestamp").is_none());
    }

    #[tokio::test]
    async fn test_self_test_records_four_events() {
        let orchestrator = orchestrator().await;

        let report = orchestrator.sentiment_self_test().await;
        assert_eq!(report.status, "success");
        assert_eq!(report.test_results.len(), 4);
        assert_eq!(report.test_metrics.total_messages, 4);
        assert_eq!(report.test_results[0].sentiment.label, SentimentLabel::Positive);
        assert_eq!(report.test_results[1].sentiment.label, SentimentLabel::Negative);
        assert_eq!(report.test_results[2].sentiment.label, SentimentLabel::Neutral);
        assert_eq!(orchestrator.analytics().len().await, 4);
    }

    #[tokio::test]
    async fn test_providers_and_probe() {
        let orchestrator = orchestrator().await;

        let list = orchestrator.providers().await;
        assert_eq!(list.default, "mock");
        assert_eq!(
            list.providers,
            vec![
                ProviderInfo {
                    name: "mock".into(),
                    ready: true
                },
                ProviderInfo {
                    name: "broken".into(),
                    ready: false
                },
            ]
        );

        let ok = orchestrator.probe_provider(None, None).await.unwrap();
        assert!(ok.working);
        assert_eq!(ok.response.as_deref(), Some(PROBE_MESSAGE));

        let failed = orchestrator.probe_provider(Some("broken"), None).await.unwrap();
        assert!(!failed.working);
        assert_eq!(failed.error.as_deref(), Some("network error: refused"));

        let unknown = orchestrator.probe_provider(Some("gpt"), None).await;
        assert!(matches!(unknown, Err(OrchestratorError::UnknownProvider(_))));
    }

    #[tokio::test]
    async fn test_runtime_key_makes_gemini_ready() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let registry = BrainRegistry::new(GEMINI_PROVIDER)
            .with(
                GEMINI_PROVIDER,
                Arc::new(FailingBrain::new(BrainError::MissingCredential("gemini".into()))),
            )
            .with(
                "broken",
                Arc::new(FailingBrain::new(BrainError::Network("refused".into()))),
            );
        let orchestrator = Orchestrator::new(
            db,
            registry,
            SentimentScorer::keywords_only(),
            Arc::new(SentimentAnalytics::new()),
        );

        let ready = |list: &ProviderList, name: &str| {
            list.providers.iter().find(|p| p.name == name).map(|p| p.ready)
        };

        let before = orchestrator.providers().await;
        assert_eq!(ready(&before, GEMINI_PROVIDER), Some(false));

        assert!(orchestrator.credentials().set_gemini_key("runtime-key").await);

        let after = orchestrator.providers().await;
        assert_eq!(ready(&after, GEMINI_PROVIDER), Some(true));
        assert_eq!(ready(&after, "broken"), Some(false));
    }
}
