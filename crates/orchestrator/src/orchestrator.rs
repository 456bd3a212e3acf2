//! Main orchestrator that coordinates message processing.

use std::sync::Arc;

use analytics::{SentimentAnalytics, SentimentEvent};
use brain_core::{BrainRegistry, GenerationRequest};
use database::{chat, user, Chat, Database, DatabaseError, History, HistoryUpdate, MessageExchange};
use sentiment::SentimentScorer;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::credentials::CredentialStore;
use crate::error::{OrchestratorError, Result};
use crate::views::{ChatSummary, ChatView, MessageRequest, MessageResponse, UserView};

/// `user_id` recorded for analytics events whose chat has no owner.
pub(crate) const UNKNOWN_USER: &str = "unknown";

/// Main orchestrator that coordinates message processing.
///
/// For every message it:
/// - Generates the reply with the requested provider, or an apology when
///   the provider fails
/// - Scores the user message, with the reply as context
/// - Appends the exchange to the chat history
/// - Records a sentiment event for the dashboard
pub struct Orchestrator {
    /// Users and chats.
    db: Database,
    /// Reply providers by name.
    registry: BrainRegistry,
    /// Classifier with keyword fallback.
    scorer: SentimentScorer,
    /// In-memory event log.
    analytics: Arc<SentimentAnalytics>,
    /// Runtime API key override.
    credentials: CredentialStore,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        db: Database,
        registry: BrainRegistry,
        scorer: SentimentScorer,
        analytics: Arc<SentimentAnalytics>,
    ) -> Self {
        info!(
            providers = ?registry.names(),
            default_provider = registry.default_name(),
            classifier = %scorer.model_info().model_name,
            "Orchestrator ready"
        );

        Self {
            db,
            registry,
            scorer,
            analytics,
            credentials: CredentialStore::new(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &BrainRegistry {
        &self.registry
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    pub fn analytics(&self) -> &SentimentAnalytics {
        &self.analytics
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Get the user for `doc_id`, creating it and its chat if unknown.
    pub async fn ensure_user(&self, doc_id: &str) -> Result<UserView> {
        validate_doc_id(doc_id)?;

        let (user, created) = user::get_or_create_user(self.db.pool(), doc_id).await?;
        if created {
            info!(doc_id, chat_id = %user.chat_id, "Registered new user");
        }

        let chat = chat::get_chat(self.db.pool(), &user.chat_id).await?;
        Ok(UserView::new(user, chat))
    }

    /// The user for `doc_id` with its chat.
    pub async fn get_user(&self, doc_id: &str) -> Result<UserView> {
        let user = user::get_user_by_doc_id(self.db.pool(), doc_id).await?;
        let chat = chat::get_chat(self.db.pool(), &user.chat_id).await?;
        Ok(UserView::new(user, chat))
    }

    /// The chat owned by `doc_id`.
    pub async fn user_chat(&self, doc_id: &str) -> Result<ChatView> {
        Ok(self.get_user(doc_id).await?.chat)
    }

    /// History of the chat owned by `doc_id`; empty when the user is unknown.
    pub async fn user_messages(&self, doc_id: &str) -> Result<Value> {
        match self.get_user(doc_id).await {
            Ok(user) => Ok(messages_or_empty(user.chat.mensajes)),
            Err(OrchestratorError::NotFound(_)) => Ok(Value::Array(Vec::new())),
            Err(e) => Err(e),
        }
    }

    /// History of a chat.
    pub async fn chat_messages(&self, chat_id: &str) -> Result<Value> {
        let chat = chat::get_chat(self.db.pool(), chat_id).await?;
        Ok(messages_or_empty(chat.messages))
    }

    /// Stored score of a chat.
    pub async fn chat_score(&self, chat_id: &str) -> Result<Option<f64>> {
        Ok(chat::get_score(self.db.pool(), chat_id).await?)
    }

    /// Every chat with its owner, as stored.
    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let chats = chat::list_chats_with_owner(self.db.pool()).await?;
        Ok(chats.into_iter().map(ChatSummary::from).collect())
    }

    /// Process a message sent to an existing chat.
    pub async fn process_message(
        &self,
        chat_id: &str,
        request: MessageRequest,
    ) -> Result<MessageResponse> {
        let owner = match user::get_user_by_chat_id(self.db.pool(), chat_id).await {
            Ok(user) => Some(user.doc_id),
            Err(DatabaseError::NotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        self.run_turn(chat_id, owner.as_deref(), request).await
    }

    /// Process a message from `doc_id`, creating the user on first contact.
    pub async fn process_message_for_user(
        &self,
        doc_id: &str,
        request: MessageRequest,
    ) -> Result<MessageResponse> {
        let user = self.ensure_user(doc_id).await?;
        self.run_turn(&user.chat.id, Some(doc_id), request).await
    }

    /// Generate, score, persist and record one exchange.
    ///
    /// Provider and classifier failures never fail the turn.
    async fn run_turn(
        &self,
        chat_id: &str,
        owner: Option<&str>,
        request: MessageRequest,
    ) -> Result<MessageResponse> {
        if request.message.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "message must not be empty".to_string(),
            ));
        }

        let provider = self
            .registry
            .resolve_name(request.ai_provider.as_deref())
            .to_string();
        let brain = self.registry.get(Some(provider.as_str()))?;

        let chat = chat::get_chat(self.db.pool(), chat_id).await?;

        info!(
            chat_id,
            provider = %provider,
            history_len = chat.messages.len(),
            "Processing message"
        );

        let generation_key = self
            .credentials
            .for_provider(&provider, request.api_key.as_deref())
            .await;
        let generation = GenerationRequest::new(request.message.as_str())
            .with_history(&chat.messages.entries())
            .with_api_key(generation_key);

        let response = match brain.generate(&generation).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(chat_id, provider = %provider, error = %err, "Reply generation failed, sending apology");
                err.user_reply().to_string()
            }
        };

        let classifier_key = self
            .credentials
            .for_classifier(&provider, request.api_key.as_deref())
            .await;
        let analysis = self
            .scorer
            .analyze_exchange(&request.message, Some(&response), classifier_key.as_deref())
            .await;

        let exchange = MessageExchange::new(request.message, response, analysis.score);
        let entry = serde_json::to_value(&exchange).map_err(DatabaseError::from)?;
        let chat = chat::append_history(
            &self.db,
            chat_id,
            HistoryUpdate::One(entry),
            Some(exchange.score),
        )
        .await?;

        debug!(
            chat_id,
            history_len = chat.messages.len(),
            label = %analysis.label,
            score = exchange.score,
            "Stored exchange"
        );

        self.analytics
            .record(SentimentEvent::new(
                analysis.label,
                analysis.confidence,
                exchange.message.as_str(),
                owner.unwrap_or(UNKNOWN_USER),
                chat_id,
            ))
            .await;

        Ok(MessageResponse {
            message: exchange.message,
            response: exchange.response,
            score: exchange.score,
            timestamp: exchange.timestamp,
            ai_provider: provider,
        })
    }

    /// Append entries to a chat history.
    ///
    /// The chat score is set to `score_override` when given, else recomputed
    /// from the entry that ends up last. An empty batch without override
    /// leaves the score unchanged.
    pub async fn append_history(
        &self,
        chat_id: &str,
        update: HistoryUpdate,
        score_override: Option<f64>,
    ) -> Result<Chat> {
        let score = match (score_override, update.latest()) {
            (Some(score), _) => Some(validate_score(score)?),
            (None, Some(latest)) => Some(self.scorer.score(&scoring_text(latest)).await),
            (None, None) => None,
        };

        Ok(chat::append_history(&self.db, chat_id, update, score).await?)
    }

    /// Replace a chat's history and/or score wholesale.
    pub async fn overwrite_chat(
        &self,
        chat_id: &str,
        messages: Option<Value>,
        score: Option<f64>,
    ) -> Result<Chat> {
        let score = score.map(validate_score).transpose()?;

        warn!(chat_id, replaces_history = messages.is_some(), "Administrative chat overwrite");
        Ok(chat::overwrite_chat(&self.db, chat_id, messages, score).await?)
    }
}

fn validate_doc_id(doc_id: &str) -> Result<()> {
    if doc_id.trim().is_empty() {
        return Err(OrchestratorError::Validation(
            "doc_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_score(score: f64) -> Result<f64> {
    if !score.is_finite() {
        return Err(OrchestratorError::Validation(format!(
            "score must be a finite number, got {}",
            score
        )));
    }
    Ok(score)
}

/// The text a history entry is scored on.
///
/// Exchanges are scored on their `message`; plain strings on themselves;
/// anything else on its JSON text.
pub(crate) fn scoring_text(entry: &Value) -> String {
    match entry {
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => entry.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn messages_or_empty(history: History) -> Value {
    match history {
        History::Absent => Value::Array(Vec::new()),
        other => other.to_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::GEMINI_PROVIDER;
    use brain_core::BrainError;
    use mock_brain::{EchoBrain, FailingBrain, FixedClassifier};
    use sentiment::SentimentLabel;
    use serde_json::json;
    use std::time::Duration;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn orchestrator_with(registry: BrainRegistry, scorer: SentimentScorer) -> Orchestrator {
        Orchestrator::new(
            test_db().await,
            registry,
            scorer,
            Arc::new(SentimentAnalytics::new()),
        )
    }

    async fn echo_orchestrator() -> (Orchestrator, EchoBrain) {
        let echo = EchoBrain::with_prefix("LEAN BOT: ");
        let registry = BrainRegistry::new("mock").with("mock", Arc::new(echo.clone()));
        (
            orchestrator_with(registry, SentimentScorer::keywords_only()).await,
            echo,
        )
    }

    #[tokio::test]
    async fn test_two_message_scenario() {
        let (orchestrator, _) = echo_orchestrator().await;

        let first = orchestrator
            .process_message_for_user("u1", MessageRequest::new("Me encanta el servicio"))
            .await
            .unwrap();
        assert!(first.score > 6.5);
        assert!(!first.response.is_empty());
        assert_eq!(first.ai_provider, "mock");

        let user = orchestrator.get_user("u1").await.unwrap();
        assert_eq!(user.chat.mensajes.len(), 1);

        let second = orchestrator
            .process_message(&user.chat.id, MessageRequest::new("Esto es terrible"))
            .await
            .unwrap();
        assert!(second.score < 5.0);

        let chat = orchestrator.user_chat("u1").await.unwrap();
        let entries = chat.mensajes.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["message"], "Me encanta el servicio");
        assert_eq!(entries[1]["message"], "Esto es terrible");
        assert_eq!(chat.score, Some(second.score));
    }

    #[tokio::test]
    async fn test_turn_records_analytics_event() {
        let (orchestrator, _) = echo_orchestrator().await;

        let user = orchestrator.ensure_user("u1").await.unwrap();
        orchestrator
            .process_message(&user.chat.id, MessageRequest::new("Gracias, excelente"))
            .await
            .unwrap();

        let events = orchestrator.analytics().snapshot().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, "u1");
        assert_eq!(events[0].conversation_id, user.chat.id);
        assert_eq!(events[0].label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_context_window_reaches_brain() {
        let (orchestrator, echo) = echo_orchestrator().await;

        for i in 0..7 {
            orchestrator
                .process_message_for_user("u1", MessageRequest::new(format!("mensaje {}", i)))
                .await
                .unwrap();
        }

        let requests = echo.requests();
        assert_eq!(requests.len(), 7);
        assert!(requests[0].context.is_empty());
        let last = &requests[6];
        assert_eq!(last.context.len(), 5);
        assert_eq!(last.context[0].message.as_deref(), Some("mensaje 1"));
        assert_eq!(last.context[4].message.as_deref(), Some("mensaje 5"));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let (orchestrator, _) = echo_orchestrator().await;
        let user = orchestrator.ensure_user("u1").await.unwrap();

        let result = orchestrator
            .process_message(&user.chat.id, MessageRequest::new("   "))
            .await;
        assert!(matches!(result, Err(OrchestratorError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_chat_and_provider() {
        let (orchestrator, _) = echo_orchestrator().await;

        let result = orchestrator
            .process_message("missing", MessageRequest::new("hola"))
            .await;
        assert!(matches!(result, Err(OrchestratorError::NotFound(_))));

        let user = orchestrator.ensure_user("u1").await.unwrap();
        let result = orchestrator
            .process_message(&user.chat.id, MessageRequest::new("hola").with_provider("gpt"))
            .await;
        match result {
            Err(OrchestratorError::UnknownProvider(message)) => assert!(message.contains("mock")),
            other => panic!("expected UnknownProvider, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_apology() {
        let registry = BrainRegistry::new("mock")
            .with("mock", Arc::new(FailingBrain::timeout()));
        let orchestrator = orchestrator_with(registry, SentimentScorer::keywords_only()).await;

        let response = orchestrator
            .process_message_for_user("u1", MessageRequest::new("hola"))
            .await
            .unwrap();
        assert_eq!(response.response, BrainError::Timeout.user_reply());

        let chat = orchestrator.user_chat("u1").await.unwrap();
        assert_eq!(chat.mensajes.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_becomes_apology() {
        let registry = BrainRegistry::new("gemini").with(
            "gemini",
            Arc::new(FailingBrain::new(BrainError::MissingCredential("gemini".into()))),
        );
        let orchestrator = orchestrator_with(registry, SentimentScorer::keywords_only()).await;

        let response = orchestrator
            .process_message_for_user("u1", MessageRequest::new("hola"))
            .await
            .unwrap();
        assert!(response.response.contains("API key"));
    }

    #[tokio::test]
    async fn test_runtime_key_and_request_key_reach_providers() {
        let echo = EchoBrain::new();
        let classifier = FixedClassifier::new(SentimentLabel::Positive, 0.8);
        let registry =
            BrainRegistry::new(GEMINI_PROVIDER).with(GEMINI_PROVIDER, Arc::new(echo.clone()));
        let scorer =
            SentimentScorer::with_classifier(Arc::new(classifier.clone()), Duration::from_secs(1));
        let orchestrator = orchestrator_with(registry, scorer).await;

        orchestrator.credentials().set_gemini_key("runtime-key").await;
        orchestrator
            .process_message_for_user("u1", MessageRequest::new("hola"))
            .await
            .unwrap();
        orchestrator
            .process_message_for_user("u1", MessageRequest::new("hola").with_api_key("request-key"))
            .await
            .unwrap();

        let keys: Vec<_> = echo.requests().into_iter().map(|r| r.api_key).collect();
        assert_eq!(
            keys,
            vec![Some("runtime-key".to_string()), Some("request-key".to_string())]
        );
        assert_eq!(
            classifier.api_keys(),
            vec![Some("runtime-key".to_string()), Some("request-key".to_string())]
        );
    }

    #[tokio::test]
    async fn test_classifier_answer_sets_score() {
        let registry = BrainRegistry::new("mock").with("mock", Arc::new(EchoBrain::new()));
        let scorer = SentimentScorer::with_classifier(
            Arc::new(FixedClassifier::new(SentimentLabel::Negative, 1.0)),
            Duration::from_secs(1),
        );
        let orchestrator = orchestrator_with(registry, scorer).await;

        let response = orchestrator
            .process_message_for_user("u1", MessageRequest::new("Me encanta"))
            .await
            .unwrap();
        assert_eq!(response.score, 1.0);
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_keywords() {
        let registry = BrainRegistry::new("mock").with("mock", Arc::new(EchoBrain::new()));
        let scorer = SentimentScorer::with_classifier(
            Arc::new(FixedClassifier::failing()),
            Duration::from_secs(1),
        );
        let orchestrator = orchestrator_with(registry, scorer).await;

        let response = orchestrator
            .process_message_for_user("u1", MessageRequest::new("Me encanta"))
            .await
            .unwrap();
        let expected = SentimentScorer::keywords_only().score("Me encanta").await;
        assert_eq!(response.score, expected);
        assert!(response.score > 5.0);
    }

    #[tokio::test]
    async fn test_append_history_rescoring() {
        let (orchestrator, _) = echo_orchestrator().await;
        let user = orchestrator.ensure_user("u1").await.unwrap();
        let chat_id = user.chat.id;

        let chat = orchestrator
            .append_history(
                &chat_id,
                HistoryUpdate::One(json!({"message": "Excelente, gracias", "response": "ok"})),
                None,
            )
            .await
            .unwrap();
        let positive = chat.score.unwrap();
        assert!(positive > 5.0);

        // Override wins.
        let chat = orchestrator
            .append_history(&chat_id, HistoryUpdate::One(json!("terrible")), Some(9.0))
            .await
            .unwrap();
        assert_eq!(chat.score, Some(9.0));

        // Empty batch keeps the score.
        let chat = orchestrator
            .append_history(&chat_id, HistoryUpdate::Many(vec![]), None)
            .await
            .unwrap();
        assert_eq!(chat.score, Some(9.0));
        assert_eq!(chat.messages.len(), 2);

        // Batch is scored on its last entry.
        let chat = orchestrator
            .append_history(
                &chat_id,
                HistoryUpdate::Many(vec![json!("excelente"), json!("terrible")]),
                None,
            )
            .await
            .unwrap();
        assert!(chat.score.unwrap() < 5.0);
    }

    #[tokio::test]
    async fn test_overwrite_chat() {
        let (orchestrator, _) = echo_orchestrator().await;
        let user = orchestrator.ensure_user("u1").await.unwrap();

        let chat = orchestrator
            .overwrite_chat(&user.chat.id, Some(json!(["a"])), Some(3.0))
            .await
            .unwrap();
        assert_eq!(chat.messages, History::List(vec![json!("a")]));
        assert_eq!(chat.score, Some(3.0));

        let result = orchestrator
            .overwrite_chat(&user.chat.id, None, Some(f64::NAN))
            .await;
        assert!(matches!(result, Err(OrchestratorError::Validation(_))));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let (orchestrator, _) = echo_orchestrator().await;

        let created = orchestrator.ensure_user("42").await.unwrap();
        let again = orchestrator.ensure_user("42").await.unwrap();
        assert_eq!(created.chat.id, again.chat.id);

        assert!(matches!(
            orchestrator.get_user("43").await,
            Err(OrchestratorError::NotFound(_))
        ));
        assert_eq!(orchestrator.user_messages("43").await.unwrap(), json!([]));
        assert_eq!(orchestrator.user_messages("42").await.unwrap(), json!([]));
        assert!(matches!(
            orchestrator.chat_messages("missing").await,
            Err(OrchestratorError::NotFound(_))
        ));
        assert!(matches!(
            orchestrator.ensure_user(" ").await,
            Err(OrchestratorError::Validation(_))
        ));
    }

    #[test]
    fn test_scoring_text() {
        assert_eq!(scoring_text(&json!({"message": "hola"})), "hola");
        assert_eq!(scoring_text(&json!("texto")), "texto");
        assert_eq!(scoring_text(&json!(5)), "5");
        assert_eq!(scoring_text(&json!({"text": "x"})), r#"{"text":"x"}"#);
    }
}
