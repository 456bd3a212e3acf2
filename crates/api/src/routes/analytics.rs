//! Analytics routes. All of them read the in-memory event log.

use analytics::{
    ActiveConversation, ConversationAnalytics, DashboardData, HourlyTrend, SentimentKeywords,
    SentimentMetrics,
};
use axum::extract::{Path, Query, State};
use axum::Json;
use orchestrator::ChatDetails;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

const DEFAULT_HOURS_BACK: i64 = 24;

#[derive(Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub hours_back: Option<i64>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
pub struct HourlyTrends {
    pub hourly_trends: Vec<HourlyTrend>,
}

#[derive(Serialize)]
pub struct Keywords {
    pub sentiment_keywords: SentimentKeywords,
}

#[derive(Serialize)]
pub struct ActiveConversations {
    pub active_conversations: Vec<ActiveConversation>,
}

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardData> {
    Json(state.orchestrator.analytics().dashboard().await)
}

/// Metrics over the last `hours_back` hours (24 by default).
pub async fn metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Json<SentimentMetrics> {
    let hours_back = query.hours_back.unwrap_or(DEFAULT_HOURS_BACK);
    let metrics = state
        .orchestrator
        .analytics()
        .metrics(hours_back, query.conversation_id.as_deref())
        .await;
    Json(metrics)
}

pub async fn conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Json<ConversationAnalytics> {
    Json(
        state
            .orchestrator
            .analytics()
            .conversation_analysis(&conversation_id)
            .await,
    )
}

pub async fn hourly_trends(State(state): State<AppState>) -> Json<HourlyTrends> {
    let dashboard = state.orchestrator.analytics().dashboard().await;
    Json(HourlyTrends {
        hourly_trends: dashboard.hourly_trends,
    })
}

pub async fn keywords(State(state): State<AppState>) -> Json<Keywords> {
    let dashboard = state.orchestrator.analytics().dashboard().await;
    Json(Keywords {
        sentiment_keywords: dashboard.sentiment_keywords,
    })
}

pub async fn active_conversations(State(state): State<AppState>) -> Json<ActiveConversations> {
    let dashboard = state.orchestrator.analytics().dashboard().await;
    Json(ActiveConversations {
        active_conversations: dashboard.active_conversations,
    })
}

/// Per-message sentiment of a user's chat; `found: false` when unknown.
pub async fn chat_details(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<ChatDetails>> {
    Ok(Json(state.orchestrator.chat_details(&doc_id).await?))
}
