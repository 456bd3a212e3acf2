//! Sentiment routes.

use axum::extract::State;
use axum::Json;
use orchestrator::SelfTestReport;
use sentiment::{ModelInfo, SentimentAnalysis};
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Score a text and record it for the dashboard.
pub async fn analyze(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AnalyzeRequest>,
) -> Result<Json<SentimentAnalysis>> {
    let analysis = state
        .orchestrator
        .analyze_text(
            &body.text,
            body.user_id.as_deref(),
            body.conversation_id.as_deref(),
        )
        .await?;
    Ok(Json(analysis))
}

pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.orchestrator.scorer().model_info())
}

/// Score the canned self-test texts.
pub async fn self_test(State(state): State<AppState>) -> Json<SelfTestReport> {
    Json(state.orchestrator.sentiment_self_test().await)
}
