//! Chat routes, addressed by chat id.

use axum::extract::{Path, State};
use axum::Json;
use database::HistoryUpdate;
use orchestrator::{ChatSummary, ChatView, MessageRequest, MessageResponse};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::routes::users::Messages;
use crate::state::AppState;

/// Body of the administrative overwrite.
///
/// An explicit `"mensajes": null` clears the history; an absent field leaves
/// it alone.
#[derive(Deserialize)]
pub struct ChatOverwrite {
    #[serde(default, deserialize_with = "present")]
    pub mensajes: Option<Value>,
    #[serde(default)]
    pub score: Option<f64>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Body of an append: a single entry or a list of entries.
#[derive(Deserialize)]
pub struct HistoryAppend {
    pub mensajes: Value,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Serialize)]
pub struct Score {
    pub score: Option<f64>,
}

/// Every chat with its owner's `doc_id` and score.
pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<ChatSummary>>> {
    Ok(Json(state.orchestrator.list_chats().await?))
}

/// Send a message to LEAN BOT.
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    JsonBody(request): JsonBody<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    Ok(Json(
        state.orchestrator.process_message(&chat_id, request).await?,
    ))
}

/// Replace history and/or score wholesale.
pub async fn overwrite_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    JsonBody(body): JsonBody<ChatOverwrite>,
) -> Result<Json<ChatView>> {
    let chat = state
        .orchestrator
        .overwrite_chat(&chat_id, body.mensajes, body.score)
        .await?;
    Ok(Json(chat.into()))
}

/// Append entries to the history.
pub async fn append_history(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    JsonBody(body): JsonBody<HistoryAppend>,
) -> Result<Json<ChatView>> {
    let chat = state
        .orchestrator
        .append_history(&chat_id, HistoryUpdate::from(body.mensajes), body.score)
        .await?;
    Ok(Json(chat.into()))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Messages>> {
    let mensajes = state.orchestrator.chat_messages(&chat_id).await?;
    Ok(Json(Messages { mensajes }))
}

pub async fn get_score(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Score>> {
    let score = state.orchestrator.chat_score(&chat_id).await?;
    Ok(Json(Score { score }))
}
