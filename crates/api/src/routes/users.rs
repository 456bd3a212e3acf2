//! User routes, addressed by `doc_id`.

use axum::extract::{Path, State};
use axum::Json;
use orchestrator::{ChatView, MessageRequest, MessageResponse, UserView};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUser {
    #[serde(deserialize_with = "doc_id_text")]
    pub doc_id: String,
}

/// Accept `doc_id` as a JSON string or number, keeping its text.
fn doc_id_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "doc_id must be a string or number, got {}",
            other
        ))),
    }
}

#[derive(Serialize)]
pub struct Messages {
    pub mensajes: Value,
}

/// Create a user with its chat, or return the existing one.
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUser>,
) -> Result<Json<UserView>> {
    Ok(Json(state.orchestrator.ensure_user(&body.doc_id).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<UserView>> {
    Ok(Json(state.orchestrator.get_user(&doc_id).await?))
}

pub async fn get_user_chat(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<ChatView>> {
    Ok(Json(state.orchestrator.user_chat(&doc_id).await?))
}

/// Messages of a user's chat; an empty list for unknown users.
pub async fn get_user_messages(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<Messages>> {
    let mensajes = state.orchestrator.user_messages(&doc_id).await?;
    Ok(Json(Messages { mensajes }))
}

/// Send a message as `doc_id`, creating the user on first contact.
pub async fn send_user_message(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    JsonBody(request): JsonBody<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    let response = state
        .orchestrator
        .process_message_for_user(&doc_id, request)
        .await?;
    Ok(Json(response))
}
