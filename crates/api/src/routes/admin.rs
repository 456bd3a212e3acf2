//! Admin panel routes.

use axum::extract::State;
use axum::Json;
use orchestrator::{AdminStats, ChatSummary};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AllChats {
    pub chats: Vec<ChatSummary>,
}

/// Every chat, with unscored exchanges scored on read.
pub async fn all_chats(State(state): State<AppState>) -> Result<Json<AllChats>> {
    let chats = state.orchestrator.all_chats_admin().await?;
    Ok(Json(AllChats { chats }))
}

/// Every chat as stored.
pub async fn chats(State(state): State<AppState>) -> Result<Json<Vec<ChatSummary>>> {
    Ok(Json(state.orchestrator.list_chats().await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>> {
    Ok(Json(state.orchestrator.admin_stats().await?))
}
