//! Route handlers for the LEAN BOT API.

pub mod admin;
pub mod analytics;
pub mod chats;
pub mod health;
pub mod providers;
pub mod sentiment;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Users
        .route("/usuarios/", post(users::create_user))
        .route("/usuarios/:doc_id", get(users::get_user))
        .route("/usuarios/:doc_id/chat", get(users::get_user_chat))
        .route("/usuarios/:doc_id/messages", get(users::get_user_messages))
        .route("/usuarios/:doc_id/message", post(users::send_user_message))
        // Chats
        .route("/chats/", get(chats::list_chats))
        .route(
            "/chats/:chat_id",
            post(chats::send_message).put(chats::overwrite_chat),
        )
        .route("/chats/:chat_id/history", post(chats::append_history))
        .route("/chats/:chat_id/messages", get(chats::get_messages))
        .route("/chats/:chat_id/score", get(chats::get_score))
        // Admin panel
        .route("/admin/all-chats", get(admin::all_chats))
        .route("/admin/chats", get(admin::chats))
        .route("/admin/stats", get(admin::stats))
        // Providers and credentials
        .route("/ai/providers", get(providers::list_providers))
        .route("/ai/test", post(providers::test_provider))
        .route("/config/gemini_api_key", post(providers::set_gemini_api_key))
        // Sentiment
        .route("/sentiment/analyze", post(sentiment::analyze))
        .route("/sentiment/model-info", get(sentiment::model_info))
        .route("/test/sentiment", post(sentiment::self_test))
        // Analytics
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/metrics", get(analytics::metrics))
        .route(
            "/analytics/conversation/:conversation_id",
            get(analytics::conversation),
        )
        .route("/analytics/trends/hourly", get(analytics::hourly_trends))
        .route("/analytics/keywords", get(analytics::keywords))
        .route(
            "/analytics/conversations/active",
            get(analytics::active_conversations),
        )
        .route("/analytics/chat-details/:doc_id", get(analytics::chat_details))
}
