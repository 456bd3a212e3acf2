//! HTTP API for the LEAN BOT chatbot backend.
//!
//! Exposes users, chats, the message pipeline, provider management,
//! sentiment scoring and the analytics dashboard as JSON over axum. The
//! `leanbot` binary wires it to SQLite and the configured providers.

pub mod config;
pub mod error;
pub mod extract;
pub mod providers;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;

pub use crate::config::{Config, ConfigError};
pub use crate::error::ApiError;
pub use crate::state::AppState;

/// Build the application with every route and a permissive CORS policy.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(CorsLayer::permissive())
        .with_state(state)
}
