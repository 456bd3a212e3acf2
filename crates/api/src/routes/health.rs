//! Health check endpoints.

use axum::Json;
use serde::Serialize;

const STATUS_MESSAGE: &str = "LEAN BOT API funcionando correctamente";

#[derive(Serialize)]
pub struct Root {
    pub message: &'static str,
    pub cors: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct Health {
    pub message: &'static str,
    pub status: &'static str,
}

/// Root endpoint.
pub async fn root() -> Json<Root> {
    Json(Root {
        message: STATUS_MESSAGE,
        cors: "enabled",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        message: STATUS_MESSAGE,
        status: "healthy",
    })
}
