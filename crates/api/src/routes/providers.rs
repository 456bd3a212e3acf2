//! Provider listing, probe and runtime credential routes.

use axum::extract::State;
use axum::Json;
use orchestrator::{ProbeResult, ProviderList};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Default, Deserialize)]
pub struct ProbeRequest {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
pub struct ApiKeyRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Serialize)]
pub struct Status {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn list_providers(State(state): State<AppState>) -> Json<ProviderList> {
    Json(state.orchestrator.providers().await)
}

/// Run a probe generation against a provider.
pub async fn test_provider(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProbeRequest>,
) -> Result<Json<ProbeResult>> {
    let result = state
        .orchestrator
        .probe_provider(body.provider.as_deref(), body.api_key.as_deref())
        .await?;
    Ok(Json(result))
}

/// Set the Gemini key used when a request carries none.
///
/// The key lives in process memory only.
pub async fn set_gemini_api_key(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ApiKeyRequest>,
) -> Result<Json<Status>> {
    let key = body.api_key.unwrap_or_default();
    if !state.orchestrator.credentials().set_gemini_key(&key).await {
        return Err(ApiError::BadRequest("API key vacía".to_string()));
    }

    Ok(Json(Status {
        status: "success",
        message: "API key configurada correctamente",
    }))
}
