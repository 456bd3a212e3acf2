//! Runtime credential override.

use tokio::sync::RwLock;
use tracing::info;

/// Provider name the runtime override applies to.
pub const GEMINI_PROVIDER: &str = "gemini";

/// The Gemini API key set at runtime, if any.
///
/// Lives in application state for the life of the process and is never
/// persisted. Per-request keys are passed as parameters and never stored
/// here.
#[derive(Debug, Default)]
pub struct CredentialStore {
    gemini_override: RwLock<Option<String>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the override. Returns `false` for a blank key, which is ignored.
    pub async fn set_gemini_key(&self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }

        *self.gemini_override.write().await = Some(key.to_string());
        info!(key_prefix = %key_prefix(key), "Runtime Gemini API key configured");
        true
    }

    pub async fn gemini_key(&self) -> Option<String> {
        self.gemini_override.read().await.clone()
    }

    /// Key to send to `provider`: the request key, then the runtime
    /// override when `provider` is Gemini. `None` lets the provider fall
    /// back to its configured key.
    pub async fn for_provider(&self, provider: &str, request_key: Option<&str>) -> Option<String> {
        if let Some(key) = non_blank(request_key) {
            return Some(key.to_string());
        }
        if provider == GEMINI_PROVIDER {
            return self.gemini_key().await;
        }
        None
    }

    /// Key for the Gemini sentiment classifier.
    ///
    /// A request key only applies when it was meant for Gemini.
    pub async fn for_classifier(&self, provider: &str, request_key: Option<&str>) -> Option<String> {
        if provider == GEMINI_PROVIDER {
            if let Some(key) = non_blank(request_key) {
                return Some(key.to_string());
            }
        }
        self.gemini_key().await
    }
}

fn non_blank(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| !k.is_empty())
}

fn key_prefix(key: &str) -> String {
    let prefix: String = key.chars().take(6).collect();
    format!("{}...", prefix)
}
