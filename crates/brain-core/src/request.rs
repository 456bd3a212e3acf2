//! Generation request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of past exchanges passed to a provider.
pub const CONTEXT_TURNS: usize = 5;

/// One past exchange used as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTurn {
    /// What the user wrote.
    pub message: Option<String>,
    /// What the bot replied.
    pub response: Option<String>,
}

impl ContextTurn {
    /// Read `message`/`response` from a stored history entry.
    ///
    /// Entries that are not objects, or carry neither field, yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let turn = Self {
            message: field("message"),
            response: field("response"),
        };
        if turn.message.is_none() && turn.response.is_none() {
            return None;
        }
        Some(turn)
    }
}

/// Build a context window from the tail of a history.
///
/// Takes the last [`CONTEXT_TURNS`] entries, then drops those that are not
/// exchanges.
pub fn context_from_history(entries: &[Value]) -> Vec<ContextTurn> {
    let start = entries.len().saturating_sub(CONTEXT_TURNS);
    entries[start..]
        .iter()
        .filter_map(ContextTurn::from_value)
        .collect()
}

/// Everything a provider needs to produce one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The new user message.
    pub message: String,
    /// Past exchanges, oldest first.
    pub context: Vec<ContextTurn>,
    /// Per-request API key; wins over the provider's configured key.
    pub api_key: Option<String>,
}

impl GenerationRequest {
    /// A request without context or credential.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Attach context built from stored history entries.
    pub fn with_history(mut self, entries: &[Value]) -> Self {
        self.context = context_from_history(entries);
        self
    }

    /// Attach a per-request API key.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// The request key if present, else `fallback`.
    pub fn resolve_api_key<'a>(&'a self, fallback: Option<&'a str>) -> Option<&'a str> {
        self.api_key.as_deref().or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_keeps_last_five() {
        let entries: Vec<Value> = (0..8)
            .map(|i| json!({"message": format!("m{}", i), "response": format!("r{}", i)}))
            .collect();

        let context = context_from_history(&entries);
        assert_eq!(context.len(), CONTEXT_TURNS);
        assert_eq!(context[0].message.as_deref(), Some("m3"));
        assert_eq!(context[4].response.as_deref(), Some("r7"));
    }

    #[test]
    fn test_context_skips_non_exchanges() {
        let entries = vec![
            json!("legacy text"),
            json!({"message": "hola"}),
            json!({"other": 1}),
        ];

        let context = context_from_history(&entries);
        assert_eq!(
            context,
            vec![ContextTurn {
                message: Some("hola".into()),
                response: None
            }]
        );
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let request = GenerationRequest::new("hola").with_api_key(Some("  ".into()));
        assert_eq!(request.api_key, None);
        assert_eq!(request.resolve_api_key(Some("env")), Some("env"));

        let request = GenerationRequest::new("hola").with_api_key(Some("req".into()));
        assert_eq!(request.resolve_api_key(Some("env")), Some("req"));
    }
}
