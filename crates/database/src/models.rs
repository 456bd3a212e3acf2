//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Result;
use crate::history::History;

/// A user, identified externally by an opaque `doc_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Generated UUID.
    pub id: String,
    /// External document id, compared as an exact string.
    pub doc_id: String,
    /// The chat this user owns.
    pub chat_id: String,
    pub created_at: String,
}

/// Raw `chats` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ChatRow {
    pub id: String,
    pub messages: Option<String>,
    pub score: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl ChatRow {
    pub(crate) fn into_chat(self) -> Result<Chat> {
        Ok(Chat {
            messages: History::from_column(self.messages.as_deref())?,
            id: self.id,
            score: self.score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A chat with its decoded history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chat {
    pub id: String,
    pub messages: History,
    /// Sentiment score of the latest appended entry, in `[1, 10]`.
    pub score: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A chat together with the `doc_id` of its owner, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatWithOwner {
    pub doc_id: Option<String>,
    pub chat: Chat,
}

/// One turn of a conversation as stored in a chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageExchange {
    /// What the user wrote.
    pub message: String,
    /// What the bot replied.
    pub response: String,
    /// Sentiment score of `message`.
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

impl MessageExchange {
    /// Create an exchange stamped with the current time.
    pub fn new(message: impl Into<String>, response: impl Into<String>, score: f64) -> Self {
        Self {
            message: message.into(),
            response: response.into(),
            score,
            timestamp: Utc::now(),
        }
    }
}
