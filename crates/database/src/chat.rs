//! Chat operations.
//!
//! Writes to one chat are serialized through the [`Database`] lock map and
//! run inside a single transaction, so concurrent appends never lose an
//! entry.

use serde_json::Value;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{DatabaseError, Result};
use crate::history::{self, History, HistoryUpdate};
use crate::models::{Chat, ChatRow, ChatWithOwner};
use crate::Database;

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Get a chat by id.
pub async fn get_chat(pool: &SqlitePool, id: &str) -> Result<Chat> {
    sqlx::query_as::<_, ChatRow>(
        r#"
        SELECT id, messages, score, created_at, updated_at
        FROM chats
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::chat_not_found(id))?
    .into_chat()
}

/// Get the stored score of a chat.
pub async fn get_score(pool: &SqlitePool, id: &str) -> Result<Option<f64>> {
    sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT score
        FROM chats
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::chat_not_found(id))
}

/// Bump `updated_at` as the first statement of a write transaction.
///
/// Starting with a write takes SQLite's write lock before the history is
/// read, so the read cannot go stale. Fails with `NotFound` for unknown ids.
async fn touch(tx: &mut Transaction<'_, Sqlite>, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE chats
        SET updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(now())
    .bind(id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::chat_not_found(id));
    }
    Ok(())
}

async fn fetch_in_tx(tx: &mut Transaction<'_, Sqlite>, id: &str) -> Result<Chat> {
    sqlx::query_as::<_, ChatRow>(
        r#"
        SELECT id, messages, score, created_at, updated_at
        FROM chats
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(&mut **tx)
    .await?
    .into_chat()
}

/// Append `update` to the chat history.
///
/// `score`, when given, replaces the stored score; otherwise the score is
/// left unchanged. Returns the chat as committed.
pub async fn append_history(
    db: &Database,
    id: &str,
    update: HistoryUpdate,
    score: Option<f64>,
) -> Result<Chat> {
    let _guard = db.lock_chat(id).await;
    let mut tx = db.pool().begin().await?;

    touch(&mut tx, id).await?;

    let raw = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT messages
        FROM chats
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let current = History::from_column(raw.as_deref())?;
    let before = current.len();
    let outcome = history::merge(current, update);

    sqlx::query(
        r#"
        UPDATE chats
        SET messages = ?, score = COALESCE(?, score)
        WHERE id = ?
        "#,
    )
    .bind(outcome.history.to_column()?)
    .bind(score)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let chat = fetch_in_tx(&mut tx, id).await?;
    tx.commit().await?;

    tracing::debug!(
        chat_id = id,
        before,
        after = chat.messages.len(),
        score = ?chat.score,
        "Appended chat history"
    );
    Ok(chat)
}

/// Replace the history and/or score of a chat wholesale.
///
/// `None` leaves a field unchanged; `Some(Value::Null)` clears the history.
pub async fn overwrite_chat(
    db: &Database,
    id: &str,
    messages: Option<Value>,
    score: Option<f64>,
) -> Result<Chat> {
    let _guard = db.lock_chat(id).await;
    let mut tx = db.pool().begin().await?;

    touch(&mut tx, id).await?;

    if let Some(messages) = messages {
        sqlx::query(
            r#"
            UPDATE chats
            SET messages = ?
            WHERE id = ?
            "#,
        )
        .bind(History::from_value(messages).to_column()?)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(score) = score {
        sqlx::query(
            r#"
            UPDATE chats
            SET score = ?
            WHERE id = ?
            "#,
        )
        .bind(score)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    let chat = fetch_in_tx(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(chat_id = id, entries = chat.messages.len(), "Overwrote chat");
    Ok(chat)
}

#[derive(sqlx::FromRow)]
struct OwnedChatRow {
    doc_id: Option<String>,
    #[sqlx(flatten)]
    chat: ChatRow,
}

/// Every chat with the `doc_id` of its owner, oldest first.
pub async fn list_chats_with_owner(pool: &SqlitePool) -> Result<Vec<ChatWithOwner>> {
    let rows = sqlx::query_as::<_, OwnedChatRow>(
        r#"
        SELECT u.doc_id, c.id, c.messages, c.score, c.created_at, c.updated_at
        FROM chats c
        LEFT JOIN users u ON u.chat_id = c.id
        ORDER BY c.created_at, c.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            Ok(ChatWithOwner {
                doc_id: row.doc_id,
                chat: row.chat.into_chat()?,
            })
        })
        .collect()
}

/// Count chats.
pub async fn count_chats(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chats
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user;
    use serde_json::json;
    use std::sync::Arc;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn new_chat(db: &Database, doc_id: &str) -> String {
        let (user, _) = user::create_user_with_chat(db.pool(), doc_id).await.unwrap();
        user.chat_id
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let db = test_db().await;
        let chat_id = new_chat(&db, "u1").await;

        for message in ["E1", "E2", "E3"] {
            append_history(&db, &chat_id, HistoryUpdate::One(json!(message)), None)
                .await
                .unwrap();
        }

        let chat = get_chat(db.pool(), &chat_id).await.unwrap();
        assert_eq!(
            chat.messages,
            History::List(vec![json!("E1"), json!("E2"), json!("E3")])
        );
    }

    #[tokio::test]
    async fn test_append_sets_score_only_when_given() {
        let db = test_db().await;
        let chat_id = new_chat(&db, "u1").await;

        let chat = append_history(&db, &chat_id, HistoryUpdate::One(json!("a")), Some(8.5))
            .await
            .unwrap();
        assert_eq!(chat.score, Some(8.5));

        let chat = append_history(&db, &chat_id, HistoryUpdate::One(json!("b")), None)
            .await
            .unwrap();
        assert_eq!(chat.score, Some(8.5));
        assert_eq!(get_score(db.pool(), &chat_id).await.unwrap(), Some(8.5));
    }

    #[tokio::test]
    async fn test_append_batch_and_empty_batch() {
        let db = test_db().await;
        let chat_id = new_chat(&db, "u1").await;

        append_history(
            &db,
            &chat_id,
            HistoryUpdate::Many(vec![json!(1), json!(2)]),
            None,
        )
        .await
        .unwrap();
        let chat = append_history(&db, &chat_id, HistoryUpdate::Many(vec![]), None)
            .await
            .unwrap();

        assert_eq!(chat.messages, History::List(vec![json!(1), json!(2)]));
    }

    #[tokio::test]
    async fn test_append_to_legacy_scalar() {
        let db = test_db().await;
        let chat_id = new_chat(&db, "u1").await;

        overwrite_chat(&db, &chat_id, Some(json!("legacy")), None)
            .await
            .unwrap();
        let chat = append_history(&db, &chat_id, HistoryUpdate::One(json!("new")), None)
            .await
            .unwrap();

        assert_eq!(
            chat.messages,
            History::List(vec![json!("legacy"), json!("new")])
        );
    }

    #[tokio::test]
    async fn test_unknown_chat() {
        let db = test_db().await;

        let result = append_history(&db, "missing", HistoryUpdate::One(json!("x")), None).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = overwrite_chat(&db, "missing", None, Some(5.0)).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = get_score(db.pool(), "missing").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_wholesale() {
        let db = test_db().await;
        let chat_id = new_chat(&db, "u1").await;

        append_history(&db, &chat_id, HistoryUpdate::One(json!("a")), Some(7.0))
            .await
            .unwrap();

        let chat = overwrite_chat(&db, &chat_id, Some(json!(["x", "y"])), None)
            .await
            .unwrap();
        assert_eq!(chat.messages, History::List(vec![json!("x"), json!("y")]));
        assert_eq!(chat.score, Some(7.0));

        let chat = overwrite_chat(&db, &chat_id, Some(Value::Null), Some(2.0))
            .await
            .unwrap();
        assert_eq!(chat.messages, History::Absent);
        assert_eq!(chat.score, Some(2.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_both_persist() {
        let db = Arc::new(test_db().await);
        let chat_id = new_chat(&db, "u1").await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let db = Arc::clone(&db);
            let chat_id = chat_id.clone();
            handles.push(tokio::spawn(async move {
                append_history(&db, &chat_id, HistoryUpdate::One(json!(i)), None)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let chat = get_chat(db.pool(), &chat_id).await.unwrap();
        let mut values: Vec<i64> = chat
            .messages
            .entries()
            .iter()
            .filter_map(|v| v.as_i64())
            .collect();
        values.sort_unstable();
        assert_eq!(values, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_list_chats_with_owner() {
        let db = test_db().await;
        let chat_a = new_chat(&db, "a").await;
        new_chat(&db, "b").await;

        append_history(&db, &chat_a, HistoryUpdate::One(json!("hola")), Some(6.0))
            .await
            .unwrap();

        let chats = list_chats_with_owner(db.pool()).await.unwrap();
        assert_eq!(chats.len(), 2);
        let a = chats
            .iter()
            .find(|c| c.doc_id.as_deref() == Some("a"))
            .unwrap();
        assert_eq!(a.chat.score, Some(6.0));
        assert_eq!(count_chats(db.pool()).await.unwrap(), 2);
    }
}
