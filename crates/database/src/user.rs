//! User operations. Every user is created together with its chat.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Chat, ChatRow, User};

/// Create a user and its empty chat in one transaction.
pub async fn create_user_with_chat(pool: &SqlitePool, doc_id: &str) -> Result<(User, Chat)> {
    let user_id = Uuid::new_v4().to_string();
    let chat_id = Uuid::new_v4().to_string();

    let mut tx = pool.begin().await?;

    let chat = sqlx::query_as::<_, ChatRow>(
        r#"
        INSERT INTO chats (id)
        VALUES (?)
        RETURNING id, messages, score, created_at, updated_at
        "#,
    )
    .bind(&chat_id)
    .fetch_one(&mut *tx)
    .await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, doc_id, chat_id)
        VALUES (?, ?, ?)
        RETURNING id, doc_id, chat_id, created_at
        "#,
    )
    .bind(&user_id)
    .bind(doc_id)
    .bind(&chat_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: doc_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tx.commit().await?;

    tracing::info!(doc_id, user_id = %user.id, chat_id = %chat_id, "Created user and chat");
    Ok((user, chat.into_chat()?))
}

/// Get a user by `doc_id`.
pub async fn get_user_by_doc_id(pool: &SqlitePool, doc_id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, doc_id, chat_id, created_at
        FROM users
        WHERE doc_id = ?
        "#,
    )
    .bind(doc_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::user_not_found(doc_id))
}

/// Get the user owning `chat_id`.
pub async fn get_user_by_chat_id(pool: &SqlitePool, chat_id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, doc_id, chat_id, created_at
        FROM users
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: chat_id.to_string(),
    })
}

/// Get the user for `doc_id`, creating it (and its chat) if unknown.
///
/// Returns whether the user was created. A concurrent creation of the same
/// `doc_id` resolves to the row that won.
pub async fn get_or_create_user(pool: &SqlitePool, doc_id: &str) -> Result<(User, bool)> {
    match get_user_by_doc_id(pool, doc_id).await {
        Ok(user) => return Ok((user, false)),
        Err(DatabaseError::NotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    match create_user_with_chat(pool, doc_id).await {
        Ok((user, _)) => Ok((user, true)),
        Err(DatabaseError::AlreadyExists { .. }) => {
            Ok((get_user_by_doc_id(pool, doc_id).await?, false))
        }
        Err(e) => Err(e),
    }
}

/// Delete a user and its chat.
pub async fn delete_user(pool: &SqlitePool, doc_id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    let chat_id = sqlx::query_scalar::<_, String>(
        r#"
        DELETE FROM users
        WHERE doc_id = ?
        RETURNING chat_id
        "#,
    )
    .bind(doc_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DatabaseError::user_not_found(doc_id))?;

    sqlx::query(
        r#"
        DELETE FROM chats
        WHERE id = ?
        "#,
    )
    .bind(&chat_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(doc_id, chat_id = %chat_id, "Deleted user and chat");
    Ok(())
}

/// List all users, oldest first.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, doc_id, chat_id, created_at
        FROM users
        ORDER BY created_at, doc_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Count distinct users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(DISTINCT doc_id) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
