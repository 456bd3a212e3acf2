//! SQLite persistence layer for LEAN BOT.
//!
//! This crate stores users and their chats using SQLx with SQLite. Each user
//! owns exactly one chat; a chat holds a JSON message history and the
//! sentiment score of its latest entry.
//!
//! # Example
//!
//! ```no_run
//! use database::{chat, user, Database, HistoryUpdate};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:leanbot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a user and append to its chat
//!     let (user, _chat) = user::create_user_with_chat(db.pool(), "12345").await?;
//!     let update = HistoryUpdate::One(json!({"message": "Hola"}));
//!     chat::append_history(&db, &user.chat_id, update, Some(5.0)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod error;
pub mod history;
pub mod locks;
pub mod models;
pub mod user;

pub use error::{DatabaseError, Result};
pub use history::{merge, History, HistoryUpdate, MergeOutcome};
pub use locks::{ChatGuard, ChatLocks};
pub use models::{Chat, ChatWithOwner, MessageExchange, User};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

/// Database connection wrapper.
///
/// Cloning is cheap; clones share the pool and the per-chat lock map.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    locks: Arc<ChatLocks>,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/leanbot.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; use a single connection so every
    /// // query sees the same database)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self {
            pool,
            locks: Arc::new(ChatLocks::new()),
        })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for exclusive write access to one chat.
    pub async fn lock_chat(&self, chat_id: &str) -> ChatGuard {
        self.locks.lock(chat_id).await
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
