//! Per-chat write locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard held while a chat is being written.
pub type ChatGuard = OwnedMutexGuard<()>;

/// Map of chat id to async mutex.
///
/// Entries nobody holds or waits on are pruned whenever a new lock is handed
/// out, so the map stays proportional to the number of chats being written.
#[derive(Debug, Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `chat_id`.
    pub async fn lock(&self, chat_id: &str) -> ChatGuard {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.retain(|id, m| id == chat_id || Arc::strong_count(m) > 1);
            Arc::clone(map.entry(chat_id.to_string()).or_default())
        };
        mutex.lock_owned().await
    }

    /// Number of chats currently tracked.
    pub fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
