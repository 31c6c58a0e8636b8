//! Conversation store: user_id → ordered turns.
//!
//! History lives in process memory only; a restart drops every running story.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::observability::GameEvent;

use super::message::Turn;

/// Keyed, append-only transcript per user. Backends must keep insertion order.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Copy of the transcript; empty for unknown users.
    async fn get(&self, user_id: &str) -> Result<Vec<Turn>>;

    /// Append turns after the existing transcript, creating it when absent.
    async fn append(&self, user_id: &str, turns: Vec<Turn>) -> Result<()>;

    /// Reset the transcript to empty.
    async fn clear(&self, user_id: &str) -> Result<()>;

    /// Swap the whole transcript for `turns` in one step. Either the old
    /// transcript or the new one is visible, never an empty gap between them.
    async fn replace(&self, user_id: &str, turns: Vec<Turn>) -> Result<()>;

    /// Turn count without copying the transcript.
    async fn len(&self, user_id: &str) -> Result<usize> {
        Ok(self.get(user_id).await?.len())
    }

    /// Number of users with a non-empty transcript.
    async fn session_count(&self) -> Result<usize>;

    fn backend_name(&self) -> &'static str;
}

/// Process-wide in-memory store.
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    inner: Arc<RwLock<HashMap<String, Vec<Turn>>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        tracing::info!(
            event = GameEvent::SessionStoreInitialized.as_str(),
            backend = "memory",
            "conversation store initialized"
        );
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, user_id: &str) -> Result<Vec<Turn>> {
        let g = self.inner.read().await;
        let turns = g.get(user_id).cloned().unwrap_or_default();
        tracing::debug!(
            event = GameEvent::SessionTurnsLoaded.as_str(),
            user_id,
            loaded_turns = turns.len(),
            backend = "memory",
            "conversation turns loaded"
        );
        Ok(turns)
    }

    async fn append(&self, user_id: &str, turns: Vec<Turn>) -> Result<()> {
        if turns.is_empty() {
            return Ok(());
        }
        let mut g = self.inner.write().await;
        let entry = g.entry(user_id.to_string()).or_default();
        entry.extend(turns);
        tracing::debug!(
            event = GameEvent::SessionTurnsAppended.as_str(),
            user_id,
            total_turns = entry.len(),
            backend = "memory",
            "conversation turns appended"
        );
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<()> {
        let mut g = self.inner.write().await;
        g.remove(user_id);
        tracing::debug!(
            event = GameEvent::SessionTurnsCleared.as_str(),
            user_id,
            backend = "memory",
            "conversation turns cleared"
        );
        Ok(())
    }

    async fn replace(&self, user_id: &str, turns: Vec<Turn>) -> Result<()> {
        let mut g = self.inner.write().await;
        let total_turns = turns.len();
        if turns.is_empty() {
            g.remove(user_id);
        } else {
            g.insert(user_id.to_string(), turns);
        }
        tracing::debug!(
            event = GameEvent::SessionTurnsReplaced.as_str(),
            user_id,
            total_turns,
            backend = "memory",
            "conversation turns replaced"
        );
        Ok(())
    }

    async fn len(&self, user_id: &str) -> Result<usize> {
        let g = self.inner.read().await;
        Ok(g.get(user_id).map_or(0, Vec::len))
    }

    async fn session_count(&self) -> Result<usize> {
        Ok(self.inner.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
