//! In-Memory Session Storage Adapter
//!
//! Stores conversation state in process memory. Used when no state
//! directory is configured, and in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::intake::ConversationState;
use crate::ports::{SessionStateStorage, SessionStorageError};

/// In-memory storage for conversation state
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    states: Arc<RwLock<HashMap<SessionId, ConversationState>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored sessions
    pub async fn clear(&self) {
        self.states.write().await.clear();
    }

    /// Number of stored sessions
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl SessionStateStorage for InMemorySessionStorage {
    async fn save_state(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), SessionStorageError> {
        let mut states = self.states.write().await;
        states.insert(session_id, state.clone());
        Ok(())
    }

    async fn load_state(
        &self,
        session_id: SessionId,
    ) -> Result<ConversationState, SessionStorageError> {
        let states = self.states.read().await;
        states
            .get(&session_id)
            .cloned()
            .ok_or(SessionStorageError::NotFound(session_id))
    }

    async fn exists(&self, session_id: SessionId) -> Result<bool, SessionStorageError> {
        let states = self.states.read().await;
        Ok(states.contains_key(&session_id))
    }

    async fn delete(&self, session_id: SessionId) -> Result<(), SessionStorageError> {
        self.states.write().await.remove(&session_id);
        Ok(())
    }
}
