//! Session State Storage Port - Interface for persisting intake state.
//!
//! This port defines how a session's conversation state is saved and
//! loaded between requests. Adapters exist for process memory and for
//! YAML files on disk.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::intake::ConversationState;

/// Errors that can occur during state storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStorageError {
    #[error("State not found for session: {0}")]
    NotFound(SessionId),

    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading conversation state
#[async_trait]
pub trait SessionStateStorage: Send + Sync {
    /// Save conversation state, replacing any previous state for the session
    ///
    /// # Errors
    /// Returns `SessionStorageError` if save fails
    async fn save_state(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), SessionStorageError>;

    /// Load conversation state
    ///
    /// # Errors
    /// Returns `SessionStorageError::NotFound` if no state exists
    async fn load_state(&self, session_id: SessionId)
        -> Result<ConversationState, SessionStorageError>;

    /// Check if state exists for a session
    async fn exists(&self, session_id: SessionId) -> Result<bool, SessionStorageError>;

    /// Delete the state for a session. Deleting a missing session is not an error.
    async fn delete(&self, session_id: SessionId) -> Result<(), SessionStorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_session() {
        let id = SessionId::new();
        let err = SessionStorageError::NotFound(id);
        assert!(err.to_string().contains("State not found"));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn serialization_error_message() {
        let err = SessionStorageError::SerializationFailed("Invalid YAML".to_string());
        assert!(err.to_string().contains("serialize"));
    }
}
