//! ResetChatHandler - Start the intake conversation over

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionId;
use crate::domain::intake::{ConversationState, WELCOME_PROMPT};
use crate::ports::{SessionStateStorage, SessionStorageError};

/// Command to reset a chat. Without a session id a new session is created.
#[derive(Debug, Clone, Default)]
pub struct ResetChatCommand {
    pub session_id: Option<SessionId>,
}

/// Result of resetting a chat
#[derive(Debug, Clone)]
pub struct ResetChatResult {
    pub session_id: SessionId,
    pub response: &'static str,
}

/// Error type for resetting chats
#[derive(Debug, Clone)]
pub enum ResetChatError {
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for ResetChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetChatError::Storage(err) => write!(f, "Reset error: {}", err),
        }
    }
}

impl std::error::Error for ResetChatError {}

impl From<SessionStorageError> for ResetChatError {
    fn from(err: SessionStorageError) -> Self {
        ResetChatError::Storage(err.to_string())
    }
}

/// Handler for resetting chats
pub struct ResetChatHandler {
    storage: Arc<dyn SessionStateStorage>,
}

impl ResetChatHandler {
    pub fn new(storage: Arc<dyn SessionStateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, cmd: ResetChatCommand) -> Result<ResetChatResult, ResetChatError> {
        let session_id = cmd.session_id.unwrap_or_default();
        let state = ConversationState::new(session_id);

        self.storage.save_state(session_id, &state).await?;
        info!(session_id = %session_id, "Chat reset");

        Ok(ResetChatResult {
            session_id,
            response: WELCOME_PROMPT,
        })
    }
}
