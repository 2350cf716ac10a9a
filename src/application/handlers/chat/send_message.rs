//! SendChatMessageHandler - Feed one user message to the intake conversation

use std::sync::Arc;

use tracing::debug;

use crate::application::intake::{
    ChatReply, IntakeError, IntakeSession, ReportInfo, RuleAdjustedPredictor,
};
use crate::domain::foundation::SessionId;
use crate::domain::intake::ConversationState;
use crate::ports::{ReportRenderer, SessionStateStorage, SessionStorageError};

/// Command to send a chat message
#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub session_id: SessionId,
    pub message: String,
}

/// Result of sending a chat message
#[derive(Debug, Clone)]
pub struct SendChatMessageResult {
    pub session_id: SessionId,
    pub reply: ChatReply,
    pub analysis_complete: bool,
    /// Present once the analysis is complete and its report is on disk.
    pub report_info: Option<ReportInfo>,
}

/// Error type for sending chat messages
#[derive(Debug, Clone)]
pub enum SendChatMessageError {
    /// Storage error
    Storage(String),
    /// Conversation error, including prediction failures
    Intake(IntakeError),
}

impl std::fmt::Display for SendChatMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendChatMessageError::Storage(err) => write!(f, "Storage error: {}", err),
            SendChatMessageError::Intake(err) => write!(f, "Chat error: {}", err),
        }
    }
}

impl std::error::Error for SendChatMessageError {}

impl From<SessionStorageError> for SendChatMessageError {
    fn from(err: SessionStorageError) -> Self {
        SendChatMessageError::Storage(err.to_string())
    }
}

impl From<IntakeError> for SendChatMessageError {
    fn from(err: IntakeError) -> Self {
        SendChatMessageError::Intake(err)
    }
}

/// Handler for chat messages
pub struct SendChatMessageHandler {
    storage: Arc<dyn SessionStateStorage>,
    predictor: Arc<RuleAdjustedPredictor>,
    renderer: Arc<dyn ReportRenderer>,
}

impl SendChatMessageHandler {
    pub fn new(
        storage: Arc<dyn SessionStateStorage>,
        predictor: Arc<RuleAdjustedPredictor>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            storage,
            predictor,
            renderer,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendChatMessageCommand,
    ) -> Result<SendChatMessageResult, SendChatMessageError> {
        // 1. Load the conversation, starting one if this session has none
        let state = match self.storage.load_state(cmd.session_id).await {
            Ok(state) => state,
            Err(SessionStorageError::NotFound(id)) => {
                debug!(session_id = %id, "No conversation yet, starting one");
                ConversationState::new(id)
            }
            Err(e) => return Err(e.into()),
        };

        // 2. Advance it
        let mut session =
            IntakeSession::from_state(state, self.predictor.clone(), self.renderer.clone());
        let reply = session.handle_input(&cmd.message).await?;

        // 3. Report info only when the artifact is still there
        let analysis_complete = session.is_complete();
        let report_info = match session.report_path() {
            Some(path) if analysis_complete && self.renderer.exists(path).await => {
                ReportInfo::from_path(path)
            }
            _ => None,
        };

        // 4. Persist
        self.storage
            .save_state(cmd.session_id, session.state())
            .await?;

        Ok(SendChatMessageResult {
            session_id: cmd.session_id,
            reply,
            analysis_complete,
            report_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::classifier::CachedModelHandle;
    use crate::adapters::report::HtmlReportRenderer;
    use crate::adapters::storage::InMemorySessionStorage;
    use crate::application::intake::PredictionError;
    use crate::domain::intake::{Step, WELCOME_PROMPT};
    use crate::ports::ModelLoadError;
    use tempfile::TempDir;

    fn handler(
        storage: Arc<InMemorySessionStorage>,
        model_path: std::path::PathBuf,
        exports: &std::path::Path,
    ) -> SendChatMessageHandler {
        let predictor = RuleAdjustedPredictor::new(Arc::new(CachedModelHandle::new(model_path)));
        SendChatMessageHandler::new(
            storage,
            Arc::new(predictor),
            Arc::new(HtmlReportRenderer::new(exports)),
        )
    }

    fn cmd(session_id: SessionId, message: &str) -> SendChatMessageCommand {
        SendChatMessageCommand {
            session_id,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn starts_conversation_for_unknown_session() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(InMemorySessionStorage::new());
        let handler = handler(storage.clone(), dir.path().join("m.json"), dir.path());
        let session_id = SessionId::new();

        let result = handler.handle(cmd(session_id, "Ada Lovelace")).await.unwrap();

        assert!(matches!(result.reply, ChatReply::Text(_)));
        assert_ne!(result.reply.message(), WELCOME_PROMPT);
        assert!(!result.analysis_complete);
        assert!(result.report_info.is_none());

        let saved = storage.load_state(session_id).await.unwrap();
        assert_eq!(saved.step(), Step::Question(1));
        assert_eq!(saved.answers().name(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn missing_model_surfaces_error_and_keeps_waiting() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(InMemorySessionStorage::new());
        let handler = handler(storage.clone(), dir.path().join("absent.json"), dir.path());
        let session_id = SessionId::new();

        let script = [
            "Ada Lovelace", "36", "female", "yes", "none", "2",
            "no", "yes", "no", "no", "31", "33", "0", "yes", "no",
            "no", "no", "no", "4.5", "8", "normal", "45", "80",
        ];
        for answer in script {
            handler.handle(cmd(session_id, answer)).await.unwrap();
        }

        let err = handler.handle(cmd(session_id, "go")).await.unwrap_err();
        assert!(matches!(
            err,
            SendChatMessageError::Intake(IntakeError::Prediction(PredictionError::ModelLoad(
                ModelLoadError::NotFound { .. }
            )))
        ));
        assert!(err.to_string().contains("absent.json"));

        let saved = storage.load_state(session_id).await.unwrap();
        assert_eq!(saved.step(), Step::AwaitingFinalPrediction);
        assert!(!saved.is_analysis_complete());
    }
}
