//! PrefillPatientHandler - Store patient details captured outside the chat

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionId;
use crate::domain::intake::{intake_step, ConversationState, NextPrompt, PatientDetails};
use crate::ports::{SessionStateStorage, SessionStorageError};

/// Command to prefill patient details
#[derive(Debug, Clone)]
pub struct PrefillPatientCommand {
    pub session_id: SessionId,
    pub details: PatientDetails,
}

/// Result of prefilling patient details
#[derive(Debug, Clone)]
pub struct PrefillPatientResult {
    pub session_id: SessionId,
    /// The question the conversation continues with.
    pub next_prompt: &'static str,
}

/// Error type for prefilling patient details
#[derive(Debug, Clone, PartialEq)]
pub enum PrefillPatientError {
    /// The conversation is already past its first question
    NotAllowed,
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for PrefillPatientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefillPatientError::NotAllowed => write!(
                f,
                "Patient details can only be supplied before the conversation starts"
            ),
            PrefillPatientError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for PrefillPatientError {}

impl From<SessionStorageError> for PrefillPatientError {
    fn from(err: SessionStorageError) -> Self {
        PrefillPatientError::Storage(err.to_string())
    }
}

/// Handler for patient prefill
pub struct PrefillPatientHandler {
    storage: Arc<dyn SessionStateStorage>,
}

impl PrefillPatientHandler {
    pub fn new(storage: Arc<dyn SessionStateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        cmd: PrefillPatientCommand,
    ) -> Result<PrefillPatientResult, PrefillPatientError> {
        let mut state = match self.storage.load_state(cmd.session_id).await {
            Ok(state) => state,
            Err(SessionStorageError::NotFound(id)) => ConversationState::new(id),
            Err(e) => return Err(e.into()),
        };

        state
            .prefill(&cmd.details)
            .map_err(|_| PrefillPatientError::NotAllowed)?;
        self.storage.save_state(cmd.session_id, &state).await?;
        info!(session_id = %cmd.session_id, "Patient details prefilled");

        let next_prompt = match intake_step(0).map(|step| step.next) {
            Some(NextPrompt::Ask(prompt)) => prompt,
            _ => "",
        };
        Ok(PrefillPatientResult {
            session_id: cmd.session_id,
            next_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStorage;
    use crate::domain::intake::{FieldKey, Step};

    fn details(name: &str) -> PatientDetails {
        PatientDetails {
            name: name.into(),
            sex: "m".into(),
            age: "41".into(),
            date_of_birth: Some("1984-03-02".into()),
        }
    }

    #[tokio::test]
    async fn prefill_skips_the_name_question() {
        let storage = Arc::new(InMemorySessionStorage::new());
        let handler = PrefillPatientHandler::new(storage.clone());
        let session_id = SessionId::new();

        let result = handler
            .handle(PrefillPatientCommand {
                session_id,
                details: details("Alan Turing"),
            })
            .await
            .unwrap();

        assert_eq!(result.next_prompt, "How old are you?");
        let saved = storage.load_state(session_id).await.unwrap();
        assert_eq!(saved.step(), Step::Question(1));
        assert_eq!(saved.answers().name(), Some("Alan Turing"));
        assert_eq!(
            saved.answers().value(FieldKey::Gender).map(|v| v.as_text()),
            Some("Male".to_string())
        );
    }

    #[tokio::test]
    async fn prefill_twice_is_rejected() {
        let storage = Arc::new(InMemorySessionStorage::new());
        let handler = PrefillPatientHandler::new(storage);
        let session_id = SessionId::new();
        let cmd = PrefillPatientCommand {
            session_id,
            details: details("Alan Turing"),
        };

        handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(
            handler.handle(cmd).await.unwrap_err(),
            PrefillPatientError::NotAllowed
        );
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let handler = PrefillPatientHandler::new(Arc::new(InMemorySessionStorage::new()));

        let err = handler
            .handle(PrefillPatientCommand {
                session_id: SessionId::new(),
                details: details("   "),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PrefillPatientError::NotAllowed);
    }
}
