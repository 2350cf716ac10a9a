//! IntakeSession - one user's conversation with the assistant.
//!
//! Wraps the pure [`IntakeMachine`] with the two collaborators it cannot
//! call itself: the predictor and the report renderer.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::intake::{
    ConversationState, IntakeMachine, PatientDetails, StepOutcome, STEP_NOT_FOUND, WELCOME_PROMPT,
};
use crate::domain::prediction::PredictionResult;
use crate::ports::{ReportRenderer, ReportRequest};

use super::predictor::{PredictionError, RuleAdjustedPredictor};

/// Route that serves stored reports.
pub const REPORT_DOWNLOAD_ROUTE: &str = "/api/chat/report";

const FINAL_RESULT_HEADER: &str =
    "Your comprehensive genetic risk assessment report has been generated.<br>";
const REPORT_DISCLAIMER: &str =
    "This report is for educational purposes only and should be reviewed with healthcare professionals.";
const REPORT_UNAVAILABLE: &str = "<p>Report not available.</p>";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Patient details can only be supplied before the conversation starts")]
    PrefillNotAllowed,
}

/// Where a finished report can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInfo {
    pub filename: String,
    pub download_url: String,
}

impl ReportInfo {
    pub fn for_filename(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            download_url: format!("{}/{}", REPORT_DOWNLOAD_ROUTE, filename),
            filename,
        }
    }

    /// Builds the info from a stored report path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(Self::for_filename)
    }
}

/// Payloads other than plain text, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredReply {
    SymptomSelection {
        message: String,
        options: Vec<String>,
    },
    /// Caller should show a wait indicator and send any message to continue.
    WaitAndPredict { message: String },
    FinalResult {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        report_info: Option<ReportInfo>,
    },
}

/// What the assistant says back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    Text(String),
    Structured(StructuredReply),
}

impl ChatReply {
    pub fn text(message: impl Into<String>) -> Self {
        ChatReply::Text(message.into())
    }

    /// The human-readable part, whatever the shape.
    pub fn message(&self) -> &str {
        match self {
            ChatReply::Text(text) => text,
            ChatReply::Structured(StructuredReply::SymptomSelection { message, .. })
            | ChatReply::Structured(StructuredReply::WaitAndPredict { message })
            | ChatReply::Structured(StructuredReply::FinalResult { message, .. }) => message,
        }
    }

    pub fn is_final_result(&self) -> bool {
        matches!(self, ChatReply::Structured(StructuredReply::FinalResult { .. }))
    }
}

pub struct IntakeSession {
    state: ConversationState,
    predictor: Arc<RuleAdjustedPredictor>,
    renderer: Arc<dyn ReportRenderer>,
}

impl IntakeSession {
    pub fn new(
        session_id: SessionId,
        predictor: Arc<RuleAdjustedPredictor>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self::from_state(ConversationState::new(session_id), predictor, renderer)
    }

    /// Resumes a conversation loaded from storage.
    pub fn from_state(
        state: ConversationState,
        predictor: Arc<RuleAdjustedPredictor>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            state,
            predictor,
            renderer,
        }
    }

    /// Discards everything and starts again from the name question.
    pub fn reset(&mut self) -> &'static str {
        self.state = ConversationState::new(self.state.session_id);
        info!(session_id = %self.state.session_id, "Conversation reset");
        WELCOME_PROMPT
    }

    /// Feeds one user message through the conversation.
    ///
    /// # Errors
    /// `Prediction` when the classifier cannot be loaded or fails. The state
    /// stays at `AwaitingFinalPrediction` so the next message retries.
    pub async fn handle_input(&mut self, message: &str) -> Result<ChatReply, IntakeError> {
        let outcome = IntakeMachine::handle_input(&mut self.state, message)?;

        let reply = match outcome {
            StepOutcome::Prompt(text) => ChatReply::Text(text),
            StepOutcome::SymptomSelection { message, options } => {
                ChatReply::Structured(StructuredReply::SymptomSelection { message, options })
            }
            StepOutcome::Processing { message } => {
                ChatReply::Structured(StructuredReply::WaitAndPredict { message })
            }
            StepOutcome::PredictionDue => self.finish().await?,
            StepOutcome::StepNotFound => ChatReply::text(STEP_NOT_FOUND),
        };
        Ok(reply)
    }

    async fn finish(&mut self) -> Result<ChatReply, IntakeError> {
        let prediction = self.predictor.predict(self.state.answers())?;
        self.state.complete_with(prediction.clone())?;

        let report_info = self.generate_report(prediction.clone()).await;
        let message = final_message(&prediction, report_info.as_ref());

        Ok(ChatReply::Structured(StructuredReply::FinalResult {
            message,
            report_info,
        }))
    }

    /// Renders the report. Failures are logged and leave no report handle.
    async fn generate_report(&mut self, prediction: PredictionResult) -> Option<ReportInfo> {
        let request = ReportRequest::new(self.state.answers().clone(), prediction);
        let session_id = self.state.session_id;

        match self.renderer.render(&request).await {
            Ok(rendered) => {
                if !self.renderer.exists(&rendered.path).await {
                    warn!(
                        session_id = %session_id,
                        path = %rendered.path.display(),
                        "Rendered report is missing"
                    );
                    return None;
                }
                self.state.attach_report(rendered.path);
                Some(ReportInfo::for_filename(rendered.filename))
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Report generation failed");
                None
            }
        }
    }

    /// Stores up-front patient details and skips the name question.
    pub fn prefill_patient(&mut self, details: &PatientDetails) -> Result<(), IntakeError> {
        self.state
            .prefill(details)
            .map_err(|_| IntakeError::PrefillNotAllowed)
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_analysis_complete()
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.state.report_path()
    }

    pub fn session_id(&self) -> SessionId {
        self.state.session_id
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn into_state(self) -> ConversationState {
        self.state
    }
}

fn final_message(prediction: &PredictionResult, report: Option<&ReportInfo>) -> String {
    let download = match report {
        Some(info) => format!(
            "<span><a href='{}' target='_blank'>Download Report</a></span>\
             <p style='margin-top:8px;'>{}</p>",
            info.download_url, REPORT_DISCLAIMER
        ),
        None => REPORT_UNAVAILABLE.to_string(),
    };
    format!("{}{}{}", FINAL_RESULT_HEADER, prediction.summary_line(), download)
}
