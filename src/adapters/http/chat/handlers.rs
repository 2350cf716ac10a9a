//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::application::handlers::chat::{
    DownloadChatReportError, DownloadChatReportHandler, DownloadChatReportQuery,
    GetChatReportError, GetChatReportHandler, GetChatReportQuery, PrefillPatientCommand,
    PrefillPatientError, PrefillPatientHandler, ResetChatCommand, ResetChatError,
    ResetChatHandler, SendChatMessageCommand, SendChatMessageError, SendChatMessageHandler,
};
use crate::application::intake::{IntakeError, PredictionError, RuleAdjustedPredictor};
use crate::domain::foundation::{ErrorCode, SessionId};
use crate::ports::{ReportRenderer, SessionStateStorage};

use super::dto::{
    ErrorResponse, PatientInfoRequest, PatientInfoResponse, ReportQuery, ReportResponse,
    ResetChatRequest, ResetChatResponse, SendChatRequest, SendChatResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the chat endpoints.
#[derive(Clone)]
pub struct ChatAppState {
    pub storage: Arc<dyn SessionStateStorage>,
    pub predictor: Arc<RuleAdjustedPredictor>,
    pub renderer: Arc<dyn ReportRenderer>,
}

impl ChatAppState {
    pub fn send_message_handler(&self) -> SendChatMessageHandler {
        SendChatMessageHandler::new(
            self.storage.clone(),
            self.predictor.clone(),
            self.renderer.clone(),
        )
    }

    pub fn reset_handler(&self) -> ResetChatHandler {
        ResetChatHandler::new(self.storage.clone())
    }

    pub fn prefill_handler(&self) -> PrefillPatientHandler {
        PrefillPatientHandler::new(self.storage.clone())
    }

    pub fn get_report_handler(&self) -> GetChatReportHandler {
        GetChatReportHandler::new(self.storage.clone(), self.renderer.clone())
    }

    pub fn download_handler(&self) -> DownloadChatReportHandler {
        DownloadChatReportHandler::new(self.renderer.clone())
    }
}

fn parse_session_id(raw: Option<&str>) -> Result<Option<SessionId>, ChatApiError> {
    raw.map(|s| {
        s.parse::<SessionId>()
            .map_err(|_| ChatApiError::InvalidSessionId(s.to_string()))
    })
    .transpose()
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Send one message to the intake conversation
pub async fn send_message(
    State(state): State<ChatAppState>,
    Json(req): Json<SendChatRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(req.session_id.as_deref())?.unwrap_or_default();
    let cmd = SendChatMessageCommand {
        session_id,
        message: req.message,
    };

    let result = state.send_message_handler().handle(cmd).await?;

    Ok(Json(SendChatResponse {
        success: true,
        session_id: result.session_id.to_string(),
        response: result.reply,
        analysis_complete: result.analysis_complete,
        report_info: result.report_info,
    }))
}

/// POST /api/chat/reset - Start the conversation over
pub async fn reset_chat(
    State(state): State<ChatAppState>,
    body: Option<Json<ResetChatRequest>>,
) -> Result<impl IntoResponse, ChatApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let cmd = ResetChatCommand {
        session_id: parse_session_id(req.session_id.as_deref())?,
    };

    let result = state.reset_handler().handle(cmd).await?;

    Ok(Json(ResetChatResponse {
        success: true,
        session_id: result.session_id.to_string(),
        response: result.response.to_string(),
    }))
}

/// POST /api/chat/patient_info - Supply patient details before the first question
pub async fn patient_info(
    State(state): State<ChatAppState>,
    Json(req): Json<PatientInfoRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(req.session_id.as_deref())?.unwrap_or_default();
    let cmd = PrefillPatientCommand {
        session_id,
        details: req.details(),
    };

    let result = state.prefill_handler().handle(cmd).await?;

    Ok(Json(PatientInfoResponse {
        success: true,
        session_id: result.session_id.to_string(),
        response: result.next_prompt.to_string(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/chat/report?session_id=... - Download info for a finished analysis
pub async fn get_report(
    State(state): State<ChatAppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(Some(&query.session_id))?
        .ok_or_else(|| ChatApiError::InvalidSessionId(query.session_id.clone()))?;

    let info = state
        .get_report_handler()
        .handle(GetChatReportQuery { session_id })
        .await?;

    Ok(Json(ReportResponse::from(info)))
}

/// GET /api/chat/report/:filename - Serve a stored report as an attachment
pub async fn download_report(
    State(state): State<ChatAppState>,
    Path(filename): Path<String>,
) -> Result<Response, ChatApiError> {
    let result = state
        .download_handler()
        .handle(DownloadChatReportQuery { filename })
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", result.filename);
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&result.filename).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.content,
    )
        .into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Errors surfaced by the chat endpoints.
#[derive(Debug)]
pub enum ChatApiError {
    InvalidSessionId(String),
    SendMessage(SendChatMessageError),
    Reset(ResetChatError),
    Prefill(PrefillPatientError),
    Report(GetChatReportError),
    Download(DownloadChatReportError),
}

impl From<SendChatMessageError> for ChatApiError {
    fn from(err: SendChatMessageError) -> Self {
        Self::SendMessage(err)
    }
}

impl From<ResetChatError> for ChatApiError {
    fn from(err: ResetChatError) -> Self {
        Self::Reset(err)
    }
}

impl From<PrefillPatientError> for ChatApiError {
    fn from(err: PrefillPatientError) -> Self {
        Self::Prefill(err)
    }
}

impl From<GetChatReportError> for ChatApiError {
    fn from(err: GetChatReportError) -> Self {
        Self::Report(err)
    }
}

impl From<DownloadChatReportError> for ChatApiError {
    fn from(err: DownloadChatReportError) -> Self {
        Self::Download(err)
    }
}

impl ChatApiError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            ChatApiError::InvalidSessionId(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed),
            ChatApiError::SendMessage(SendChatMessageError::Storage(_))
            | ChatApiError::Reset(ResetChatError::Storage(_))
            | ChatApiError::Prefill(PrefillPatientError::Storage(_))
            | ChatApiError::Report(GetChatReportError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageError)
            }
            ChatApiError::SendMessage(SendChatMessageError::Intake(err)) => match err {
                IntakeError::Prediction(PredictionError::ModelLoad(_)) => {
                    (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ModelUnavailable)
                }
                IntakeError::Prediction(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
                }
                IntakeError::Validation(v) if v.is_state_transition() => {
                    (StatusCode::CONFLICT, v.code())
                }
                IntakeError::Validation(v) => (StatusCode::BAD_REQUEST, v.code()),
                IntakeError::PrefillNotAllowed => {
                    (StatusCode::CONFLICT, ErrorCode::InvalidStateTransition)
                }
            },
            ChatApiError::Prefill(PrefillPatientError::NotAllowed) => {
                (StatusCode::CONFLICT, ErrorCode::InvalidStateTransition)
            }
            ChatApiError::Report(GetChatReportError::AnalysisNotComplete) => {
                (StatusCode::BAD_REQUEST, ErrorCode::AnalysisNotComplete)
            }
            ChatApiError::Report(GetChatReportError::ReportNotFound)
            | ChatApiError::Download(DownloadChatReportError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, ErrorCode::ReportNotFound)
            }
            ChatApiError::Download(DownloadChatReportError::InvalidFileName(_)) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed)
            }
            ChatApiError::Download(DownloadChatReportError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ChatApiError::InvalidSessionId(id) => format!("Invalid session id: {}", id),
            ChatApiError::SendMessage(err) => err.to_string(),
            ChatApiError::Reset(err) => err.to_string(),
            ChatApiError::Prefill(err) => err.to_string(),
            ChatApiError::Report(err) => err.to_string(),
            ChatApiError::Download(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();
        if status.is_server_error() {
            error!(code = %code, error = %message, "Chat request failed");
        }
        (status, Json(ErrorResponse::new(code.to_string(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ModelLoadError;
    use std::path::PathBuf;

    #[test]
    fn missing_model_maps_to_service_unavailable() {
        let err = ChatApiError::SendMessage(SendChatMessageError::Intake(IntakeError::Prediction(
            PredictionError::ModelLoad(ModelLoadError::NotFound {
                path: PathBuf::from("ai_engine/genetic_disorder_model.json"),
            }),
        )));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, ErrorCode::ModelUnavailable);
        assert!(err.message().contains("genetic_disorder_model.json"));
    }

    #[test]
    fn report_errors_map_to_client_statuses() {
        assert_eq!(
            ChatApiError::Report(GetChatReportError::AnalysisNotComplete)
                .status_and_code()
                .0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ChatApiError::Report(GetChatReportError::ReportNotFound)
                .status_and_code()
                .0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ChatApiError::Download(DownloadChatReportError::InvalidFileName("x".into()))
                .status_and_code()
                .0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn session_ids_are_validated() {
        assert!(parse_session_id(None).unwrap().is_none());
        assert!(matches!(
            parse_session_id(Some("not-a-uuid")),
            Err(ChatApiError::InvalidSessionId(_))
        ));
        let id = SessionId::new();
        assert_eq!(parse_session_id(Some(&id.to_string())).unwrap(), Some(id));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("geneaccess_report_x.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("report_1.pdf"), "application/pdf");
        assert_eq!(content_type_for("chatbot_report_x"), "application/octet-stream");
    }
}
