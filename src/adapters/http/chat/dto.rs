//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::intake::{ChatReply, ReportInfo};
use crate::domain::intake::{AnswerValue, PatientDetails};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to send a chat message. Without a session id a new conversation
/// is started.
#[derive(Debug, Clone, Deserialize)]
pub struct SendChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Request to reset a chat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Query parameters for the report lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub session_id: String,
}

/// Patient details supplied before the chat starts.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientInfoRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sex: String,
    /// Accepts `36` as well as `"36"`.
    pub age: AnswerValue,
    #[serde(default)]
    pub dob: Option<String>,
}

impl PatientInfoRequest {
    pub fn details(&self) -> PatientDetails {
        PatientDetails {
            name: self.name.clone(),
            sex: self.sex.clone(),
            age: self.age.as_text(),
            date_of_birth: self.dob.clone(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response to a chat message.
#[derive(Debug, Clone, Serialize)]
pub struct SendChatResponse {
    pub success: bool,
    pub session_id: String,
    /// Plain text or a structured payload with a `type` tag.
    pub response: ChatReply,
    pub analysis_complete: bool,
    pub report_info: Option<ReportInfo>,
}

/// Response to a reset.
#[derive(Debug, Clone, Serialize)]
pub struct ResetChatResponse {
    pub success: bool,
    pub session_id: String,
    pub response: String,
}

/// Response to a patient prefill.
#[derive(Debug, Clone, Serialize)]
pub struct PatientInfoResponse {
    pub success: bool,
    pub session_id: String,
    pub response: String,
}

/// Response to a report lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
}

impl From<ReportInfo> for ReportResponse {
    fn from(info: ReportInfo) -> Self {
        Self {
            success: true,
            filename: info.filename,
            download_url: info.download_url,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}
