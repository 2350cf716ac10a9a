//! Axum router configuration for chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    download_report, get_report, patient_info, reset_chat, send_message, ChatAppState,
};

/// Create the chat API router.
///
/// # Routes
/// - `POST /api/chat` - Send a message
/// - `POST /api/chat/reset` - Start over
/// - `POST /api/chat/patient_info` - Prefill patient details
/// - `GET /api/chat/report?session_id=...` - Report download info
/// - `GET /api/chat/report/:filename` - Download a report
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .route("/api/chat", post(send_message))
        .route("/api/chat/reset", post(reset_chat))
        .route("/api/chat/patient_info", post(patient_info))
        .route("/api/chat/report", get(get_report))
        .route("/api/chat/report/:filename", get(download_report))
}
