//! HTTP adapter for the chat intake.
//!
//! Exposes the conversation via REST API:
//! - `POST /api/chat` - Send a message, receive the next prompt or payload
//! - `POST /api/chat/reset` - Start a fresh conversation
//! - `POST /api/chat/patient_info` - Prefill patient details
//! - `GET /api/chat/report` - Report info for a finished analysis
//! - `GET /api/chat/report/:filename` - Download a stored report

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::chat_router;
