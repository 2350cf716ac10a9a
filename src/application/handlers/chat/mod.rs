//! Chat Command and Query Handlers
//!
//! ## Commands
//! - `SendChatMessage` - Feed a user message to the intake conversation
//! - `ResetChat` - Start over with a fresh conversation
//! - `PrefillPatient` - Supply patient details before the first question
//!
//! ## Queries
//! - `GetChatReport` - Download info for a finished analysis
//! - `DownloadChatReport` - Bytes of a stored report

mod download_report;
mod get_report;
mod prefill_patient;
mod reset_chat;
mod send_message;

pub use download_report::{
    DownloadChatReportError, DownloadChatReportHandler, DownloadChatReportQuery,
    DownloadChatReportResult,
};
pub use get_report::{GetChatReportError, GetChatReportHandler, GetChatReportQuery};
pub use prefill_patient::{
    PrefillPatientCommand, PrefillPatientError, PrefillPatientHandler, PrefillPatientResult,
};
pub use reset_chat::{ResetChatCommand, ResetChatError, ResetChatHandler, ResetChatResult};
pub use send_message::{
    SendChatMessageCommand, SendChatMessageError, SendChatMessageHandler, SendChatMessageResult,
};
