//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    DownloadChatReportError, DownloadChatReportHandler, DownloadChatReportQuery,
    DownloadChatReportResult, GetChatReportError, GetChatReportHandler, GetChatReportQuery,
    PrefillPatientCommand, PrefillPatientError, PrefillPatientHandler, PrefillPatientResult,
    ResetChatCommand, ResetChatError, ResetChatHandler, ResetChatResult, SendChatMessageCommand,
    SendChatMessageError, SendChatMessageHandler, SendChatMessageResult,
};
