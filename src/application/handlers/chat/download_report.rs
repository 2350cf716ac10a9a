//! DownloadChatReportHandler - Serve a stored report file

use std::sync::Arc;

use crate::ports::{ReportError, ReportRenderer};

/// Query for a report file by name
#[derive(Debug, Clone)]
pub struct DownloadChatReportQuery {
    pub filename: String,
}

/// Report bytes ready to send
#[derive(Debug, Clone)]
pub struct DownloadChatReportResult {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Error type for report downloads
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadChatReportError {
    /// Name is not a servable report file
    InvalidFileName(String),
    /// No such report
    NotFound(String),
    /// Read failure
    Io(String),
}

impl std::fmt::Display for DownloadChatReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadChatReportError::InvalidFileName(name) => {
                write!(f, "Invalid report file: {}", name)
            }
            DownloadChatReportError::NotFound(name) => write!(f, "Report not found: {}", name),
            DownloadChatReportError::Io(err) => write!(f, "Download error: {}", err),
        }
    }
}

impl std::error::Error for DownloadChatReportError {}

impl From<ReportError> for DownloadChatReportError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidFileName(name) => DownloadChatReportError::InvalidFileName(name),
            ReportError::NotFound(name) => DownloadChatReportError::NotFound(name),
            other => DownloadChatReportError::Io(other.to_string()),
        }
    }
}

/// Handler for report downloads
pub struct DownloadChatReportHandler {
    renderer: Arc<dyn ReportRenderer>,
}

impl DownloadChatReportHandler {
    pub fn new(renderer: Arc<dyn ReportRenderer>) -> Self {
        Self { renderer }
    }

    pub async fn handle(
        &self,
        query: DownloadChatReportQuery,
    ) -> Result<DownloadChatReportResult, DownloadChatReportError> {
        let content = self.renderer.read(&query.filename).await?;
        Ok(DownloadChatReportResult {
            filename: query.filename,
            content,
        })
    }
}
