//! GetChatReportHandler - Look up the report of a finished analysis

use std::sync::Arc;

use crate::application::intake::ReportInfo;
use crate::domain::foundation::SessionId;
use crate::ports::{ReportRenderer, SessionStateStorage, SessionStorageError};

/// Query for a session's report
#[derive(Debug, Clone)]
pub struct GetChatReportQuery {
    pub session_id: SessionId,
}

/// Error type for report lookups
#[derive(Debug, Clone, PartialEq)]
pub enum GetChatReportError {
    /// No prediction has been made for this session
    AnalysisNotComplete,
    /// Analysis finished but no report file is available
    ReportNotFound,
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for GetChatReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetChatReportError::AnalysisNotComplete => write!(f, "Analysis not complete"),
            GetChatReportError::ReportNotFound => write!(f, "Report not found"),
            GetChatReportError::Storage(err) => write!(f, "Report error: {}", err),
        }
    }
}

impl std::error::Error for GetChatReportError {}

impl From<SessionStorageError> for GetChatReportError {
    fn from(err: SessionStorageError) -> Self {
        match err {
            // A session nobody has talked to has no analysis either
            SessionStorageError::NotFound(_) => GetChatReportError::AnalysisNotComplete,
            other => GetChatReportError::Storage(other.to_string()),
        }
    }
}

/// Handler for report lookups
pub struct GetChatReportHandler {
    storage: Arc<dyn SessionStateStorage>,
    renderer: Arc<dyn ReportRenderer>,
}

impl GetChatReportHandler {
    pub fn new(storage: Arc<dyn SessionStateStorage>, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self { storage, renderer }
    }

    pub async fn handle(&self, query: GetChatReportQuery) -> Result<ReportInfo, GetChatReportError> {
        let state = self.storage.load_state(query.session_id).await?;

        if !state.is_analysis_complete() {
            return Err(GetChatReportError::AnalysisNotComplete);
        }

        let path = state.report_path().ok_or(GetChatReportError::ReportNotFound)?;
        if !self.renderer.exists(path).await {
            return Err(GetChatReportError::ReportNotFound);
        }

        ReportInfo::from_path(path).ok_or(GetChatReportError::ReportNotFound)
    }
}
