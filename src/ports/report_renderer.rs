//! Report Renderer Port - Produces the downloadable risk report.
//!
//! The renderer receives an already finalized prediction together with the
//! answers that produced it. It never scores anything itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::domain::foundation::ReportId;
use crate::domain::intake::IntakeAnswers;
use crate::domain::prediction::PredictionResult;

/// File name prefixes that may be served for download.
pub const SERVABLE_REPORT_PREFIXES: [&str; 3] = ["report_", "chatbot_report_", "geneaccess_report_"];

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(String),

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Invalid report file name: {0}")]
    InvalidFileName(String),
}

/// Everything needed to render one report.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub report_id: ReportId,
    pub answers: IntakeAnswers,
    pub prediction: PredictionResult,
    pub generated_at: DateTime<Utc>,
}

impl ReportRequest {
    pub fn new(answers: IntakeAnswers, prediction: PredictionResult) -> Self {
        Self {
            report_id: ReportId::new(),
            answers,
            prediction,
            generated_at: Utc::now(),
        }
    }
}

/// A report written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub path: PathBuf,
    pub filename: String,
}

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Renders and stores the report, returning where it went.
    async fn render(&self, request: &ReportRequest) -> Result<RenderedReport, ReportError>;

    /// Whether a previously rendered artifact is still present.
    async fn exists(&self, path: &Path) -> bool;

    /// Reads a stored report by file name.
    ///
    /// # Errors
    /// `InvalidFileName` for names that fail [`validate_report_filename`],
    /// `NotFound` if no such report exists.
    async fn read(&self, filename: &str) -> Result<Vec<u8>, ReportError>;
}

/// Accepts bare file names with a known report prefix.
pub fn validate_report_filename(filename: &str) -> Result<(), ReportError> {
    let has_separator = filename.contains('/') || filename.contains('\\');
    let has_prefix = SERVABLE_REPORT_PREFIXES
        .iter()
        .any(|p| filename.starts_with(p));

    if has_separator || filename.contains("..") || !has_prefix {
        return Err(ReportError::InvalidFileName(filename.to_string()));
    }
    Ok(())
}
