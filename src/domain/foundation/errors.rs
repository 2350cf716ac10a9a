//! Error types shared by the domain layer.

use std::fmt;
use thiserror::Error;

/// Field name carried by errors from [`super::StateMachine::transition_to`].
pub const STATE_TRANSITION_FIELD: &str = "state_transition";

/// Errors that occur during value construction or state transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for a rejected phase or step transition.
    pub fn is_state_transition(&self) -> bool {
        matches!(self, ValidationError::InvalidFormat { field, .. } if field == STATE_TRANSITION_FIELD)
    }

    /// Machine-readable code for API responses.
    pub fn code(&self) -> ErrorCode {
        if self.is_state_transition() {
            ErrorCode::InvalidStateTransition
        } else {
            ErrorCode::ValidationFailed
        }
    }
}

/// Machine-readable error codes returned in API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    InvalidStateTransition,
    ReportNotFound,
    AnalysisNotComplete,
    ModelUnavailable,
    StorageError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ReportNotFound => "REPORT_NOT_FOUND",
            ErrorCode::AnalysisNotComplete => "ANALYSIS_NOT_COMPLETE",
            ErrorCode::ModelUnavailable => "MODEL_UNAVAILABLE",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
