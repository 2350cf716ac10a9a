//! Classifier Port - Interface to the pre-trained disorder classifier.
//!
//! The classifier is an external artifact. The core only needs its class
//! order, its declared feature names and a `predict_proba` call over one
//! name-addressed row.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::prediction::{DisorderClass, FeatureRow};

/// Errors raised while loading the classifier artifact.
///
/// Every variant names the location that was tried.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ModelLoadError {
    #[error("Model not found at: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read model at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Model package at {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error(
        "Model package at {} is missing required keys: {} (expected: model, label_encoder, feature_names)",
        path.display(),
        missing.join(", ")
    )]
    MissingKeys { path: PathBuf, missing: Vec<String> },

    #[error("Model package at {} has invalid classes: {reason}", path.display())]
    InvalidClasses { path: PathBuf, reason: String },
}

/// Errors raised while scoring a row.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ClassifierError {
    #[error("Feature '{feature}' should be {expected}")]
    FeatureType {
        feature: String,
        expected: &'static str,
    },

    #[error("Classifier produced invalid output: {0}")]
    InvalidOutput(String),
}

/// A loaded classifier.
pub trait Classifier: Send + Sync {
    /// Class order of the probabilities returned by `predict_proba`.
    fn classes(&self) -> &[DisorderClass];

    /// Features the classifier was trained on, as declared by the artifact.
    fn feature_names(&self) -> &[String];

    /// Probability per class, in `classes()` order.
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ClassifierError>;
}

/// Hands out the shared classifier, loading it on first use.
pub trait ClassifierSource: Send + Sync {
    fn classifier(&self) -> Result<Arc<dyn Classifier>, ModelLoadError>;
}
