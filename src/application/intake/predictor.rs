//! Rule-adjusted predictor.
//!
//! Runs one prediction through `Idle → ModelScored → RuleAdjusted →
//! Finalized`: the classifier scores the assembled row, the domain override
//! rules may replace that distribution, and the headline label is picked
//! from whatever remains.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::intake::IntakeAnswers;
use crate::domain::prediction::{
    apply_domain_rules, ClassDistribution, FeatureAssembler, PredictionPhase, PredictionResult,
};
use crate::ports::{ClassifierError, ClassifierSource, ModelLoadError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictionError {
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Prediction pipeline error: {0}")]
    Phase(#[from] ValidationError),
}

pub struct RuleAdjustedPredictor {
    source: Arc<dyn ClassifierSource>,
}

impl RuleAdjustedPredictor {
    pub fn new(source: Arc<dyn ClassifierSource>) -> Self {
        Self { source }
    }

    /// Scores `answers` and returns the finalized prediction.
    ///
    /// # Errors
    /// `ModelLoad` when the classifier artifact is missing or invalid. This
    /// is reported on every call until a load succeeds.
    pub fn predict(&self, answers: &IntakeAnswers) -> Result<PredictionResult, PredictionError> {
        let classifier = self.source.classifier()?;
        let mut phase = PredictionPhase::Idle;

        let mut row = FeatureAssembler::assemble(answers);
        let defaulted = row.align_to(classifier.feature_names());
        if defaulted > 0 {
            debug!(defaulted, "Declared features missing from row defaulted to 0");
        }

        let probabilities = classifier.predict_proba(&row)?;
        let raw = ClassDistribution::from_pairs(classifier.classes(), &probabilities)
            .map_err(|e| ClassifierError::InvalidOutput(e.to_string()))?;
        phase = phase.transition_to(PredictionPhase::ModelScored)?;
        debug!(phase = ?phase, distribution = ?raw, "Model scored");

        let (rule, adjusted) = apply_domain_rules(&row, raw);
        phase = phase.transition_to(PredictionPhase::RuleAdjusted)?;
        debug!(phase = ?phase, rule = %rule, "Domain rules applied");

        let result = PredictionResult::finalize(adjusted);
        phase = phase.transition_to(PredictionPhase::Finalized)?;
        info!(
            phase = ?phase,
            rule = %rule,
            label = %result.label,
            confidence = result.confidence,
            "Prediction finalized"
        );

        Ok(result)
    }
}
