//! Conversation state for one intake session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::foundation::{SessionId, StateMachine, ValidationError};
use crate::domain::prediction::PredictionResult;

use super::answers::{IntakeAnswers, PatientDetails};
use super::steps::INTAKE_STEPS;

/// Where the conversation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum Step {
    /// Waiting for the answer to the scripted question at this index.
    Question(usize),
    /// Every question answered; the next input triggers prediction.
    AwaitingFinalPrediction,
    /// Prediction delivered. Further input is a no-op.
    Completed,
}

impl Step {
    pub fn index(&self) -> Option<usize> {
        match self {
            Step::Question(i) => Some(*i),
            _ => None,
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Step::Question(0)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Question(i) => write!(f, "question {}", i),
            Step::AwaitingFinalPrediction => f.write_str("awaiting_final_prediction"),
            Step::Completed => f.write_str("completed"),
        }
    }
}

const LAST_QUESTION: usize = INTAKE_STEPS.len() - 1;

impl StateMachine for Step {
    fn can_transition_to(&self, target: &Self) -> bool {
        match (self, target) {
            (Step::Question(from), Step::Question(to)) => to > from && *to <= LAST_QUESTION,
            (Step::Question(from), Step::AwaitingFinalPrediction) => *from == LAST_QUESTION,
            (Step::AwaitingFinalPrediction, Step::Completed) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Step::Question(from) if *from >= LAST_QUESTION => vec![Step::AwaitingFinalPrediction],
            Step::Question(from) => (from + 1..=LAST_QUESTION).map(Step::Question).collect(),
            Step::AwaitingFinalPrediction => vec![Step::Completed],
            Step::Completed => vec![],
        }
    }
}

/// Everything known about one intake conversation.
///
/// A reset builds a fresh value; nothing here is ever rolled back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationState {
    pub session_id: SessionId,
    pub(super) step: Step,
    pub(super) answers: IntakeAnswers,
    pub(super) pending_symptom_selection: bool,
    pub(super) symptom_catalog: Vec<String>,
    final_prediction: Option<PredictionResult>,
    report_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            step: Step::default(),
            answers: IntakeAnswers::new(),
            pending_symptom_selection: false,
            symptom_catalog: Vec::new(),
            final_prediction: None,
            report_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &IntakeAnswers {
        &self.answers
    }

    pub fn is_pending_symptom_selection(&self) -> bool {
        self.pending_symptom_selection
    }

    /// Catalog shown in the multi-select; empty until that prompt is sent.
    pub fn symptom_catalog(&self) -> &[String] {
        &self.symptom_catalog
    }

    pub fn final_prediction(&self) -> Option<&PredictionResult> {
        self.final_prediction.as_ref()
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    /// True once a prediction has been recorded.
    pub fn is_analysis_complete(&self) -> bool {
        self.final_prediction.is_some()
    }

    /// Moves to `target` if the edge is legal.
    pub(super) fn advance_to(&mut self, target: Step) -> Result<(), ValidationError> {
        self.step = self.step.transition_to(target)?;
        self.touch();
        Ok(())
    }

    /// Stores the finalized prediction and closes the conversation.
    ///
    /// Any report handle from an earlier attempt is dropped; the caller
    /// attaches a fresh one once rendering succeeds.
    pub fn complete_with(&mut self, prediction: PredictionResult) -> Result<(), ValidationError> {
        self.step = self.step.transition_to(Step::Completed)?;
        self.final_prediction = Some(prediction);
        self.report_path = None;
        self.touch();
        Ok(())
    }

    pub fn attach_report(&mut self, path: PathBuf) {
        self.report_path = Some(path);
        self.touch();
    }

    /// Records patient details supplied outside the chat and skips the name
    /// question. Only allowed before the first answer.
    pub fn prefill(&mut self, details: &PatientDetails) -> Result<(), ValidationError> {
        if self.step != Step::Question(0) || self.pending_symptom_selection {
            return Err(ValidationError::invalid_format(
                "step",
                format!("patient details can only be supplied at the start, not at {}", self.step),
            ));
        }
        if details.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        self.answers.prefill(details);
        self.advance_to(Step::Question(1))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
