//! Pure intake transitions.
//!
//! `IntakeMachine` owns every state change that does not need the
//! classifier. When the script is exhausted it reports
//! [`StepOutcome::PredictionDue`] and leaves the prediction to the caller.

use tracing::debug;

use crate::domain::foundation::ValidationError;
use crate::domain::symptoms::symptom_catalog;

use super::conversation_state::{ConversationState, Step};
use super::normalizers::parse_symptom_selection;
use super::steps::{
    intake_step, NextPrompt, PROCESSING_MESSAGE, RESUME_AFTER_SYMPTOMS,
    RESUME_AFTER_SYMPTOMS_PROMPT, SYMPTOM_SELECTION_MESSAGE, SYMPTOM_SELECTION_RETRY,
};

/// Result of feeding one message to the intake.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Plain text for the user.
    Prompt(String),
    /// Multi-select prompt over the symptom catalog.
    SymptomSelection { message: String, options: Vec<String> },
    /// Last answer stored; the caller should show a wait indicator and send
    /// another message to trigger prediction.
    Processing { message: String },
    /// State is `AwaitingFinalPrediction`; run the prediction pipeline.
    PredictionDue,
    /// Conversation finished. Nothing was changed.
    StepNotFound,
}

pub struct IntakeMachine;

impl IntakeMachine {
    /// Applies `message` to `state`.
    pub fn handle_input(
        state: &mut ConversationState,
        message: &str,
    ) -> Result<StepOutcome, ValidationError> {
        if state.pending_symptom_selection {
            return Self::handle_symptom_selection(state, message);
        }

        match state.step {
            Step::Question(index) => match intake_step(index) {
                Some(step) => {
                    let stored = state.answers.capture(step.field, message);
                    debug!(
                        session_id = %state.session_id,
                        step = index,
                        field = %step.field,
                        value = ?stored,
                        "Answer captured"
                    );
                    Self::follow(state, index, step.next)
                }
                None => Ok(StepOutcome::StepNotFound),
            },
            Step::AwaitingFinalPrediction => Ok(StepOutcome::PredictionDue),
            Step::Completed => Ok(StepOutcome::StepNotFound),
        }
    }

    fn follow(
        state: &mut ConversationState,
        index: usize,
        next: NextPrompt,
    ) -> Result<StepOutcome, ValidationError> {
        match next {
            NextPrompt::SymptomSelection => {
                state.symptom_catalog = symptom_catalog();
                state.pending_symptom_selection = true;
                state.updated_at = chrono::Utc::now();
                Ok(StepOutcome::SymptomSelection {
                    message: SYMPTOM_SELECTION_MESSAGE.to_string(),
                    options: state.symptom_catalog.clone(),
                })
            }
            NextPrompt::FinalStep => {
                state.advance_to(Step::AwaitingFinalPrediction)?;
                Ok(StepOutcome::Processing {
                    message: PROCESSING_MESSAGE.to_string(),
                })
            }
            NextPrompt::Ask(prompt) => {
                state.advance_to(Step::Question(index + 1))?;
                Ok(StepOutcome::Prompt(prompt.to_string()))
            }
        }
    }

    fn handle_symptom_selection(
        state: &mut ConversationState,
        message: &str,
    ) -> Result<StepOutcome, ValidationError> {
        let Some(indices) = parse_symptom_selection(message, state.symptom_catalog.len()) else {
            return Ok(StepOutcome::Prompt(SYMPTOM_SELECTION_RETRY.to_string()));
        };

        let selected: Vec<String> = indices
            .into_iter()
            .filter_map(|i| state.symptom_catalog.get(i).cloned())
            .collect();
        debug!(
            session_id = %state.session_id,
            count = selected.len(),
            "Symptoms selected"
        );

        state.answers.select_symptoms(selected);
        state.pending_symptom_selection = false;
        state.advance_to(Step::Question(RESUME_AFTER_SYMPTOMS))?;
        Ok(StepOutcome::Prompt(RESUME_AFTER_SYMPTOMS_PROMPT.to_string()))
    }
}
