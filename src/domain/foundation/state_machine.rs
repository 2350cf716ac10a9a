//! State machine trait for phase enums.
//!
//! Gives phase enums (prediction pipeline, intake progress) one way to
//! declare and check their legal transitions.

use super::{ValidationError, STATE_TRANSITION_FIELD};

/// Trait for enums that represent a state machine.
///
/// Implementors declare the legal edges; `transition_to` and `is_terminal`
/// come for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for PredictionPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, ModelScored) | (ModelScored, RuleAdjusted) | ...)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![ModelScored],
///             // ...
///         }
///     }
/// }
///
/// let phase = PredictionPhase::Idle.transition_to(PredictionPhase::ModelScored)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                STATE_TRANSITION_FIELD,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
