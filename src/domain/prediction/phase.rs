//! Phases of one prediction run.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionPhase {
    #[default]
    Idle,
    /// Raw classifier distribution available.
    ModelScored,
    /// Override rules applied.
    RuleAdjusted,
    /// Headline label and confidence picked.
    Finalized,
}

impl StateMachine for PredictionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PredictionPhase::*;
        matches!(
            (self, target),
            (Idle, ModelScored) | (ModelScored, RuleAdjusted) | (RuleAdjusted, Finalized)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PredictionPhase::*;
        match self {
            Idle => vec![ModelScored],
            ModelScored => vec![RuleAdjusted],
            RuleAdjusted => vec![Finalized],
            Finalized => vec![],
        }
    }
}
