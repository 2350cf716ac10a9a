//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, error types and the state machine trait
//! that form the vocabulary of the GeneAccess domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::{ErrorCode, ValidationError, STATE_TRANSITION_FIELD};
pub use ids::{ReportId, SessionId};
pub use state_machine::StateMachine;
