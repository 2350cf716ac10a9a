//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `intake` drives a single conversation; `handlers` load and persist it
//! around each request.

pub mod handlers;
pub mod intake;

pub use intake::{
    ChatReply, IntakeError, IntakeSession, PredictionError, ReportInfo, RuleAdjustedPredictor,
    StructuredReply,
};
