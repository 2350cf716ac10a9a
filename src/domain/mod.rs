//! Domain layer containing the intake and prediction logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, state machine trait)
//! - `symptoms` - Symptom catalog and symptom clusters
//! - `intake` - Scripted conversation, answer normalization and storage
//! - `prediction` - Feature assembly, override rules and finalization

pub mod foundation;
pub mod intake;
pub mod prediction;
pub mod symptoms;
