//! Intake module - the scripted conversation that collects patient answers.
//!
//! Free-text answers are normalized as soon as they arrive, stored in a
//! typed answer set, and the conversation advances through a fixed script
//! with one multi-select branch for symptoms.

mod answers;
mod conversation_state;
mod fields;
mod machine;
pub mod normalizers;
mod steps;
mod values;

pub use answers::{AnswerValue, IntakeAnswers, PatientDetails};
pub use conversation_state::{ConversationState, Step};
pub use fields::FieldKey;
pub use machine::{IntakeMachine, StepOutcome};
pub use steps::{
    intake_step, IntakeStep, NextPrompt, INTAKE_STEPS, PROCESSING_MESSAGE, STEP_NOT_FOUND,
    SYMPTOM_SELECTION_MESSAGE, SYMPTOM_SELECTION_RETRY, WELCOME_PROMPT,
};
pub use values::{
    BinaryAnswer, BirthAsphyxia, BloodTestResult, DefectPresence, Gender, HeartRate,
    ReportedAnswer, RespiratoryRate, YesNo,
};
