//! The fixed intake script.
//!
//! Each entry binds a field (and therefore its normalizer) to what the bot
//! says next once that field has been answered.

use super::fields::FieldKey;

/// What follows a step once its answer is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPrompt {
    /// Plain text question for the next index.
    Ask(&'static str),
    /// Enter the symptom multi-select sub-mode.
    SymptomSelection,
    /// Last scripted question answered; prediction is due.
    FinalStep,
}

/// One row of the intake script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeStep {
    pub field: FieldKey,
    pub next: NextPrompt,
}

const fn step(field: FieldKey, next: NextPrompt) -> IntakeStep {
    IntakeStep { field, next }
}

pub const WELCOME_PROMPT: &str =
    "Welcome to GeneAccessAI. I'm Dr. GeneAccess. Let's begin. What's your full name?";

pub const SYMPTOM_SELECTION_MESSAGE: &str = "Please select the symptoms you have:";

pub const SYMPTOM_SELECTION_RETRY: &str =
    "Invalid input. Please enter numbers separated by commas.";

/// Index the flow resumes at after the symptom multi-select.
pub const RESUME_AFTER_SYMPTOMS: usize = 6;

pub const RESUME_AFTER_SYMPTOMS_PROMPT: &str =
    "Thank you. Did you experience trouble breathing at birth? (Birth asphyxia) (Yes / No / Not sure)";

pub const PROCESSING_MESSAGE: &str =
    "Please wait... Your genetic risk assessment report is being generated.";

pub const STEP_NOT_FOUND: &str = "Step not found.";

/// The 23 scripted steps, indices 0..=22.
///
/// Index 5 is never reached in a live conversation: the multi-select after
/// index 4 resumes at [`RESUME_AFTER_SYMPTOMS`].
pub const INTAKE_STEPS: [IntakeStep; 23] = [
    step(FieldKey::Name, NextPrompt::Ask("How old are you?")),
    step(
        FieldKey::PatientAge,
        NextPrompt::Ask("What is your gender? (Male / Female / Ambiguous)"),
    ),
    step(
        FieldKey::Gender,
        NextPrompt::Ask(
            "Does anyone in your family have genetic health problems? (Yes / No / Not sure)",
        ),
    ),
    step(
        FieldKey::FamilyHistory,
        NextPrompt::Ask("Have there been any birth defects in your family? (If none, type 'None')"),
    ),
    step(FieldKey::AutopsyBirthDefect, NextPrompt::SymptomSelection),
    step(
        FieldKey::AnomaliesInPreviousPregnancies,
        NextPrompt::Ask("Did you have trouble breathing when you were born? (Birth asphyxia)"),
    ),
    step(
        FieldKey::BirthAsphyxia,
        NextPrompt::Ask("Did your mother have any serious illness during pregnancy?"),
    ),
    step(
        FieldKey::MaternalIllness,
        NextPrompt::Ask("Was your mother exposed to X-rays during pregnancy?"),
    ),
    step(
        FieldKey::RadiationExposure,
        NextPrompt::Ask("Was assisted conception (IVF/ART) used?"),
    ),
    step(
        FieldKey::AssistedConception,
        NextPrompt::Ask("How old was your mother when you were born?"),
    ),
    step(
        FieldKey::MotherAge,
        NextPrompt::Ask("How old was your father when you were born?"),
    ),
    step(
        FieldKey::FatherAge,
        NextPrompt::Ask("How many previous abortions in the family?"),
    ),
    step(
        FieldKey::PreviousAbortions,
        NextPrompt::Ask("Did your mother take folic acid or vitamins during pregnancy?"),
    ),
    step(
        FieldKey::FolicAcid,
        NextPrompt::Ask("Do you know if you inherited any genes from your mother's side?"),
    ),
    step(
        FieldKey::GenesMotherSide,
        NextPrompt::Ask("Do you know if you inherited any genes from your father's side?"),
    ),
    step(
        FieldKey::InheritedFromFather,
        NextPrompt::Ask("Any specific maternal gene detected?"),
    ),
    step(
        FieldKey::MaternalGene,
        NextPrompt::Ask("Any specific paternal gene detected?"),
    ),
    step(
        FieldKey::PaternalGene,
        NextPrompt::Ask("Do you know your blood cell count?"),
    ),
    step(
        FieldKey::BloodCellCount,
        NextPrompt::Ask("Do you know your white blood cell count?"),
    ),
    step(
        FieldKey::WhiteBloodCellCount,
        NextPrompt::Ask("What was your recent blood test result?"),
    ),
    step(
        FieldKey::BloodTestResult,
        NextPrompt::Ask("Do you know your breathing rate?"),
    ),
    step(
        FieldKey::RespiratoryRate,
        NextPrompt::Ask("Do you know your heart rate?"),
    ),
    step(FieldKey::HeartRate, NextPrompt::FinalStep),
];

/// Looks up the step at `index`.
pub fn intake_step(index: usize) -> Option<&'static IntakeStep> {
    INTAKE_STEPS.get(index)
}
