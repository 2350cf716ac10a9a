//! Feature assembly: answers in, classifier row out.
//!
//! The row is addressed by feature name, never by position. Every value is
//! re-normalized here even though the intake already normalized it, so a
//! row built from restored or hand-written state is still canonical.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::intake::normalizers::{
    map_birth_asphyxia, map_blood_test_result, map_defect_presence, map_gene_presence,
    map_gender, map_heart_rate, map_reported_yes_no, map_respiratory_rate,
    DEFAULT_BLOOD_CELL_COUNT, DEFAULT_WHITE_BLOOD_CELL_COUNT,
};
use crate::domain::intake::{AnswerValue, FieldKey, IntakeAnswers};
use crate::domain::symptoms::SYMPTOM_CATALOG;

/// Column that may appear in declared feature lists but is the target.
pub const TARGET_COLUMN: &str = "Disorder";

pub const SUBSTANCE_ABUSE_COLUMN: &str = "H/O substance abuse";

const DEFAULT_PATIENT_AGE: f64 = 30.0;
const DEFAULT_MOTHER_AGE: f64 = 30.0;
const DEFAULT_FATHER_AGE: f64 = 32.0;
const DEFAULT_PREVIOUS_ABORTIONS: f64 = 0.0;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(c) => Some(c),
            FeatureValue::Number(_) => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Category(s.to_string())
    }
}

/// Name-addressed classifier input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRow(BTreeMap<String, FeatureValue>);

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FeatureValue::as_number)
    }

    pub fn category(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FeatureValue::as_category)
    }

    /// Integer flag value of a column; anything non-numeric counts as 0.
    pub fn flag(&self, name: &str) -> u32 {
        match self.number(name) {
            Some(n) if n >= 1.0 => n as u32,
            _ => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.0.iter()
    }

    /// Adds every declared feature the row lacks, defaulted to 0.
    ///
    /// The target column is skipped.
    pub fn align_to<S: AsRef<str>>(&mut self, feature_names: &[S]) -> usize {
        let mut added = 0;
        for name in feature_names.iter().map(AsRef::as_ref) {
            if name == TARGET_COLUMN || self.contains(name) {
                continue;
            }
            self.insert(name, 0.0);
            added += 1;
        }
        added
    }
}

/// Builds classifier rows from intake answers.
pub struct FeatureAssembler;

impl FeatureAssembler {
    /// Assembles the full row: numerics, categoricals, gene flags and one
    /// 0/1 column per catalog symptom. Never fails.
    pub fn assemble(answers: &IntakeAnswers) -> FeatureRow {
        let record = answers.to_record();
        let mut row = FeatureRow::new();

        let whole = |field: FieldKey, default: f64| {
            lookup(&record, &[field.canonical_name()])
                .and_then(AnswerValue::as_f64)
                .map(f64::round)
                .unwrap_or(default)
        };
        let decimal = |field: FieldKey, default: f64| {
            lookup(&record, &[field.canonical_name()])
                .and_then(AnswerValue::as_f64)
                .unwrap_or(default)
        };

        row.insert(
            FieldKey::PatientAge.canonical_name(),
            lookup(&record, &[FieldKey::PatientAge.canonical_name(), "age"])
                .and_then(AnswerValue::as_f64)
                .map(f64::round)
                .unwrap_or(DEFAULT_PATIENT_AGE),
        );
        row.insert(
            FieldKey::BloodCellCount.canonical_name(),
            decimal(FieldKey::BloodCellCount, DEFAULT_BLOOD_CELL_COUNT),
        );
        row.insert(
            FieldKey::MotherAge.canonical_name(),
            whole(FieldKey::MotherAge, DEFAULT_MOTHER_AGE),
        );
        row.insert(
            FieldKey::FatherAge.canonical_name(),
            whole(FieldKey::FatherAge, DEFAULT_FATHER_AGE),
        );
        row.insert(
            FieldKey::PreviousAbortions.canonical_name(),
            whole(FieldKey::PreviousAbortions, DEFAULT_PREVIOUS_ABORTIONS),
        );
        row.insert(
            FieldKey::WhiteBloodCellCount.canonical_name(),
            decimal(FieldKey::WhiteBloodCellCount, DEFAULT_WHITE_BLOOD_CELL_COUNT),
        );

        let text = |keys: &[&str], default: &str| -> String {
            lookup(&record, keys)
                .map(AnswerValue::as_text)
                .unwrap_or_else(|| default.to_string())
        };

        row.insert(
            FieldKey::Gender.canonical_name(),
            map_gender(&text(&[FieldKey::Gender.canonical_name(), "sex"], "Ambiguous")).as_str(),
        );
        row.insert(
            FieldKey::BirthAsphyxia.canonical_name(),
            map_birth_asphyxia(&text(&[FieldKey::BirthAsphyxia.canonical_name()], "No record"))
                .as_str(),
        );
        row.insert(
            FieldKey::AutopsyBirthDefect.canonical_name(),
            map_defect_presence(&text(
                &[FieldKey::AutopsyBirthDefect.canonical_name(), "Autopsy"],
                "None",
            ))
            .as_str(),
        );

        for field in [
            FieldKey::FolicAcid,
            FieldKey::MaternalIllness,
            FieldKey::RadiationExposure,
            FieldKey::AssistedConception,
            FieldKey::AnomaliesInPreviousPregnancies,
            FieldKey::GenesMotherSide,
            FieldKey::InheritedFromFather,
        ] {
            let value = map_reported_yes_no(&text(&[field.canonical_name()], "No"));
            row.insert(field.canonical_name(), value.as_str());
        }

        row.insert(SUBSTANCE_ABUSE_COLUMN, "-");
        row.insert(
            FieldKey::BloodTestResult.canonical_name(),
            map_blood_test_result(&text(&[FieldKey::BloodTestResult.canonical_name()], "normal"))
                .as_str(),
        );
        row.insert(
            FieldKey::RespiratoryRate.canonical_name(),
            map_respiratory_rate(&text(
                &[FieldKey::RespiratoryRate.canonical_name()],
                "Normal (30-60)",
            ))
            .as_str(),
        );
        row.insert(
            FieldKey::HeartRate.canonical_name(),
            map_heart_rate(&text(&[FieldKey::HeartRate.canonical_name()], "Normal")).as_str(),
        );

        for field in [FieldKey::MaternalGene, FieldKey::PaternalGene] {
            let value = map_gene_presence(&text(&[field.canonical_name()], "No"));
            row.insert(field.canonical_name(), value.as_str());
        }

        for symptom in SYMPTOM_CATALOG {
            let flag = if answers.has_symptom(symptom) { 1.0 } else { 0.0 };
            row.insert(symptom, flag);
        }

        row
    }
}

fn lookup<'a>(record: &'a BTreeMap<String, AnswerValue>, keys: &[&str]) -> Option<&'a AnswerValue> {
    keys.iter().find_map(|k| record.get(*k))
}
