//! Canonical field keys and their friendly aliases.
//!
//! Canonical names match the classifier's training schema byte for byte
//! (including the unbalanced "Heart Rate (rates/min"). Aliases are the
//! short keys older callers used for the same field; `FieldKey::resolve`
//! is the single place where an alias is turned back into its field.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Name,
    PatientAge,
    Gender,
    FamilyHistory,
    AutopsyBirthDefect,
    AnomaliesInPreviousPregnancies,
    BirthAsphyxia,
    MaternalIllness,
    RadiationExposure,
    AssistedConception,
    MotherAge,
    FatherAge,
    PreviousAbortions,
    FolicAcid,
    GenesMotherSide,
    InheritedFromFather,
    MaternalGene,
    PaternalGene,
    BloodCellCount,
    WhiteBloodCellCount,
    BloodTestResult,
    RespiratoryRate,
    HeartRate,
    Symptoms,
    DateOfBirth,
}

impl FieldKey {
    /// Every field, in intake order followed by the side-channel fields.
    pub fn all() -> &'static [FieldKey] {
        use FieldKey::*;
        &[
            Name,
            PatientAge,
            Gender,
            FamilyHistory,
            AutopsyBirthDefect,
            AnomaliesInPreviousPregnancies,
            BirthAsphyxia,
            MaternalIllness,
            RadiationExposure,
            AssistedConception,
            MotherAge,
            FatherAge,
            PreviousAbortions,
            FolicAcid,
            GenesMotherSide,
            InheritedFromFather,
            MaternalGene,
            PaternalGene,
            BloodCellCount,
            WhiteBloodCellCount,
            BloodTestResult,
            RespiratoryRate,
            HeartRate,
            Symptoms,
            DateOfBirth,
        ]
    }

    /// Long-form name from the training schema.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::PatientAge => "Patient Age",
            FieldKey::Gender => "Gender",
            FieldKey::FamilyHistory => "Family History",
            FieldKey::AutopsyBirthDefect => "Autopsy shows birth defect (if applicable)",
            FieldKey::AnomaliesInPreviousPregnancies => {
                "History of anomalies in previous pregnancies"
            }
            FieldKey::BirthAsphyxia => "Birth asphyxia",
            FieldKey::MaternalIllness => "H/O serious maternal illness",
            FieldKey::RadiationExposure => "H/O radiation exposure (x-ray)",
            FieldKey::AssistedConception => "Assisted conception IVF/ART",
            FieldKey::MotherAge => "Mother's age",
            FieldKey::FatherAge => "Father's age",
            FieldKey::PreviousAbortions => "No. of previous abortion",
            FieldKey::FolicAcid => "Folic acid details (peri-conceptional)",
            FieldKey::GenesMotherSide => "Genes in mother's side",
            FieldKey::InheritedFromFather => "Inherited from father",
            FieldKey::MaternalGene => "Maternal gene",
            FieldKey::PaternalGene => "Paternal gene",
            FieldKey::BloodCellCount => "Blood cell count (mcL)",
            FieldKey::WhiteBloodCellCount => "White Blood cell count (thousand per microliter)",
            FieldKey::BloodTestResult => "Blood test result",
            FieldKey::RespiratoryRate => "Respiratory Rate (breaths/min)",
            FieldKey::HeartRate => "Heart Rate (rates/min",
            FieldKey::Symptoms => "Symptoms",
            FieldKey::DateOfBirth => "dob",
        }
    }

    /// Short duplicate keys written next to the canonical one.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            FieldKey::Name => &["patient_name"],
            FieldKey::PatientAge => &["age"],
            FieldKey::Gender => &["sex"],
            FieldKey::FamilyHistory => &["family_history"],
            FieldKey::AutopsyBirthDefect => &["Autopsy"],
            _ => &[],
        }
    }

    /// Resolves a canonical name or an alias to its field.
    pub fn resolve(key: &str) -> Option<FieldKey> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.canonical_name() == key || f.aliases().contains(&key))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn resolve_accepts_canonical_and_alias() {
        assert_eq!(FieldKey::resolve("Patient Age"), Some(FieldKey::PatientAge));
        assert_eq!(FieldKey::resolve("age"), Some(FieldKey::PatientAge));
        assert_eq!(FieldKey::resolve("sex"), Some(FieldKey::Gender));
        assert_eq!(FieldKey::resolve("family_history"), Some(FieldKey::FamilyHistory));
        assert_eq!(FieldKey::resolve("Autopsy"), Some(FieldKey::AutopsyBirthDefect));
    }

    #[test]
    fn resolve_rejects_unknown_keys() {
        assert_eq!(FieldKey::resolve("Heart Rate (rates/min)"), None);
        assert_eq!(FieldKey::resolve("AGE"), None);
    }

    #[test]
    fn every_name_is_unique() {
        let mut seen = HashSet::new();
        for field in FieldKey::all() {
            assert!(seen.insert(field.canonical_name()));
            for alias in field.aliases() {
                assert!(seen.insert(alias), "alias {} collides", alias);
            }
        }
    }

    #[test]
    fn every_field_resolves_to_itself() {
        for field in FieldKey::all() {
            assert_eq!(FieldKey::resolve(field.canonical_name()), Some(*field));
        }
    }
}
