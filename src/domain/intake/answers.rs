//! Typed answer store for one intake session.
//!
//! Every captured field has its own typed slot; there is no string-keyed
//! map to drift out of sync. Callers that still speak in schema names or
//! short aliases go through [`IntakeAnswers::lookup`], which resolves the
//! key via [`FieldKey::resolve`] first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fields::FieldKey;
use super::normalizers::{
    blood_cell_count, count_previous_abortions, extract_age, extract_name, extract_numeric,
    map_binary_yes_no, map_birth_asphyxia, map_blood_test_result, map_defect_presence,
    map_gender, map_gene_presence, map_heart_rate, map_respiratory_rate, white_blood_cell_count,
};
use super::values::{
    BinaryAnswer, BirthAsphyxia, BloodTestResult, DefectPresence, Gender, HeartRate,
    RespiratoryRate,
};
use crate::domain::symptoms::is_catalog_symptom;

/// A normalized answer as exposed through the plain-mapping view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Text form used by re-normalization; lists are comma-joined.
    pub fn as_text(&self) -> String {
        match self {
            AnswerValue::Integer(i) => i.to_string(),
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::List(items) => items.join(", "),
        }
    }

    /// Numeric coercion; text is parsed as a whole, never partially.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(i) => Some(*i as f64),
            AnswerValue::Number(n) if n.is_finite() => Some(*n),
            AnswerValue::Number(_) => None,
            AnswerValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            AnswerValue::List(_) => None,
        }
    }
}

fn text<T: ToString>(value: T) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

/// Patient details supplied up front instead of through the chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    pub sex: String,
    pub age: String,
    pub date_of_birth: Option<String>,
}

/// Normalized answers collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeAnswers {
    name: Option<String>,
    patient_age: Option<u32>,
    gender: Option<Gender>,
    family_history: Option<BinaryAnswer>,
    autopsy_birth_defect: Option<DefectPresence>,
    anomalies_in_previous_pregnancies: Option<BinaryAnswer>,
    birth_asphyxia: Option<BirthAsphyxia>,
    maternal_illness: Option<BinaryAnswer>,
    radiation_exposure: Option<BinaryAnswer>,
    assisted_conception: Option<BinaryAnswer>,
    mother_age: Option<f64>,
    father_age: Option<f64>,
    previous_abortions: Option<u32>,
    folic_acid: Option<BinaryAnswer>,
    genes_mother_side: Option<BinaryAnswer>,
    inherited_from_father: Option<BinaryAnswer>,
    maternal_gene: Option<BinaryAnswer>,
    paternal_gene: Option<BinaryAnswer>,
    blood_cell_count: Option<f64>,
    white_blood_cell_count: Option<f64>,
    blood_test_result: Option<BloodTestResult>,
    respiratory_rate: Option<RespiratoryRate>,
    heart_rate: Option<HeartRate>,
    /// Selected symptoms, in selection order.
    symptoms: Option<Vec<String>>,
    /// Direct per-symptom answers, keyed by catalog name.
    symptom_flags: BTreeMap<String, bool>,
    date_of_birth: Option<String>,
}

impl IntakeAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `raw` with the field's normalizer, stores it, and returns
    /// the stored value.
    pub fn capture(&mut self, field: FieldKey, raw: &str) -> AnswerValue {
        match field {
            FieldKey::Name => {
                let v = extract_name(raw);
                self.name = Some(v.clone());
                AnswerValue::Text(v)
            }
            FieldKey::PatientAge => {
                let v = extract_age(raw);
                self.patient_age = Some(v);
                AnswerValue::Integer(v as i64)
            }
            FieldKey::Gender => {
                let v = map_gender(raw);
                self.gender = Some(v);
                text(v)
            }
            FieldKey::FamilyHistory => Self::set_binary(&mut self.family_history, raw),
            FieldKey::AutopsyBirthDefect => {
                let v = map_defect_presence(raw);
                self.autopsy_birth_defect = Some(v);
                text(v)
            }
            FieldKey::AnomaliesInPreviousPregnancies => {
                Self::set_binary(&mut self.anomalies_in_previous_pregnancies, raw)
            }
            FieldKey::BirthAsphyxia => {
                let v = map_birth_asphyxia(raw);
                self.birth_asphyxia = Some(v);
                text(v)
            }
            FieldKey::MaternalIllness => Self::set_binary(&mut self.maternal_illness, raw),
            FieldKey::RadiationExposure => Self::set_binary(&mut self.radiation_exposure, raw),
            FieldKey::AssistedConception => Self::set_binary(&mut self.assisted_conception, raw),
            FieldKey::MotherAge => {
                let v = extract_numeric(raw);
                self.mother_age = Some(v);
                AnswerValue::Number(v)
            }
            FieldKey::FatherAge => {
                let v = extract_numeric(raw);
                self.father_age = Some(v);
                AnswerValue::Number(v)
            }
            FieldKey::PreviousAbortions => {
                let v = count_previous_abortions(raw);
                self.previous_abortions = Some(v);
                AnswerValue::Integer(v as i64)
            }
            FieldKey::FolicAcid => Self::set_binary(&mut self.folic_acid, raw),
            FieldKey::GenesMotherSide => Self::set_binary(&mut self.genes_mother_side, raw),
            FieldKey::InheritedFromFather => Self::set_binary(&mut self.inherited_from_father, raw),
            FieldKey::MaternalGene => {
                let v = map_gene_presence(raw);
                self.maternal_gene = Some(v);
                text(v)
            }
            FieldKey::PaternalGene => {
                let v = map_gene_presence(raw);
                self.paternal_gene = Some(v);
                text(v)
            }
            FieldKey::BloodCellCount => {
                let v = blood_cell_count(raw);
                self.blood_cell_count = Some(v);
                AnswerValue::Number(v)
            }
            FieldKey::WhiteBloodCellCount => {
                let v = white_blood_cell_count(raw);
                self.white_blood_cell_count = Some(v);
                AnswerValue::Number(v)
            }
            FieldKey::BloodTestResult => {
                let v = map_blood_test_result(raw);
                self.blood_test_result = Some(v);
                text(v)
            }
            FieldKey::RespiratoryRate => {
                let v = map_respiratory_rate(raw);
                self.respiratory_rate = Some(v);
                text(v)
            }
            FieldKey::HeartRate => {
                let v = map_heart_rate(raw);
                self.heart_rate = Some(v);
                text(v)
            }
            FieldKey::Symptoms => {
                let picked: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| is_catalog_symptom(s))
                    .map(str::to_string)
                    .collect();
                self.select_symptoms(picked.clone());
                AnswerValue::List(picked)
            }
            FieldKey::DateOfBirth => {
                let v = raw.trim().to_string();
                self.date_of_birth = Some(v.clone());
                AnswerValue::Text(v)
            }
        }
    }

    fn set_binary(slot: &mut Option<BinaryAnswer>, raw: &str) -> AnswerValue {
        let v = map_binary_yes_no(raw);
        *slot = Some(v);
        text(v)
    }

    /// Records the multi-select result; duplicates are dropped.
    pub fn select_symptoms(&mut self, symptoms: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(symptoms.len());
        for s in symptoms {
            if !unique.contains(&s) {
                unique.push(s);
            }
        }
        self.symptoms = Some(unique);
    }

    /// Records a direct per-symptom answer.
    pub fn set_symptom_flag(&mut self, symptom: impl Into<String>, present: bool) {
        self.symptom_flags.insert(symptom.into(), present);
    }

    /// Stores up-front patient details (name, sex, age, date of birth).
    pub fn prefill(&mut self, details: &PatientDetails) {
        self.capture(FieldKey::Name, &details.name);
        self.capture(FieldKey::Gender, &details.sex);
        self.capture(FieldKey::PatientAge, &details.age);
        if let Some(dob) = &details.date_of_birth {
            self.capture(FieldKey::DateOfBirth, dob);
        }
    }

    /// True if the symptom was selected or directly flagged present.
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptom_flags.get(symptom).copied().unwrap_or(false)
            || self
                .symptoms
                .as_ref()
                .is_some_and(|picked| picked.iter().any(|s| s == symptom))
    }

    /// Value of a field in its plain form, if captured.
    pub fn value(&self, field: FieldKey) -> Option<AnswerValue> {
        match field {
            FieldKey::Name => self.name.clone().map(AnswerValue::Text),
            FieldKey::PatientAge => self.patient_age.map(|v| AnswerValue::Integer(v as i64)),
            FieldKey::Gender => self.gender.map(text),
            FieldKey::FamilyHistory => self.family_history.map(text),
            FieldKey::AutopsyBirthDefect => self.autopsy_birth_defect.map(text),
            FieldKey::AnomaliesInPreviousPregnancies => {
                self.anomalies_in_previous_pregnancies.map(text)
            }
            FieldKey::BirthAsphyxia => self.birth_asphyxia.map(text),
            FieldKey::MaternalIllness => self.maternal_illness.map(text),
            FieldKey::RadiationExposure => self.radiation_exposure.map(text),
            FieldKey::AssistedConception => self.assisted_conception.map(text),
            FieldKey::MotherAge => self.mother_age.map(AnswerValue::Number),
            FieldKey::FatherAge => self.father_age.map(AnswerValue::Number),
            FieldKey::PreviousAbortions => {
                self.previous_abortions.map(|v| AnswerValue::Integer(v as i64))
            }
            FieldKey::FolicAcid => self.folic_acid.map(text),
            FieldKey::GenesMotherSide => self.genes_mother_side.map(text),
            FieldKey::InheritedFromFather => self.inherited_from_father.map(text),
            FieldKey::MaternalGene => self.maternal_gene.map(text),
            FieldKey::PaternalGene => self.paternal_gene.map(text),
            FieldKey::BloodCellCount => self.blood_cell_count.map(AnswerValue::Number),
            FieldKey::WhiteBloodCellCount => self.white_blood_cell_count.map(AnswerValue::Number),
            FieldKey::BloodTestResult => self.blood_test_result.map(text),
            FieldKey::RespiratoryRate => self.respiratory_rate.map(text),
            FieldKey::HeartRate => self.heart_rate.map(text),
            FieldKey::Symptoms => self.symptoms.clone().map(AnswerValue::List),
            FieldKey::DateOfBirth => self.date_of_birth.clone().map(AnswerValue::Text),
        }
    }

    /// Looks a value up by canonical name or alias.
    pub fn lookup(&self, key: &str) -> Option<AnswerValue> {
        FieldKey::resolve(key).and_then(|field| self.value(field))
    }

    /// Plain-mapping view: canonical names plus their aliases, plus one 0/1
    /// entry per directly flagged symptom. This is the shape handed to
    /// report rendering and to anything that wants untyped access.
    pub fn to_record(&self) -> BTreeMap<String, AnswerValue> {
        let mut record = BTreeMap::new();
        for field in FieldKey::all() {
            if let Some(value) = self.value(*field) {
                for alias in field.aliases() {
                    record.insert(alias.to_string(), value.clone());
                }
                record.insert(field.canonical_name().to_string(), value);
            }
        }
        for (symptom, present) in &self.symptom_flags {
            record.insert(symptom.clone(), AnswerValue::Integer(i64::from(*present)));
        }
        record
    }

    /// Selected symptoms, empty if the selection step was never answered.
    pub fn selected_symptoms(&self) -> &[String] {
        self.symptoms.as_deref().unwrap_or(&[])
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        self.date_of_birth.as_deref()
    }

    /// Number of captured fields (aliases not counted).
    pub fn len(&self) -> usize {
        FieldKey::all().iter().filter(|f| self.value(**f).is_some()).count()
            + self.symptom_flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_normalizes_before_storing() {
        let mut answers = IntakeAnswers::new();
        let stored = answers.capture(FieldKey::Gender, " f ");
        assert_eq!(stored, AnswerValue::Text("Female".to_string()));
        assert_eq!(answers.value(FieldKey::Gender), Some(AnswerValue::Text("Female".to_string())));
    }

    #[test]
    fn lookup_resolves_aliases() {
        let mut answers = IntakeAnswers::new();
        answers.capture(FieldKey::PatientAge, "I'm 42");
        answers.capture(FieldKey::FamilyHistory, "yep");

        assert_eq!(answers.lookup("age"), Some(AnswerValue::Integer(42)));
        assert_eq!(answers.lookup("Patient Age"), Some(AnswerValue::Integer(42)));
        assert_eq!(answers.lookup("family_history"), Some(AnswerValue::Text("Yes".into())));
        assert_eq!(answers.lookup("unknown key"), None);
    }

    #[test]
    fn record_contains_canonical_names_and_aliases() {
        let mut answers = IntakeAnswers::new();
        answers.capture(FieldKey::Name, "my name is Ada Lovelace");
        answers.capture(FieldKey::Gender, "female");

        let record = answers.to_record();
        assert_eq!(record.get("name"), Some(&AnswerValue::Text("Ada Lovelace".into())));
        assert_eq!(record.get("patient_name"), Some(&AnswerValue::Text("Ada Lovelace".into())));
        assert_eq!(record.get("Gender"), Some(&AnswerValue::Text("Female".into())));
        assert_eq!(record.get("sex"), Some(&AnswerValue::Text("Female".into())));
        assert!(!record.contains_key("Patient Age"));
    }

    #[test]
    fn symptom_presence_combines_selection_and_flags() {
        let mut answers = IntakeAnswers::new();
        answers.select_symptoms(vec!["Cough".into(), "Cough".into(), "Seizures".into()]);
        answers.set_symptom_flag("Tremors", true);
        answers.set_symptom_flag("Fatigue", false);

        assert_eq!(answers.selected_symptoms(), &["Cough".to_string(), "Seizures".to_string()]);
        assert!(answers.has_symptom("Cough"));
        assert!(answers.has_symptom("Tremors"));
        assert!(!answers.has_symptom("Fatigue"));
        assert!(!answers.has_symptom("Vomiting"));
    }

    #[test]
    fn capture_symptoms_from_text_keeps_catalog_names_only() {
        let mut answers = IntakeAnswers::new();
        let stored = answers.capture(FieldKey::Symptoms, "Cough, sneezing, Fatigue");
        assert_eq!(stored, AnswerValue::List(vec!["Cough".into(), "Fatigue".into()]));
    }

    #[test]
    fn prefill_stores_patient_details() {
        let mut answers = IntakeAnswers::new();
        answers.prefill(&PatientDetails {
            name: "Grace Hopper".into(),
            sex: "F".into(),
            age: "85".into(),
            date_of_birth: Some("1906-12-09".into()),
        });

        assert_eq!(answers.name(), Some("Grace Hopper"));
        assert_eq!(answers.lookup("sex"), Some(AnswerValue::Text("Female".into())));
        assert_eq!(answers.lookup("age"), Some(AnswerValue::Integer(85)));
        assert_eq!(answers.date_of_birth(), Some("1906-12-09"));
    }

    #[test]
    fn answer_value_numeric_coercion() {
        assert_eq!(AnswerValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(AnswerValue::Text(" 4.5 ".into()).as_f64(), Some(4.5));
        assert_eq!(AnswerValue::Text("abc".into()).as_f64(), None);
        assert_eq!(AnswerValue::Number(f64::NAN).as_f64(), None);
        assert_eq!(AnswerValue::List(vec![]).as_f64(), None);
    }

    #[test]
    fn answers_survive_yaml_round_trip() {
        let mut answers = IntakeAnswers::new();
        answers.capture(FieldKey::BirthAsphyxia, "no");
        answers.select_symptoms(vec!["Headaches".into()]);

        let yaml = serde_yaml::to_string(&answers).unwrap();
        let restored: IntakeAnswers = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, answers);
        assert_eq!(restored.lookup("Birth asphyxia"), Some(AnswerValue::Text("No record".into())));
    }

    #[test]
    fn len_counts_captured_fields() {
        let mut answers = IntakeAnswers::new();
        assert!(answers.is_empty());
        answers.capture(FieldKey::Name, "Ann");
        answers.capture(FieldKey::PatientAge, "20");
        assert_eq!(answers.len(), 2);
    }
}
