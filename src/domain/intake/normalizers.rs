//! Field normalizers.
//!
//! Each normalizer maps raw chat text to a canonical value and never fails:
//! unparseable input yields the field's default so that a malformed answer
//! cannot abort the conversation. Normalizers are fixed points on their own
//! canonical output, which lets the feature assembler run them a second time.

use once_cell::sync::Lazy;
use regex::Regex;

use super::values::{
    BinaryAnswer, BirthAsphyxia, BloodTestResult, DefectPresence, Gender, HeartRate,
    ReportedAnswer, RespiratoryRate, YesNo,
};

static NAME_INTRO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(my name is|i am|this is)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)")
        .expect("name pattern compiles")
});

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_`]").expect("emphasis pattern compiles"));

static AGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,3})\b").expect("age pattern compiles"));

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d*\.?\d+").expect("number pattern compiles"));

const YES_TOKENS: &[&str] = &["y", "yes", "yeah", "yep", "true"];
const NO_TOKENS: &[&str] = &["n", "no", "nope", "false"];

const DEFECT_NEGATIVES: &[&str] = &[
    "none",
    "no",
    "nil",
    "-",
    "not applicable",
    "na",
    "n/a",
    "unknown",
];

const GENE_NEGATIVES: &[&str] = &[
    "no",
    "none",
    "nil",
    "-",
    "not detected",
    "n/a",
    "na",
    "null",
    "",
    "not sure",
    "unknown",
];

const BLOOD_NORMAL: &[&str] = &["normal", "n", "ok", "within range"];
const BLOOD_ABNORMAL_MARKERS: &[&str] = &["high", "low", "abnormal", "slightly abnormal"];

/// Default red blood cell count (million per mcL) when none is given.
pub const DEFAULT_BLOOD_CELL_COUNT: f64 = 4.8;

/// Default white blood cell count (thousand per microliter) when none is given.
pub const DEFAULT_WHITE_BLOOD_CELL_COUNT: f64 = 7.0;

fn folded(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Extracts a person's name from a free-text introduction.
///
/// Tries "my name is / i am / this is NAME" first, then falls back to the
/// title-cased words of the input, then to the trimmed input itself.
pub fn extract_name(text: &str) -> String {
    let cleaned = EMPHASIS.replace_all(text, "");

    if let Some(name) = NAME_INTRO.captures(&cleaned).and_then(|c| c.get(2)) {
        return name.as_str().trim().to_string();
    }

    let titled: Vec<&str> = cleaned.split_whitespace().filter(|w| is_title_case(w)).collect();
    if titled.is_empty() {
        cleaned.trim().to_string()
    } else {
        titled.join(" ")
    }
}

/// Title case: every cased run starts with one uppercase letter followed by
/// lowercase letters, and the word has at least one cased character.
fn is_title_case(word: &str) -> bool {
    let mut previous_cased = false;
    let mut any_cased = false;

    for c in word.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else {
            previous_cased = false;
        }
    }

    any_cased
}

/// First standalone run of 1-3 digits; 0 if none.
pub fn extract_age(text: &str) -> u32 {
    AGE.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// First signed/decimal number in the text; 0.0 if none.
pub fn extract_numeric(text: &str) -> f64 {
    first_number(text).unwrap_or(0.0)
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER.find(text).and_then(|m| m.as_str().parse().ok())
}

pub fn normalize_yes_no(text: &str) -> YesNo {
    let t = folded(text);
    if YES_TOKENS.contains(&t.as_str()) {
        YesNo::Yes
    } else if NO_TOKENS.contains(&t.as_str()) {
        YesNo::No
    } else {
        YesNo::NotSure
    }
}

/// Collapses a yes/no answer: "yes" stays yes, everything else is no.
pub fn map_binary_yes_no(text: &str) -> BinaryAnswer {
    match normalize_yes_no(text) {
        YesNo::Yes => BinaryAnswer::Yes,
        YesNo::No | YesNo::NotSure => BinaryAnswer::No,
    }
}

pub fn map_gender(text: &str) -> Gender {
    match folded(text).as_str() {
        "male" | "m" => Gender::Male,
        "female" | "f" => Gender::Female,
        _ => Gender::Ambiguous,
    }
}

pub fn map_birth_asphyxia(text: &str) -> BirthAsphyxia {
    match folded(text).as_str() {
        "no record" => return BirthAsphyxia::NoRecord,
        "not available" => return BirthAsphyxia::NotAvailable,
        _ => {}
    }

    match normalize_yes_no(text) {
        YesNo::Yes => BirthAsphyxia::Yes,
        YesNo::No => BirthAsphyxia::NoRecord,
        YesNo::NotSure => BirthAsphyxia::NotAvailable,
    }
}

/// Autopsy / birth-defect presence: a negative token means "None".
pub fn map_defect_presence(text: &str) -> DefectPresence {
    if DEFECT_NEGATIVES.contains(&folded(text).as_str()) {
        DefectPresence::None
    } else {
        DefectPresence::Yes
    }
}

/// Maternal/paternal gene presence: a negative token (including empty
/// input and "not sure") means "No".
pub fn map_gene_presence(text: &str) -> BinaryAnswer {
    if GENE_NEGATIVES.contains(&folded(text).as_str()) {
        BinaryAnswer::No
    } else {
        BinaryAnswer::Yes
    }
}

pub fn map_blood_test_result(text: &str) -> BloodTestResult {
    let t = folded(text);
    if BLOOD_NORMAL.contains(&t.as_str()) {
        BloodTestResult::Normal
    } else if BLOOD_ABNORMAL_MARKERS.iter().any(|k| t.contains(k)) {
        BloodTestResult::SlightlyAbnormal
    } else {
        BloodTestResult::Inconclusive
    }
}

/// Breaths per minute: 30-60 inclusive is normal.
pub fn map_respiratory_rate(text: &str) -> RespiratoryRate {
    let t = folded(text);
    if t.contains("tachyp") {
        return RespiratoryRate::Tachypnea;
    }
    if t.contains("normal") {
        return RespiratoryRate::Normal;
    }
    match first_number(&t) {
        Some(rate) if (30.0..=60.0).contains(&rate) => RespiratoryRate::Normal,
        Some(_) => RespiratoryRate::Tachypnea,
        None => RespiratoryRate::Normal,
    }
}

/// Beats per minute: above 100 is tachycardia.
pub fn map_heart_rate(text: &str) -> HeartRate {
    let t = folded(text);
    if t.contains("tachy") {
        return HeartRate::Tachycardia;
    }
    if t.contains("normal") {
        return HeartRate::Normal;
    }
    match first_number(&t) {
        Some(rate) if rate > 100.0 => HeartRate::Tachycardia,
        _ => HeartRate::Normal,
    }
}

/// Number of previous abortions, rounded and clamped at zero.
pub fn count_previous_abortions(text: &str) -> u32 {
    let value = extract_numeric(text).round();
    if value <= 0.0 {
        0
    } else {
        value.min(u32::MAX as f64) as u32
    }
}

pub fn blood_cell_count(text: &str) -> f64 {
    non_zero_or(extract_numeric(text), DEFAULT_BLOOD_CELL_COUNT)
}

pub fn white_blood_cell_count(text: &str) -> f64 {
    non_zero_or(extract_numeric(text), DEFAULT_WHITE_BLOOD_CELL_COUNT)
}

fn non_zero_or(value: f64, default: f64) -> f64 {
    if value == 0.0 {
        default
    } else {
        value
    }
}

/// Yes/no as re-normalized at feature assembly: also accepts "1"/"0" and
/// maps anything unrecognized to "Not available".
pub fn map_reported_yes_no(text: &str) -> ReportedAnswer {
    match folded(text).as_str() {
        "y" | "yes" | "yeah" | "yep" | "true" | "1" => ReportedAnswer::Yes,
        "n" | "no" | "nope" | "false" | "0" => ReportedAnswer::No,
        _ => ReportedAnswer::NotAvailable,
    }
}

/// Parses a comma-separated list of 1-based picks against a catalog of
/// `catalog_len` entries.
///
/// Returns `None` when no entry is an integer at all (the caller re-prompts).
/// Out-of-range picks are dropped; repeated picks are kept once, in order.
pub fn parse_symptom_selection(text: &str, catalog_len: usize) -> Option<Vec<usize>> {
    let mut saw_integer = false;
    let mut picks = Vec::new();

    for token in text.split(',').map(str::trim) {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        saw_integer = true;

        let Ok(one_based) = token.parse::<usize>() else {
            continue;
        };
        if one_based == 0 || one_based > catalog_len {
            continue;
        }
        let index = one_based - 1;
        if !picks.contains(&index) {
            picks.push(index);
        }
    }

    saw_integer.then_some(picks)
}
