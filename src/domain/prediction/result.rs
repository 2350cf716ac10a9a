//! Class distributions and the finalized prediction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::disorder::DisorderClass;

/// Label used when no class stands out from the others.
pub const NO_DISORDER_LABEL: &str = "No Disorder / Low Risk";

/// Maximum distance from 1/N for a distribution to count as uniform.
pub const UNIFORM_TOLERANCE: f64 = 0.05;

/// Confidence given to a class when an override rule fires.
pub const FORCED_CONFIDENCE: f64 = 0.90;

/// Probability left on every other class when an override rule fires.
pub const FORCED_REMAINDER: f64 = 0.05;

/// Probability per disorder class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassDistribution(BTreeMap<DisorderClass, f64>);

impl ClassDistribution {
    /// Pairs `classes` with `probabilities` position by position.
    pub fn from_pairs(
        classes: &[DisorderClass],
        probabilities: &[f64],
    ) -> Result<Self, ValidationError> {
        if classes.len() != probabilities.len() {
            return Err(ValidationError::invalid_format(
                "probabilities",
                format!(
                    "expected {} probabilities, got {}",
                    classes.len(),
                    probabilities.len()
                ),
            ));
        }
        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(ValidationError::invalid_format(
                "probabilities",
                format!("invalid probability {}", bad),
            ));
        }
        Ok(Self(classes.iter().copied().zip(probabilities.iter().copied()).collect()))
    }

    /// 0.90 on `winner`, 0.05 on every other class.
    pub fn forced(winner: DisorderClass) -> Self {
        Self(
            DisorderClass::all()
                .iter()
                .map(|c| {
                    let p = if *c == winner { FORCED_CONFIDENCE } else { FORCED_REMAINDER };
                    (*c, p)
                })
                .collect(),
        )
    }

    /// 1/N on every class.
    pub fn uniform() -> Self {
        let share = 1.0 / DisorderClass::all().len() as f64;
        Self(DisorderClass::all().iter().map(|c| (*c, share)).collect())
    }

    pub fn probability(&self, class: DisorderClass) -> f64 {
        self.0.get(&class).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DisorderClass, f64)> + '_ {
        self.0.iter().map(|(c, p)| (*c, *p))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Highest-probability class; ties go to the earlier class.
    pub fn argmax(&self) -> Option<(DisorderClass, f64)> {
        self.iter().fold(None, |best, (class, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((class, p)),
        })
    }

    /// True when every class is within [`UNIFORM_TOLERANCE`] of 1/N.
    pub fn is_near_uniform(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let share = 1.0 / self.len() as f64;
        self.0.values().all(|p| (p - share).abs() < UNIFORM_TOLERANCE)
    }
}

/// Headline of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PredictionLabel {
    Disorder(DisorderClass),
    NoDisorder,
}

impl PredictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Disorder(class) => class.label(),
            PredictionLabel::NoDisorder => NO_DISORDER_LABEL,
        }
    }

    pub fn disorder(&self) -> Option<DisorderClass> {
        match self {
            PredictionLabel::Disorder(class) => Some(*class),
            PredictionLabel::NoDisorder => None,
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PredictionLabel> for String {
    fn from(label: PredictionLabel) -> Self {
        label.as_str().to_string()
    }
}

impl TryFrom<String> for PredictionLabel {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == NO_DISORDER_LABEL {
            return Ok(PredictionLabel::NoDisorder);
        }
        value.parse().map(PredictionLabel::Disorder)
    }
}

/// Finalized prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: PredictionLabel,
    /// Probability of the headline class, 0.0 for "no disorder".
    pub confidence: f64,
    pub distribution: ClassDistribution,
}

impl PredictionResult {
    /// Picks the headline from an adjusted distribution.
    pub fn finalize(distribution: ClassDistribution) -> Self {
        if distribution.is_near_uniform() {
            return Self::no_signal(distribution);
        }
        match distribution.argmax() {
            Some((class, p)) => Self {
                label: PredictionLabel::Disorder(class),
                confidence: p,
                distribution,
            },
            None => Self::no_signal(distribution),
        }
    }

    /// "No Disorder / Low Risk" with zero confidence.
    pub fn no_signal(distribution: ClassDistribution) -> Self {
        Self {
            label: PredictionLabel::NoDisorder,
            confidence: 0.0,
            distribution,
        }
    }

    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }

    /// One-line summary as shown in the chat, HTML line break included.
    pub fn summary_line(&self) -> String {
        format!(
            "Predicted Genetic Disorder Category: {} (Confidence: {:.2}%)<br>",
            self.label,
            self.confidence_percent()
        )
    }
}
