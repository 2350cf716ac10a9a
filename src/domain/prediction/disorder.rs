//! Disorder classes the classifier can predict.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::symptoms::SymptomCluster;

/// One of the three genetic inheritance categories.
///
/// Ordering follows the label encoder (alphabetical by label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisorderClass {
    #[serde(rename = "Mitochondrial genetic inheritance disorders")]
    Mitochondrial,
    #[serde(rename = "Multifactorial genetic inheritance disorders")]
    Multifactorial,
    #[serde(rename = "Single-gene inheritance diseases")]
    SingleGene,
}

impl DisorderClass {
    pub fn all() -> &'static [DisorderClass] {
        &[
            DisorderClass::Mitochondrial,
            DisorderClass::Multifactorial,
            DisorderClass::SingleGene,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisorderClass::Mitochondrial => "Mitochondrial genetic inheritance disorders",
            DisorderClass::Multifactorial => "Multifactorial genetic inheritance disorders",
            DisorderClass::SingleGene => "Single-gene inheritance diseases",
        }
    }

    /// Symptom cluster whose override rule targets this class.
    pub fn cluster(&self) -> SymptomCluster {
        match self {
            DisorderClass::Mitochondrial => SymptomCluster::Mitochondrial,
            DisorderClass::Multifactorial => SymptomCluster::Multifactorial,
            DisorderClass::SingleGene => SymptomCluster::SingleGene,
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            DisorderClass::Mitochondrial => {
                "Mitochondrial genetic inheritance disorders are caused by mutations in the DNA of \
                 mitochondria, the energy-producing structures inside cells. Since mitochondria are \
                 passed from mother to child, these conditions are inherited maternally. They often \
                 affect energy-demanding organs like the brain, muscles, and heart, leading to \
                 fatigue, muscle weakness, and neurological problems."
            }
            DisorderClass::Multifactorial => {
                "Multifactorial genetic inheritance disorders are conditions caused by a combination \
                 of genetic factors and environmental influences. Examples include diabetes, heart \
                 disease, and certain cancers. These conditions usually run in families but are also \
                 strongly influenced by lifestyle and environment."
            }
            DisorderClass::SingleGene => {
                "Single-gene inheritance diseases are caused by mutations in a single gene. These can \
                 be inherited in dominant, recessive, or X-linked patterns. Examples include cystic \
                 fibrosis, sickle cell anemia, and Huntington's disease. Symptoms vary widely \
                 depending on the gene affected."
            }
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            DisorderClass::Mitochondrial => &[
                "Consult a genetic counselor for family risk assessment.",
                "Follow a healthy lifestyle with a balanced diet and regular exercise, as tolerated.",
                "Avoid smoking and alcohol, which may worsen mitochondrial stress.",
                "Consider supplements (like Coenzyme Q10 or vitamins) if recommended by a doctor.",
                "Schedule regular check-ups to monitor heart, muscle, and neurological health.",
            ],
            DisorderClass::Multifactorial => &[
                "Maintain a healthy diet and exercise regularly to lower risk factors.",
                "Go for regular health screenings (blood pressure, sugar levels, etc.).",
                "Avoid tobacco and limit alcohol intake.",
                "Stay aware of family medical history and discuss it with your healthcare provider.",
                "Adopt stress-reduction practices like yoga, meditation, or mindfulness.",
            ],
            DisorderClass::SingleGene => &[
                "Seek genetic testing to confirm the specific condition.",
                "Consult a genetic counselor for family planning advice.",
                "Follow treatment or therapy options prescribed for the specific disorder.",
                "Stay updated with ongoing research and support groups.",
                "Ensure regular follow-up with specialists for condition-specific monitoring.",
            ],
        }
    }
}

impl fmt::Display for DisorderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisorderClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisorderClass::all()
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("disorder_class", format!("unknown label '{}'", s))
            })
    }
}
