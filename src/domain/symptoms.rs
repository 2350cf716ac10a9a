//! Symptom catalog and symptom clusters.
//!
//! The catalog is a static reference list shared by every session: the
//! intake presents it for multi-select and the feature assembler emits one
//! binary column per entry, in this order.

use serde::{Deserialize, Serialize};

/// Selectable symptoms, in presentation order (1-based in the chat prompt).
pub const SYMPTOM_CATALOG: [&str; 55] = [
    "Cough",
    "Wheezing",
    "Frequent lung infections",
    "Poor growth",
    "Salty skin",
    "Shortness of breath",
    "Fatigue",
    "Digestive problems",
    "Clubbing of fingers",
    "Nasal polyps",
    "High blood sugar",
    "Excessive thirst",
    "Frequent urination",
    "Blurred vision",
    "Slow healing",
    "Tingling/numbness",
    "Weight loss",
    "Increased hunger",
    "Recurrent infections",
    "Joint pain",
    "Abdominal pain",
    "Liver enlargement",
    "Skin bronzing",
    "Heart problems",
    "Loss of libido",
    "Memory problems",
    "Vision loss",
    "Central vision defect",
    "Eye pain",
    "Color vision problems",
    "Visual hallucinations",
    "Difficulty reading",
    "Loss of depth perception",
    "Optic disc swelling",
    "Headaches",
    "Developmental delay",
    "Muscle weakness",
    "Vomiting",
    "Seizures",
    "Breathing problems",
    "Poor feeding",
    "Hypotonia",
    "Movement disorders",
    "Lactic acidosis",
    "Eye movement abnormalities",
    "Exercise intolerance",
    "Gastrointestinal problems",
    "Tremors",
    "Neuropathy",
    "Loss of motor skills",
    "Cherry-red spot",
    "Muscle stiffness",
    "Startle response",
    "Difficulty swallowing",
    "Poor coordination",
];

/// Returns the catalog as owned strings, as stored on a conversation.
pub fn symptom_catalog() -> Vec<String> {
    SYMPTOM_CATALOG.iter().map(|s| s.to_string()).collect()
}

/// Returns true if `name` is a catalog entry (exact match).
pub fn is_catalog_symptom(name: &str) -> bool {
    SYMPTOM_CATALOG.contains(&name)
}

/// Named symptom groups whose counts drive the domain override rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomCluster {
    Mitochondrial,
    SingleGene,
    Multifactorial,
}

impl SymptomCluster {
    /// All clusters.
    pub fn all() -> &'static [SymptomCluster] {
        &[
            SymptomCluster::Mitochondrial,
            SymptomCluster::SingleGene,
            SymptomCluster::Multifactorial,
        ]
    }

    /// Member symptoms of this cluster.
    pub fn members(&self) -> &'static [&'static str] {
        match self {
            SymptomCluster::Mitochondrial => &[
                "Lactic acidosis",
                "Muscle weakness",
                "Developmental delay",
                "Seizures",
                "Exercise intolerance",
                "Eye movement abnormalities",
                "Neuropathy",
                "Movement disorders",
                "Difficulty swallowing",
                "Poor coordination",
                "Tremors",
            ],
            SymptomCluster::SingleGene => &[
                "Cough",
                "Wheezing",
                "Frequent lung infections",
                "Poor growth",
                "Salty skin",
                "Shortness of breath",
                "Digestive problems",
                "Clubbing of fingers",
                "Nasal polyps",
            ],
            SymptomCluster::Multifactorial => &[
                "High blood sugar",
                "Excessive thirst",
                "Frequent urination",
                "Blurred vision",
                "Slow healing",
                "Weight loss",
                "Increased hunger",
                "Fatigue",
                "Joint pain",
                "Heart problems",
            ],
        }
    }
}
