//! Domain override rules.
//!
//! Strong symptom evidence replaces the classifier output outright. Rules
//! are checked in a fixed order and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::intake::FieldKey;
use crate::domain::symptoms::SymptomCluster;

use super::disorder::DisorderClass;
use super::feature_row::FeatureRow;
use super::result::ClassDistribution;

/// Mitochondrial cluster size that, with maternal lineage, forces that class.
pub const MATERNAL_MITOCHONDRIAL_THRESHOLD: u32 = 3;
/// Single-gene cluster size that, with paternal lineage, forces that class.
pub const PATERNAL_SINGLE_GENE_THRESHOLD: u32 = 3;
/// Multifactorial cluster size that forces that class on its own.
pub const MULTIFACTORIAL_THRESHOLD: u32 = 4;

/// Number of flagged symptoms in each cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterCounts {
    pub mitochondrial: u32,
    pub single_gene: u32,
    pub multifactorial: u32,
}

impl ClusterCounts {
    pub fn from_row(row: &FeatureRow) -> Self {
        let count = |cluster: SymptomCluster| -> u32 {
            cluster.members().iter().map(|s| row.flag(s)).sum()
        };
        Self {
            mitochondrial: count(SymptomCluster::Mitochondrial),
            single_gene: count(SymptomCluster::SingleGene),
            multifactorial: count(SymptomCluster::Multifactorial),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mitochondrial == 0 && self.single_gene == 0 && self.multifactorial == 0
    }
}

/// Whether inheritance is reported on either side of the family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineageFlags {
    pub maternal: bool,
    pub paternal: bool,
}

impl LineageFlags {
    pub fn from_row(row: &FeatureRow) -> Self {
        let yes = |field: FieldKey| {
            row.category(field.canonical_name())
                .map(|v| v.trim().to_lowercase().starts_with('y'))
                .unwrap_or(false)
        };
        Self {
            maternal: yes(FieldKey::GenesMotherSide) || yes(FieldKey::MaternalGene),
            paternal: yes(FieldKey::InheritedFromFather) || yes(FieldKey::PaternalGene),
        }
    }
}

/// Which rule decided the adjusted distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    MaternalMitochondrial,
    PaternalSingleGene,
    Multifactorial,
    NoClusterSymptoms,
    ModelOutput,
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleOutcome::MaternalMitochondrial => "maternal_mitochondrial",
            RuleOutcome::PaternalSingleGene => "paternal_single_gene",
            RuleOutcome::Multifactorial => "multifactorial",
            RuleOutcome::NoClusterSymptoms => "no_cluster_symptoms",
            RuleOutcome::ModelOutput => "model_output",
        };
        f.write_str(s)
    }
}

/// Picks the rule that applies to `row`.
pub fn select_rule(row: &FeatureRow) -> RuleOutcome {
    let counts = ClusterCounts::from_row(row);
    let lineage = LineageFlags::from_row(row);

    if lineage.maternal && counts.mitochondrial >= MATERNAL_MITOCHONDRIAL_THRESHOLD {
        RuleOutcome::MaternalMitochondrial
    } else if lineage.paternal && counts.single_gene >= PATERNAL_SINGLE_GENE_THRESHOLD {
        RuleOutcome::PaternalSingleGene
    } else if counts.multifactorial >= MULTIFACTORIAL_THRESHOLD {
        RuleOutcome::Multifactorial
    } else if counts.is_empty() {
        RuleOutcome::NoClusterSymptoms
    } else {
        RuleOutcome::ModelOutput
    }
}

/// Applies the first matching rule to the model's distribution.
pub fn apply_domain_rules(
    row: &FeatureRow,
    model_output: ClassDistribution,
) -> (RuleOutcome, ClassDistribution) {
    let rule = select_rule(row);
    let adjusted = match rule {
        RuleOutcome::MaternalMitochondrial => ClassDistribution::forced(DisorderClass::Mitochondrial),
        RuleOutcome::PaternalSingleGene => ClassDistribution::forced(DisorderClass::SingleGene),
        RuleOutcome::Multifactorial => ClassDistribution::forced(DisorderClass::Multifactorial),
        RuleOutcome::NoClusterSymptoms => ClassDistribution::uniform(),
        RuleOutcome::ModelOutput => model_output,
    };
    (rule, adjusted)
}
