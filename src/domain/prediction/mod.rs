//! Prediction module - feature assembly, override rules and finalization.
//!
//! Everything here is pure: the classifier call itself lives behind the
//! `Classifier` port and is driven by the application layer.

mod disorder;
mod feature_row;
mod phase;
mod result;
mod rules;

pub use disorder::DisorderClass;
pub use feature_row::{FeatureAssembler, FeatureRow, FeatureValue, TARGET_COLUMN};
pub use phase::PredictionPhase;
pub use result::{
    ClassDistribution, PredictionLabel, PredictionResult, FORCED_CONFIDENCE, NO_DISORDER_LABEL,
    UNIFORM_TOLERANCE,
};
pub use rules::{apply_domain_rules, select_rule, ClusterCounts, LineageFlags, RuleOutcome};
