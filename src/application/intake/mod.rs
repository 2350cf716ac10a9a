//! Intake orchestration.
//!
//! - `IntakeSession` - drives one conversation, including the final
//!   prediction and report hand-off
//! - `RuleAdjustedPredictor` - classifier call plus domain override rules

mod predictor;
mod session;

pub use predictor::{PredictionError, RuleAdjustedPredictor};
pub use session::{
    ChatReply, IntakeError, IntakeSession, ReportInfo, StructuredReply, REPORT_DOWNLOAD_ROUTE,
};
