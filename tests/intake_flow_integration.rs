//! Integration tests for the conversational intake.
//!
//! These tests drive an `IntakeSession` end to end through the public API:
//! 1. The scripted questions and the symptom multi-select
//! 2. The two-phase handoff from "please wait" to the final result
//! 3. Rule-adjusted predictions and report generation

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use geneaccess::adapters::classifier::CachedModelHandle;
use geneaccess::adapters::report::HtmlReportRenderer;
use geneaccess::application::intake::{
    ChatReply, IntakeError, IntakeSession, PredictionError, RuleAdjustedPredictor,
    StructuredReply,
};
use geneaccess::domain::foundation::SessionId;
use geneaccess::domain::intake::{
    Step, PROCESSING_MESSAGE, STEP_NOT_FOUND, SYMPTOM_SELECTION_MESSAGE,
    SYMPTOM_SELECTION_RETRY, WELCOME_PROMPT,
};
use geneaccess::domain::prediction::{
    DisorderClass, FeatureRow, PredictionLabel, NO_DISORDER_LABEL,
};
use geneaccess::domain::symptoms::SYMPTOM_CATALOG;
use geneaccess::ports::{
    Classifier, ClassifierError, RenderedReport, ReportError, ReportRenderer, ReportRequest,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Classifier that always returns the same distribution.
struct StubClassifier {
    classes: Vec<DisorderClass>,
    features: Vec<String>,
    output: Vec<f64>,
}

impl StubClassifier {
    fn returning(output: [f64; 3]) -> Self {
        Self {
            classes: DisorderClass::all().to_vec(),
            features: vec!["Patient Age".to_string(), "Gender".to_string()],
            output: output.to_vec(),
        }
    }
}

impl Classifier for StubClassifier {
    fn classes(&self) -> &[DisorderClass] {
        &self.classes
    }

    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, ClassifierError> {
        Ok(self.output.clone())
    }
}

/// Renderer whose every render fails.
struct BrokenRenderer;

#[async_trait]
impl ReportRenderer for BrokenRenderer {
    async fn render(&self, _request: &ReportRequest) -> Result<RenderedReport, ReportError> {
        Err(ReportError::Io("disk full".to_string()))
    }

    async fn exists(&self, _path: &Path) -> bool {
        false
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, ReportError> {
        Err(ReportError::NotFound(filename.to_string()))
    }
}

fn predictor_returning(output: [f64; 3]) -> Arc<RuleAdjustedPredictor> {
    let handle = CachedModelHandle::preloaded(Arc::new(StubClassifier::returning(output)));
    Arc::new(RuleAdjustedPredictor::new(Arc::new(handle)))
}

fn session_with(
    predictor: Arc<RuleAdjustedPredictor>,
    renderer: Arc<dyn ReportRenderer>,
) -> IntakeSession {
    IntakeSession::new(SessionId::new(), predictor, renderer)
}

/// 1-based position of a catalog symptom, as typed by the user.
fn pick(symptom: &str) -> usize {
    SYMPTOM_CATALOG
        .iter()
        .position(|s| *s == symptom)
        .map(|i| i + 1)
        .unwrap_or_else(|| panic!("{} is not in the catalog", symptom))
}

/// Answers for the questions before the symptom menu.
const OPENING: [&str; 5] = ["Ada Lovelace", "36", "female", "yes", "none"];

/// Answers from the birth asphyxia question to the heart rate question.
fn closing(genes_mother_side: &str) -> Vec<&str> {
    vec![
        "no",
        "no",
        "no",
        "no",
        "31",
        "33",
        "0",
        "yes",
        genes_mother_side,
        "no",
        "no",
        "no",
        "4.5",
        "8",
        "normal",
        "45",
        "80",
    ]
}

/// Runs the whole questionnaire, stopping just before prediction.
async fn answer_everything(session: &mut IntakeSession, selection: &str, mother_side: &str) {
    for answer in OPENING {
        session.handle_input(answer).await.unwrap();
    }
    session.handle_input(selection).await.unwrap();
    for answer in closing(mother_side) {
        session.handle_input(answer).await.unwrap();
    }
}

// =============================================================================
// Conversation Flow
// =============================================================================

#[tokio::test]
async fn full_interview_hands_off_in_two_phases() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    let mut session = session_with(predictor_returning([0.2, 0.7, 0.1]), renderer);

    assert_eq!(
        session.handle_input("Ada Lovelace").await.unwrap(),
        ChatReply::text("How old are you?")
    );
    for answer in &OPENING[1..4] {
        assert!(matches!(
            session.handle_input(answer).await.unwrap(),
            ChatReply::Text(_)
        ));
    }

    match session.handle_input("none").await.unwrap() {
        ChatReply::Structured(StructuredReply::SymptomSelection { message, options }) => {
            assert_eq!(message, SYMPTOM_SELECTION_MESSAGE);
            assert_eq!(options.len(), SYMPTOM_CATALOG.len());
            assert_eq!(options[0], "Cough");
        }
        other => panic!("expected symptom selection, got {:?}", other),
    }

    let resumed = session.handle_input("1, 4").await.unwrap();
    assert!(resumed.message().contains("Birth asphyxia"));
    assert_eq!(session.state().step(), Step::Question(6));

    let answers = closing("no");
    let (last, rest) = answers.split_last().unwrap();
    for answer in rest {
        session.handle_input(answer).await.unwrap();
    }

    let waiting = session.handle_input(last).await.unwrap();
    assert_eq!(
        waiting,
        ChatReply::Structured(StructuredReply::WaitAndPredict {
            message: PROCESSING_MESSAGE.to_string(),
        })
    );
    assert_eq!(session.state().step(), Step::AwaitingFinalPrediction);
    assert!(!session.is_complete());

    let final_reply = session.handle_input("ok").await.unwrap();
    assert!(final_reply.is_final_result());
    assert!(final_reply.message().contains(
        "Predicted Genetic Disorder Category: Multifactorial genetic inheritance disorders (Confidence: 70.00%)"
    ));
    assert!(session.is_complete());

    let report = session.report_path().expect("report should be attached");
    assert!(report.starts_with(dir.path()));
    assert!(report.exists());
    match final_reply {
        ChatReply::Structured(StructuredReply::FinalResult { report_info, .. }) => {
            let info = report_info.expect("report info");
            assert!(info.filename.starts_with("geneaccess_report_"));
            assert_eq!(info.download_url, format!("/api/chat/report/{}", info.filename));
        }
        other => panic!("expected final result, got {:?}", other),
    }
}

#[tokio::test]
async fn finished_conversation_ignores_further_input() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    let mut session = session_with(predictor_returning([0.2, 0.7, 0.1]), renderer);

    answer_everything(&mut session, "1", "no").await;
    session.handle_input("go").await.unwrap();

    assert_eq!(
        session.handle_input("hello again").await.unwrap(),
        ChatReply::text(STEP_NOT_FOUND)
    );
    assert!(session.is_complete());
}

#[tokio::test]
async fn selection_keeps_valid_picks_in_order() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    let mut session = session_with(predictor_returning([0.2, 0.7, 0.1]), renderer);

    for answer in OPENING {
        session.handle_input(answer).await.unwrap();
    }
    session.handle_input("1, 3, 99").await.unwrap();

    assert_eq!(
        session.state().answers().selected_symptoms(),
        &[SYMPTOM_CATALOG[0].to_string(), SYMPTOM_CATALOG[2].to_string()]
    );
}

#[tokio::test]
async fn malformed_selection_asks_again() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    let mut session = session_with(predictor_returning([0.2, 0.7, 0.1]), renderer);

    for answer in OPENING {
        session.handle_input(answer).await.unwrap();
    }

    assert_eq!(
        session.handle_input("the first one").await.unwrap(),
        ChatReply::text(SYMPTOM_SELECTION_RETRY)
    );
    assert!(session.state().is_pending_symptom_selection());

    session.handle_input("2").await.unwrap();
    assert!(!session.state().is_pending_symptom_selection());
    assert_eq!(session.state().step(), Step::Question(6));
}

#[tokio::test]
async fn reset_starts_over_from_the_name_question() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    let mut session = session_with(predictor_returning([0.2, 0.7, 0.1]), renderer);
    let session_id = session.session_id();

    for answer in &OPENING[..3] {
        session.handle_input(answer).await.unwrap();
    }

    assert_eq!(session.reset(), WELCOME_PROMPT);
    assert_eq!(session.session_id(), session_id);
    assert_eq!(session.state().step(), Step::Question(0));
    assert!(session.state().answers().is_empty());
}

// =============================================================================
// Prediction Rules
// =============================================================================

#[tokio::test]
async fn maternal_lineage_with_mitochondrial_symptoms_forces_mitochondrial() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    // The classifier itself favours single-gene disorders.
    let mut session = session_with(predictor_returning([0.1, 0.1, 0.8]), renderer);

    let selection = format!(
        "{}, {}, {}",
        pick("Seizures"),
        pick("Tremors"),
        pick("Lactic acidosis")
    );
    answer_everything(&mut session, &selection, "yes").await;
    let reply = session.handle_input("continue").await.unwrap();

    assert!(reply.message().contains(
        "Mitochondrial genetic inheritance disorders (Confidence: 90.00%)"
    ));
    let prediction = session.state().final_prediction().unwrap();
    assert_eq!(
        prediction.label,
        PredictionLabel::Disorder(DisorderClass::Mitochondrial)
    );
    assert!((prediction.confidence - 0.90).abs() < 1e-9);
}

#[tokio::test]
async fn no_symptoms_reports_low_risk() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path()));
    let mut session = session_with(predictor_returning([0.1, 0.1, 0.8]), renderer);

    answer_everything(&mut session, "0", "no").await;
    let reply = session.handle_input("continue").await.unwrap();

    assert!(reply
        .message()
        .contains(&format!("{} (Confidence: 0.00%)", NO_DISORDER_LABEL)));
    let prediction = session.state().final_prediction().unwrap();
    assert_eq!(prediction.label, PredictionLabel::NoDisorder);
    assert_eq!(prediction.confidence, 0.0);
}

// =============================================================================
// Failure Handling
// =============================================================================

#[tokio::test]
async fn report_failure_still_delivers_the_prediction() {
    let mut session = session_with(predictor_returning([0.2, 0.7, 0.1]), Arc::new(BrokenRenderer));

    answer_everything(&mut session, "1", "no").await;
    let reply = session.handle_input("continue").await.unwrap();

    assert!(reply.is_final_result());
    assert!(reply.message().contains("Report not available."));
    assert!(session.is_complete());
    assert!(session.report_path().is_none());
}

#[tokio::test]
async fn missing_model_names_the_path_and_allows_retry() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("genetic_disorder_model.json");
    let handle = CachedModelHandle::new(&model_path);
    let predictor = Arc::new(RuleAdjustedPredictor::new(Arc::new(handle)));
    let renderer = Arc::new(HtmlReportRenderer::new(dir.path().join("exports")));
    let mut session = session_with(predictor, renderer);

    answer_everything(&mut session, "1", "no").await;

    let err = session.handle_input("continue").await.unwrap_err();
    assert!(matches!(
        err,
        IntakeError::Prediction(PredictionError::ModelLoad(_))
    ));
    assert!(err.to_string().contains("genetic_disorder_model.json"));
    assert_eq!(session.state().step(), Step::AwaitingFinalPrediction);

    std::fs::write(&model_path, MODEL_PACKAGE).unwrap();

    let reply = session.handle_input("continue").await.unwrap();
    assert!(reply.is_final_result());
    assert!(session.is_complete());
}

/// Minimal linear package: every weight zero except a female bias.
const MODEL_PACKAGE: &str = r#"{
    "model": {
        "intercepts": [0.0, 0.0, 0.0],
        "numeric": {
            "Patient Age": { "mean": 30.0, "scale": 10.0, "weights": [0.0, 0.0, 0.0] }
        },
        "categorical": {
            "Gender": { "Male": [0.0, 0.0, 2.0], "Female": [2.0, 0.0, 0.0] }
        }
    },
    "label_encoder": {
        "classes": [
            "Mitochondrial genetic inheritance disorders",
            "Multifactorial genetic inheritance disorders",
            "Single-gene inheritance diseases"
        ]
    },
    "feature_names": ["Patient Age", "Gender", "Disorder"]
}"#;
