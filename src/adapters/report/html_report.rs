//! HTML Report Renderer - Implementation of ReportRenderer.
//!
//! Writes a self-contained HTML risk report into an exports directory.
//!
//! # Directory Structure
//!
//! ```text
//! {exports_dir}/
//! ├── geneaccess_report_20250101_093000_1a2b3c4d.html
//! └── geneaccess_report_20250101_101512_9f8e7d6c.html
//! ```
//!
//! Writes go to a `.tmp` sibling first and are renamed into place, so a
//! reader never sees a half-written report.

use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::domain::intake::FieldKey;
use crate::domain::symptoms::SYMPTOM_CATALOG;
use crate::ports::{
    validate_report_filename, RenderedReport, ReportError, ReportRenderer, ReportRequest,
};

const FALLBACK_EXPLANATION: &str = "No explanation available.";
const FALLBACK_RECOMMENDATION: &str = "No specific recommendations available.";
const GENERATOR_NAME: &str = "GeneAccessAI v1.0";

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 30px; font-size: 16px; line-height: 1.4; background-color: #f7f7f7; color: #333; }
h1 { color: #667eea; font-size: 24px; text-align: center; margin-bottom: 6px; }
.disclaimer { text-align: center; font-size: 13px; color: #555; margin-bottom: 15px; }
h2 { color: #667eea; font-size: 18px; margin: 6px 0; }
p, td, th { font-size: 15px; margin: 4px 0; }
table { width: 100%; border-collapse: collapse; margin: 10px 0; }
table, th, td { border: 1px solid #ccc; }
th, td { padding: 6px 10px; text-align: left; }
th { background-color: #a4b0e8; }
.section { background-color: #fff; padding: 14px; margin-bottom: 14px; border-radius: 6px; box-shadow: 0 0 4px rgba(0,0,0,0.05); }
ul { padding-left: 18px; margin: 4px 0; }
ul li { margin-bottom: 2px; }
"#;

#[derive(Debug, Clone)]
pub struct HtmlReportRenderer {
    exports_dir: PathBuf,
}

impl HtmlReportRenderer {
    pub fn new(exports_dir: impl Into<PathBuf>) -> Self {
        Self {
            exports_dir: exports_dir.into(),
        }
    }

    pub fn exports_dir(&self) -> &Path {
        &self.exports_dir
    }

    /// `geneaccess_report_<YYYYmmdd_HHMMSS>_<short id>.html`
    pub fn filename_for(request: &ReportRequest) -> String {
        format!(
            "geneaccess_report_{}_{}.html",
            request.generated_at.format("%Y%m%d_%H%M%S"),
            request.report_id.short()
        )
    }
}

#[async_trait]
impl ReportRenderer for HtmlReportRenderer {
    async fn render(&self, request: &ReportRequest) -> Result<RenderedReport, ReportError> {
        let html = render_html(request);
        let filename = Self::filename_for(request);
        let path = self.exports_dir.join(&filename);
        let temp = self.exports_dir.join(format!("{}.tmp", filename));

        fs::create_dir_all(&self.exports_dir).await.map_err(|e| {
            ReportError::Io(format!(
                "Failed to create exports directory {}: {}",
                self.exports_dir.display(),
                e
            ))
        })?;

        let mut file = fs::File::create(&temp)
            .await
            .map_err(|e| ReportError::Io(e.to_string()))?;
        file.write_all(html.as_bytes())
            .await
            .map_err(|e| ReportError::Io(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| ReportError::Io(e.to_string()))?;
        drop(file);

        fs::rename(&temp, &path)
            .await
            .map_err(|e| ReportError::Io(e.to_string()))?;

        info!(
            report_id = %request.report_id,
            path = %path.display(),
            "Report written"
        );
        Ok(RenderedReport { path, filename })
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, ReportError> {
        validate_report_filename(filename)?;
        let path = self.exports_dir.join(filename);
        fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReportError::NotFound(filename.to_string()),
            _ => ReportError::Io(e.to_string()),
        })
    }
}

/// Escapes text for inclusion in HTML element content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the full report document.
pub fn render_html(request: &ReportRequest) -> String {
    let answers = &request.answers;
    let prediction = &request.prediction;
    let field = |keys: &[&str]| -> String {
        keys.iter()
            .find_map(|k| answers.lookup(k))
            .map(|v| escape_html(&v.as_text()))
            .unwrap_or_default()
    };

    let name = field(&["name"]);
    let age = field(&["age", FieldKey::PatientAge.canonical_name()]);
    let sex = field(&["sex", FieldKey::Gender.canonical_name()]);
    let family = field(&["family_history", FieldKey::FamilyHistory.canonical_name()]);

    let picked: Vec<&str> = SYMPTOM_CATALOG
        .iter()
        .copied()
        .filter(|s| answers.has_symptom(s))
        .collect();
    let symptoms = if picked.is_empty() {
        "None".to_string()
    } else {
        escape_html(&picked.join(", "))
    };

    let mut probability_rows = String::new();
    for (class, p) in prediction.distribution.iter() {
        let _ = writeln!(
            probability_rows,
            "<tr><td>{}</td><td>{:.2}%</td></tr>",
            class,
            p * 100.0
        );
    }

    let (explanation, recommendations) = match prediction.label.disorder() {
        Some(class) => (class.explanation(), class.recommendations()),
        None => (FALLBACK_EXPLANATION, &[FALLBACK_RECOMMENDATION][..]),
    };
    let recommendation_items: String = recommendations
        .iter()
        .map(|r| format!("<li>{}</li>", r))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>GeneAccessAI - Genetic Risk Report</title>
<style>{style}</style>
</head>
<body>

<h1>GeneAccessAI - Genetic Risk Report</h1>
<p class="disclaimer">
This report is generated for educational purposes only and <strong>does not constitute a medical diagnosis</strong>.
Clinical consultation is strongly recommended.
</p>

<div class="section">
<h2>1. Patient Details</h2>
<table>
<tr><th>Field</th><th>Information</th></tr>
<tr><td>Name</td><td>{name}</td></tr>
<tr><td>Age</td><td>{age}</td></tr>
<tr><td>Sex</td><td>{sex}</td></tr>
<tr><td>Family History</td><td>{family}</td></tr>
<tr><td>Symptoms</td><td>{symptoms}</td></tr>
</table>
</div>

<div class="section">
<h2>2. Report Summary</h2>
<p><strong>Prediction:</strong> {label}</p>
<p><strong>Confidence Level:</strong> {confidence:.2}%</p>
<p><strong>Explanation</strong></p>
<p>{explanation}</p>
</div>

<div class="section">
<h2>3. Prediction Probabilities</h2>
<table>
<tr><th>Disorder Type</th><th>Probability</th></tr>
{probability_rows}</table>
</div>

<div class="section">
<h2>4. Recommendations</h2>
<ul>{recommendation_items}</ul>
</div>

<div class="section">
<h2>5. Report Metadata</h2>
<table>
<tr><th>Field</th><th>Information</th></tr>
<tr><td>Report Generated On</td><td>{date}</td></tr>
<tr><td>Generated By</td><td>{generator}</td></tr>
</table>
</div>

</body>
</html>
"#,
        style = STYLE,
        label = prediction.label,
        confidence = prediction.confidence_percent(),
        date = request.generated_at.format("%d %B %Y"),
        generator = GENERATOR_NAME,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::IntakeAnswers;
    use crate::domain::prediction::{ClassDistribution, DisorderClass, PredictionResult};
    use tempfile::TempDir;

    fn request() -> ReportRequest {
        let mut answers = IntakeAnswers::new();
        answers.capture(FieldKey::Name, "Ada <Lovelace>");
        answers.capture(FieldKey::PatientAge, "36");
        answers.capture(FieldKey::Gender, "female");
        answers.capture(FieldKey::FamilyHistory, "yes");
        answers.select_symptoms(vec!["Seizures".into(), "Cough".into()]);
        let prediction =
            PredictionResult::finalize(ClassDistribution::forced(DisorderClass::Mitochondrial));
        ReportRequest::new(answers, prediction)
    }

    #[test]
    fn html_contains_patient_prediction_and_guidance() {
        let html = render_html(&request());

        assert!(html.contains("<td>Age</td><td>36</td>"));
        assert!(html.contains("<td>Sex</td><td>Female</td>"));
        assert!(html.contains("<td>Family History</td><td>Yes</td>"));
        assert!(html.contains("<td>Symptoms</td><td>Cough, Seizures</td>"));
        assert!(html.contains("Mitochondrial genetic inheritance disorders"));
        assert!(html.contains("<strong>Confidence Level:</strong> 90.00%"));
        assert!(html.contains("<tr><td>Single-gene inheritance diseases</td><td>5.00%</td></tr>"));
        assert!(html.contains("Consult a genetic counselor for family risk assessment."));
        assert!(html.contains("GeneAccessAI v1.0"));
    }

    #[test]
    fn html_escapes_user_text() {
        let html = render_html(&request());
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(!html.contains("<Lovelace>"));
    }

    #[test]
    fn no_disorder_uses_generic_guidance() {
        let mut req = request();
        req.prediction = PredictionResult::no_signal(ClassDistribution::uniform());
        let html = render_html(&req);
        assert!(html.contains("No Disorder / Low Risk"));
        assert!(html.contains(FALLBACK_EXPLANATION));
        assert!(html.contains(FALLBACK_RECOMMENDATION));
        assert!(html.contains("<strong>Confidence Level:</strong> 0.00%"));
    }

    #[test]
    fn filename_has_prefix_timestamp_and_id() {
        let req = request();
        let name = HtmlReportRenderer::filename_for(&req);
        assert!(name.starts_with("geneaccess_report_"));
        assert!(name.ends_with(&format!("_{}.html", req.report_id.short())));
        assert!(validate_report_filename(&name).is_ok());
    }

    #[tokio::test]
    async fn render_writes_file_and_read_returns_it() {
        let dir = TempDir::new().unwrap();
        let renderer = HtmlReportRenderer::new(dir.path().join("exports"));

        let rendered = renderer.render(&request()).await.unwrap();
        assert!(renderer.exists(&rendered.path).await);
        assert!(!dir
            .path()
            .join("exports")
            .join(format!("{}.tmp", rendered.filename))
            .exists());

        let bytes = renderer.read(&rendered.filename).await.unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("Genetic Risk Report"));
    }

    #[tokio::test]
    async fn read_rejects_unknown_and_unsafe_names() {
        let dir = TempDir::new().unwrap();
        let renderer = HtmlReportRenderer::new(dir.path());

        assert!(matches!(
            renderer.read("geneaccess_report_missing.html").await,
            Err(ReportError::NotFound(_))
        ));
        assert!(matches!(
            renderer.read("../state.yaml").await,
            Err(ReportError::InvalidFileName(_))
        ));
    }

    #[tokio::test]
    async fn exists_is_false_for_missing_path() {
        let dir = TempDir::new().unwrap();
        let renderer = HtmlReportRenderer::new(dir.path());
        assert!(!renderer.exists(&dir.path().join("nope.html")).await);
    }
}
