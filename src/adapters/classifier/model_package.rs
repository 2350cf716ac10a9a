//! JSON model package and the linear softmax classifier it describes.
//!
//! Package layout:
//!
//! ```json
//! {
//!   "model": {
//!     "intercepts": [b0, b1, b2],
//!     "numeric": { "Patient Age": { "mean": 30.0, "scale": 12.0, "weights": [w0, w1, w2] } },
//!     "categorical": { "Gender": { "Male": [w0, w1, w2], "Female": [w0, w1, w2] } }
//!   },
//!   "label_encoder": { "classes": ["Mitochondrial genetic inheritance disorders", "..."] },
//!   "feature_names": ["Patient Age", "Gender", "..."]
//! }
//! ```
//!
//! Numeric features are standardized with `(x - mean) / scale`. Categories
//! the model has no weights for contribute nothing.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::prediction::{DisorderClass, FeatureRow, TARGET_COLUMN};
use crate::ports::{Classifier, ClassifierError, ModelLoadError};

/// Top-level keys every package must carry.
pub const REQUIRED_KEYS: [&str; 3] = ["model", "label_encoder", "feature_names"];

#[derive(Debug, Clone, Deserialize)]
struct LinearSoftmaxWeights {
    intercepts: Vec<f64>,
    #[serde(default)]
    numeric: BTreeMap<String, NumericTerm>,
    #[serde(default)]
    categorical: BTreeMap<String, BTreeMap<String, Vec<f64>>>,
}

#[derive(Debug, Clone, Deserialize)]
struct NumericTerm {
    mean: f64,
    scale: f64,
    weights: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelEncoderSection {
    classes: Vec<String>,
}

/// A loaded, validated model package.
#[derive(Debug, Clone)]
pub struct ModelPackage {
    classes: Vec<DisorderClass>,
    feature_names: Vec<String>,
    model: LinearSoftmaxWeights,
}

impl ModelPackage {
    /// Reads and validates the package at `path`.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ModelLoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ModelLoadError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        Self::from_json(path, &raw)
    }

    /// Parses a package from its JSON text. `path` is only used in errors.
    pub fn from_json(path: &Path, raw: &str) -> Result<Self, ModelLoadError> {
        let malformed = |reason: String| ModelLoadError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let document: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
        let Value::Object(mut top) = document else {
            return Err(malformed("top level is not an object".to_string()));
        };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|k| !top.contains_key(**k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ModelLoadError::MissingKeys {
                path: path.to_path_buf(),
                missing,
            });
        }

        let mut take = |key: &str| top.remove(key).unwrap_or(Value::Null);
        let model: LinearSoftmaxWeights = serde_json::from_value(take("model"))
            .map_err(|e| malformed(format!("model: {}", e)))?;
        let encoder: LabelEncoderSection = serde_json::from_value(take("label_encoder"))
            .map_err(|e| malformed(format!("label_encoder: {}", e)))?;
        let declared: Vec<String> = serde_json::from_value(take("feature_names"))
            .map_err(|e| malformed(format!("feature_names: {}", e)))?;

        let classes = parse_classes(path, &encoder.classes)?;
        validate_model(&model, classes.len()).map_err(malformed)?;

        let feature_names = declared
            .into_iter()
            .filter(|name| name != TARGET_COLUMN)
            .collect();

        Ok(Self {
            classes,
            feature_names,
            model,
        })
    }
}

fn parse_classes(path: &Path, labels: &[String]) -> Result<Vec<DisorderClass>, ModelLoadError> {
    let invalid = |reason: String| ModelLoadError::InvalidClasses {
        path: path.to_path_buf(),
        reason,
    };

    let mut classes = Vec::with_capacity(labels.len());
    for label in labels {
        let class: DisorderClass = label
            .parse()
            .map_err(|_| invalid(format!("unknown class '{}'", label)))?;
        if classes.contains(&class) {
            return Err(invalid(format!("duplicate class '{}'", label)));
        }
        classes.push(class);
    }

    if classes.len() != DisorderClass::all().len() {
        return Err(invalid(format!(
            "expected {} classes, found {}",
            DisorderClass::all().len(),
            classes.len()
        )));
    }
    Ok(classes)
}

fn validate_model(model: &LinearSoftmaxWeights, n_classes: usize) -> Result<(), String> {
    if model.intercepts.len() != n_classes {
        return Err(format!(
            "intercepts has {} entries, expected {}",
            model.intercepts.len(),
            n_classes
        ));
    }
    for (name, term) in &model.numeric {
        if term.weights.len() != n_classes {
            return Err(format!("numeric '{}' has {} weights", name, term.weights.len()));
        }
        if !term.scale.is_finite() || term.scale == 0.0 {
            return Err(format!("numeric '{}' has unusable scale {}", name, term.scale));
        }
    }
    for (name, categories) in &model.categorical {
        for (category, weights) in categories {
            if weights.len() != n_classes {
                return Err(format!(
                    "categorical '{}' = '{}' has {} weights",
                    name,
                    category,
                    weights.len()
                ));
            }
        }
    }
    Ok(())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

impl Classifier for ModelPackage {
    fn classes(&self) -> &[DisorderClass] {
        &self.classes
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ClassifierError> {
        let mut logits = self.model.intercepts.clone();

        for (name, term) in &self.model.numeric {
            let x = match row.get(name) {
                None => term.mean,
                Some(value) => value.as_number().ok_or_else(|| ClassifierError::FeatureType {
                    feature: name.clone(),
                    expected: "numeric",
                })?,
            };
            let z = (x - term.mean) / term.scale;
            for (logit, w) in logits.iter_mut().zip(&term.weights) {
                *logit += w * z;
            }
        }

        for (name, categories) in &self.model.categorical {
            let Some(weights) = row.category(name).and_then(|c| categories.get(c)) else {
                continue;
            };
            for (logit, w) in logits.iter_mut().zip(weights) {
                *logit += w;
            }
        }

        if logits.iter().any(|z| !z.is_finite()) {
            return Err(ClassifierError::InvalidOutput("non-finite logit".to_string()));
        }
        Ok(softmax(&logits))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::intake::IntakeAnswers;
    use crate::domain::prediction::FeatureAssembler;
    use serde_json::json;
    use std::io::Write;

    pub(crate) fn sample_package() -> Value {
        json!({
            "model": {
                "intercepts": [0.0, 0.0, 0.0],
                "numeric": {
                    "Patient Age": { "mean": 30.0, "scale": 10.0, "weights": [0.0, 1.0, 0.0] }
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
        })
    }

    fn parse(value: &Value) -> Result<ModelPackage, ModelLoadError> {
        ModelPackage::from_json(Path::new("model.json"), &value.to_string())
    }

    #[test]
    fn loads_valid_package_and_drops_target_column() {
        let package = parse(&sample_package()).unwrap();
        assert_eq!(package.classes(), DisorderClass::all());
        assert_eq!(package.feature_names(), &["Patient Age".to_string(), "Gender".to_string()]);
    }

    #[test]
    fn missing_keys_are_all_reported() {
        let mut value = sample_package();
        let obj = value.as_object_mut().unwrap();
        obj.remove("label_encoder");
        obj.remove("feature_names");

        match parse(&value) {
            Err(ModelLoadError::MissingKeys { missing, .. }) => {
                assert_eq!(missing, vec!["label_encoder".to_string(), "feature_names".to_string()]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn wrong_class_labels_are_rejected() {
        let mut value = sample_package();
        value["label_encoder"]["classes"][2] = json!("Single-gene inheritance disease");
        assert!(matches!(parse(&value), Err(ModelLoadError::InvalidClasses { .. })));

        let mut value = sample_package();
        value["label_encoder"]["classes"] = json!(["Mitochondrial genetic inheritance disorders"]);
        assert!(matches!(parse(&value), Err(ModelLoadError::InvalidClasses { .. })));
    }

    #[test]
    fn weight_shape_mismatch_is_malformed() {
        let mut value = sample_package();
        value["model"]["intercepts"] = json!([0.0, 0.0]);
        assert!(matches!(parse(&value), Err(ModelLoadError::Malformed { .. })));
    }

    #[test]
    fn not_json_is_malformed() {
        let err = ModelPackage::from_json(Path::new("m.json"), "not json").unwrap_err();
        assert!(matches!(err, ModelLoadError::Malformed { .. }));
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match ModelPackage::load(&path) {
            Err(ModelLoadError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", sample_package()).unwrap();
        let package = ModelPackage::load(file.path()).unwrap();
        assert_eq!(package.classes().len(), 3);
    }

    #[test]
    fn predict_proba_is_a_distribution() {
        let package = parse(&sample_package()).unwrap();
        let mut answers = IntakeAnswers::new();
        answers.capture(crate::domain::intake::FieldKey::Gender, "male");
        let row = FeatureAssembler::assemble(&answers);

        let probs = package.predict_proba(&row).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs[2] > probs[0]);
    }

    #[test]
    fn unknown_category_contributes_nothing() {
        let package = parse(&sample_package()).unwrap();
        let mut row = FeatureRow::new();
        row.insert("Patient Age", 30.0);
        row.insert("Gender", "Ambiguous");

        let probs = package.predict_proba(&row).unwrap();
        for p in probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn category_in_numeric_slot_is_an_error() {
        let package = parse(&sample_package()).unwrap();
        let mut row = FeatureRow::new();
        row.insert("Patient Age", "thirty");
        assert!(matches!(
            package.predict_proba(&row),
            Err(ClassifierError::FeatureType { .. })
        ));
    }
}
