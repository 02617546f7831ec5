//! Encode → predict → explain for one form submission.
//!
//! The model is loaded fresh through a [`ModelLoader`] on every request and
//! never cached. [`Classifier`] and [`Explainer`] are the seams between the
//! form and the model, so tests can substitute a stub with known outputs.

mod explanation;
mod report;

pub use explanation::{Contribution, Explanation};
pub use report::{PredictionReport, RetentionOutcome};

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::features::{EncodeError, FEATURE_NAMES, FeatureVector, RawObservation, encode};
use crate::ml::ModelError;
use crate::ml::tree_ensemble::TreeEnsembleModel;
use crate::ml::tree_shap::ensemble_shap;

/// Errors that abort a prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The model was trained on different columns than the form produces.
    #[error("Model expects features {expected:?} but the form provides {found:?}")]
    SchemaMismatch {
        /// Columns declared by the model.
        expected: Vec<String>,
        /// Columns produced by the encoder.
        found: Vec<String>,
    },
    /// The model produced a probability outside `[0, 1]`.
    #[error("Model returned invalid probability {0}")]
    InvalidProbability(f64),
}

/// Binary classifier over encoded feature rows.
pub trait Classifier {
    /// Column names the model was trained with, in order.
    fn feature_names(&self) -> &[String];

    /// Class label for a row: `1` when retention is predicted.
    fn predict(&self, row: &FeatureVector) -> u8;

    /// Probability of the positive class for a row.
    fn predict_proba(&self, row: &FeatureVector) -> f64;
}

/// Per-feature attribution of a classifier's output.
pub trait Explainer {
    fn explain(&self, row: &FeatureVector) -> Explanation;
}

/// Source of a freshly loaded model for each request.
pub trait ModelLoader {
    type Model: Classifier + Explainer;

    fn load(&self) -> Result<Self::Model, ModelError>;

    /// Human-readable description of where models come from.
    fn source_label(&self) -> String {
        "an in-memory model".to_string()
    }
}

/// Loads a [`TreeEnsembleModel`] from a JSON artifact on disk.
#[derive(Debug, Clone)]
pub struct JsonModelLoader {
    path: PathBuf,
}

impl JsonModelLoader {
    /// Loader reading the artifact at `path` on every request.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelLoader for JsonModelLoader {
    type Model = TreeEnsembleModel;

    fn load(&self) -> Result<Self::Model, ModelError> {
        debug!("Loading model from {}", self.path.display());
        TreeEnsembleModel::load_json(&self.path)
    }

    fn source_label(&self) -> String {
        self.path.display().to_string()
    }
}

impl Classifier for TreeEnsembleModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &FeatureVector) -> u8 {
        self.predict_label(row.as_slice())
    }

    fn predict_proba(&self, row: &FeatureVector) -> f64 {
        TreeEnsembleModel::predict_proba(self, row.as_slice())
    }
}

impl Explainer for TreeEnsembleModel {
    fn explain(&self, row: &FeatureVector) -> Explanation {
        let shap = ensemble_shap(self, row.as_slice());
        let contributions = self
            .feature_names
            .iter()
            .zip(row.as_slice())
            .zip(shap.values)
            .map(|((feature, feature_value), value)| Contribution {
                feature: feature.clone(),
                feature_value: *feature_value,
                value,
            })
            .collect();
        Explanation {
            base_value: shap.base_value,
            output_space: self.output_space(),
            contributions,
        }
    }
}

/// Fail unless the model's columns are exactly the encoder's columns.
pub fn check_schema(model_features: &[String]) -> Result<(), PredictError> {
    let matches = model_features.len() == FEATURE_NAMES.len()
        && model_features
            .iter()
            .zip(FEATURE_NAMES)
            .all(|(model, ours)| model == ours);
    if matches {
        Ok(())
    } else {
        Err(PredictError::SchemaMismatch {
            expected: model_features.to_vec(),
            found: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        })
    }
}

/// Run one full prediction for a form submission.
pub fn predict_observation<L: ModelLoader>(
    loader: &L,
    observation: &RawObservation,
) -> Result<PredictionReport, PredictError> {
    let model = loader.load()?;
    check_schema(model.feature_names())?;
    let features = encode(observation)?;
    debug!(?features, "Encoded observation");

    let label = model.predict(&features);
    let probability = model.predict_proba(&features);
    if !(0.0..=1.0).contains(&probability) {
        return Err(PredictError::InvalidProbability(probability));
    }
    let explanation = model.explain(&features);
    let outcome = RetentionOutcome::from_label(label);
    info!(label, probability, "Prediction complete");
    Ok(PredictionReport {
        label,
        outcome,
        probability,
        features,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{AgeBracket, AnesthesiaType, ProlapseStage, SurgicalModality, YesNo};
    use crate::ml::tree_ensemble::{Aggregation, MODEL_FORMAT_VERSION, Tree, TreeNode};

    fn leaf(value: f64, cover: f64) -> TreeNode {
        TreeNode::Leaf { value, cover }
    }

    fn split(feature: usize, threshold: f64, children: (usize, usize), cover: f64) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left: children.0,
            right: children.1,
            cover,
        }
    }

    fn retention_model() -> TreeEnsembleModel {
        TreeEnsembleModel {
            model_version: MODEL_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            aggregation: Aggregation::BoostedLogit { base_margin: -1.0 },
            decision_threshold: 0.5,
            trees: vec![
                Tree {
                    nodes: vec![
                        split(0, 0.5, (1, 2), 100.0),
                        leaf(-0.4, 55.0),
                        leaf(0.9, 45.0),
                    ],
                },
                Tree {
                    nodes: vec![
                        split(5, 0.2, (1, 2), 100.0),
                        split(4, 1.5, (3, 4), 70.0),
                        leaf(1.2, 30.0),
                        leaf(-0.3, 50.0),
                        leaf(0.6, 20.0),
                    ],
                },
            ],
        }
    }

    struct FixedLoader(TreeEnsembleModel);

    impl ModelLoader for FixedLoader {
        type Model = TreeEnsembleModel;

        fn load(&self) -> Result<Self::Model, ModelError> {
            Ok(self.0.clone())
        }
    }

    fn older_patient() -> RawObservation {
        RawObservation {
            age: AgeBracket::FiftyPlus,
            menopause: YesNo::Yes,
            surgical_modality: SurgicalModality::Laparotomy,
            surgical_duration_hours: 14.0,
            blood_loss_ml: 800.0,
            postoperative_analgesia: YesNo::Yes,
            anesthesia: AnesthesiaType::General,
            prolapse_stage: ProlapseStage::Stage2,
        }
    }

    #[test]
    fn tree_model_prediction_is_explained_additively() {
        let loader = FixedLoader(retention_model());
        let report = predict_observation(&loader, &older_patient()).unwrap();
        let model = retention_model();
        let raw = model.predict_raw(report.features.as_slice());
        assert!((report.explanation.output_value() - raw).abs() < 1e-9);
        assert_eq!(report.explanation.contributions.len(), FEATURE_NAMES.len());
        assert_eq!(report.explanation.contributions[5].feature, "SD");
        assert_eq!(report.outcome, RetentionOutcome::WillOccur);
        assert!(report.probability > 0.5);
    }

    #[test]
    fn prediction_is_deterministic() {
        let loader = FixedLoader(retention_model());
        let first = predict_observation(&loader, &older_patient()).unwrap();
        let second = predict_observation(&loader, &older_patient()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reordered_model_columns_are_rejected() {
        let mut model = retention_model();
        model.feature_names.swap(0, 1);
        let err = predict_observation(&FixedLoader(model), &older_patient()).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("IBL"));
    }

    #[test]
    fn missing_artifact_fails_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let loader = JsonModelLoader::new(dir.path().join("model.json"));
        let err = predict_observation(&loader, &older_patient()).unwrap_err();
        assert!(matches!(err, PredictError::Model(ModelError::Read { .. })));
    }

    #[test]
    fn json_loader_reads_the_artifact_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let loader = JsonModelLoader::new(&path);
        std::fs::write(&path, serde_json::to_vec(&retention_model()).unwrap()).unwrap();
        let first = predict_observation(&loader, &older_patient()).unwrap();

        let mut lowered = retention_model();
        lowered.aggregation = Aggregation::BoostedLogit { base_margin: -9.0 };
        std::fs::write(&path, serde_json::to_vec(&lowered).unwrap()).unwrap();
        let second = predict_observation(&loader, &older_patient()).unwrap();
        assert!(second.probability < first.probability);
        assert_eq!(second.outcome, RetentionOutcome::WillNotOccur);
    }
}
