use serde::{Deserialize, Serialize};
use std::path::Path;

use super::tree::Tree;
use crate::ml::ModelError;

/// Artifact format understood by this loader.
pub const MODEL_FORMAT_VERSION: i64 = 1;

fn default_decision_threshold() -> f64 {
    0.5
}

/// How per-tree outputs combine into the model output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum of leaf values plus `base_margin`, in log-odds.
    BoostedLogit { base_margin: f64 },
    /// Mean of leaf values, each a positive-class probability.
    ForestMean,
}

/// Space in which raw model output and attributions are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSpace {
    LogOdds,
    Probability,
}

/// Versioned tree ensemble for binary classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    /// Artifact format version.
    pub model_version: i64,
    /// Column names in the order rows must be supplied.
    pub feature_names: Vec<String>,
    pub aggregation: Aggregation,
    /// Positive class is predicted when its probability exceeds this value.
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.model_version != MODEL_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: self.model_version,
                expected: MODEL_FORMAT_VERSION,
            });
        }
        if self.feature_names.is_empty() {
            return Err(ModelError::Invalid("feature_names is empty".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("model has no trees".to_string()));
        }
        if !(self.decision_threshold > 0.0 && self.decision_threshold < 1.0) {
            return Err(ModelError::Invalid(format!(
                "decision_threshold {} must lie strictly between 0 and 1",
                self.decision_threshold
            )));
        }
        if let Aggregation::BoostedLogit { base_margin } = self.aggregation
            && !base_margin.is_finite()
        {
            return Err(ModelError::Invalid("base_margin must be finite".to_string()));
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_names.len())
                .map_err(|err| ModelError::Invalid(format!("tree {tree_idx}: {err}")))?;
        }
        Ok(())
    }

    /// Load and validate a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Units of [`Self::predict_raw`] and of the attributions.
    pub fn output_space(&self) -> OutputSpace {
        match self.aggregation {
            Aggregation::BoostedLogit { .. } => OutputSpace::LogOdds,
            Aggregation::ForestMean => OutputSpace::Probability,
        }
    }

    /// Combine per-tree values into the raw output.
    pub(crate) fn aggregate(&self, tree_sum: f64) -> f64 {
        match self.aggregation {
            Aggregation::BoostedLogit { base_margin } => base_margin + tree_sum,
            Aggregation::ForestMean => tree_sum / self.trees.len() as f64,
        }
    }

    /// Weight applied to a single tree's contribution.
    pub(crate) fn tree_weight(&self) -> f64 {
        match self.aggregation {
            Aggregation::BoostedLogit { .. } => 1.0,
            Aggregation::ForestMean => 1.0 / self.trees.len() as f64,
        }
    }

    /// Raw output in [`OutputSpace`] units.
    pub fn predict_raw(&self, features: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        self.aggregate(sum)
    }

    /// Expected raw output over the training distribution.
    pub fn expected_raw(&self) -> f64 {
        let sum: f64 = self.trees.iter().map(Tree::expected_value).sum();
        self.aggregate(sum)
    }

    /// Map a raw output into a probability.
    pub fn raw_to_probability(&self, raw: f64) -> f64 {
        match self.output_space() {
            OutputSpace::LogOdds => logistic(raw),
            OutputSpace::Probability => raw.clamp(0.0, 1.0),
        }
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        self.raw_to_probability(self.predict_raw(features))
    }

    /// Predicted class: `1` for positive, `0` otherwise.
    pub fn predict_label(&self, features: &[f64]) -> u8 {
        u8::from(self.predict_proba(features) > self.decision_threshold)
    }
}

/// Numerically stable logistic function.
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
