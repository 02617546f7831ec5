use serde::Serialize;

use super::explanation::Explanation;
use crate::features::FeatureVector;

/// Binary outcome predicted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionOutcome {
    WillOccur,
    WillNotOccur,
}

impl RetentionOutcome {
    /// Interpret a model class label; any non-zero label is positive.
    pub fn from_label(label: u8) -> Self {
        if label == 0 {
            Self::WillNotOccur
        } else {
            Self::WillOccur
        }
    }

    /// Headline shown above the probability.
    pub fn status_text(self) -> &'static str {
        match self {
            Self::WillOccur => "Prediction: Urinary retention will occur",
            Self::WillNotOccur => "Prediction: Urinary retention will not occur",
        }
    }
}

/// Everything surfaced for one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    /// Class label returned by the model.
    pub label: u8,
    pub outcome: RetentionOutcome,
    /// Probability of retention, in `[0, 1]`.
    pub probability: f64,
    pub features: FeatureVector,
    pub explanation: Explanation,
}

impl PredictionReport {
    /// Headline for the predicted outcome.
    pub fn status_text(&self) -> &'static str {
        self.outcome.status_text()
    }

    /// Probability as a percentage with two decimals, e.g. `7.32%`.
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }

    /// Full probability line shown under the headline.
    pub fn probability_text(&self) -> String {
        format!("Predicted probability: {}", self.probability_percent())
    }
}
