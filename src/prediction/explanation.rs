//! Per-feature attribution of a single prediction.

use serde::Serialize;

use crate::ml::tree_ensemble::OutputSpace;

/// Signed contribution of one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    /// Model column name.
    pub feature: String,
    /// Encoded value the model saw.
    pub feature_value: f64,
    /// Shift of the model output caused by this feature.
    pub value: f64,
}

/// Baseline plus signed contributions that add up to the model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Expected model output before any feature is known.
    pub base_value: f64,
    /// Units of `base_value`, `output_value` and each contribution.
    pub output_space: OutputSpace,
    pub contributions: Vec<Contribution>,
}

impl Explanation {
    /// Model output reconstructed from the attribution.
    pub fn output_value(&self) -> f64 {
        self.base_value + self.contributions.iter().map(|c| c.value).sum::<f64>()
    }

    /// Contributions ordered by decreasing magnitude.
    pub fn by_magnitude(&self) -> Vec<&Contribution> {
        let mut sorted: Vec<&Contribution> = self.contributions.iter().collect();
        sorted.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        sorted
    }

    /// Contributions that raise the output, largest first.
    pub fn raising(&self) -> Vec<&Contribution> {
        self.by_magnitude()
            .into_iter()
            .filter(|c| c.value > 0.0)
            .collect()
    }

    /// Contributions that lower the output, largest magnitude first.
    pub fn lowering(&self) -> Vec<&Contribution> {
        self.by_magnitude()
            .into_iter()
            .filter(|c| c.value < 0.0)
            .collect()
    }
}

impl OutputSpace {
    /// Axis caption used when plotting values in this space.
    pub fn caption(self) -> &'static str {
        match self {
            OutputSpace::LogOdds => "f(x), log-odds",
            OutputSpace::Probability => "f(x), probability",
        }
    }
}
