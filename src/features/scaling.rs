//! Min-max scaling with the fixed bounds of the training cohort.

use serde::{Deserialize, Serialize};

/// Historical bounds used to rescale a continuous covariate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Value mapped to `0.0`.
    pub min: f64,
    /// Value mapped to `1.0`.
    pub max: f64,
}

/// Surgical duration bounds, in hours.
pub const SURGICAL_DURATION_HOURS: MinMax = MinMax { min: 1.0, max: 50.0 };

/// Intraoperative blood loss bounds, in millilitres.
pub const BLOOD_LOSS_ML: MinMax = MinMax {
    min: 1.0,
    max: 3000.0,
};

impl MinMax {
    /// Rescale `raw` linearly into the bounds.
    ///
    /// Values outside `[min, max]` are not clamped and land outside `[0, 1]`.
    pub fn scale(self, raw: f64) -> f64 {
        (raw - self.min) / (self.max - self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_scale_into_unit_interval() {
        for raw in [1.0, 1.5, 5.0, 25.0, 49.99, 50.0] {
            let scaled = SURGICAL_DURATION_HOURS.scale(raw);
            assert!((0.0..=1.0).contains(&scaled), "{raw} -> {scaled}");
        }
        for raw in [1.0, 200.0, 1500.0, 3000.0] {
            let scaled = BLOOD_LOSS_ML.scale(raw);
            assert!((0.0..=1.0).contains(&scaled), "{raw} -> {scaled}");
        }
        assert_eq!(SURGICAL_DURATION_HOURS.scale(1.0), 0.0);
        assert_eq!(BLOOD_LOSS_ML.scale(3000.0), 1.0);
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        assert!(SURGICAL_DURATION_HOURS.scale(0.0) < 0.0);
        assert!(SURGICAL_DURATION_HOURS.scale(60.0) > 1.0);
        assert!(BLOOD_LOSS_ML.scale(0.0) < 0.0);
        assert!(BLOOD_LOSS_ML.scale(4500.0) > 1.0);
        assert!((SURGICAL_DURATION_HOURS.scale(0.0) + 1.0 / 49.0).abs() < 1e-12);
    }

    #[test]
    fn defaults_scale_to_documented_values() {
        assert!((SURGICAL_DURATION_HOURS.scale(5.0) - 4.0 / 49.0).abs() < 1e-12);
        assert!((BLOOD_LOSS_ML.scale(200.0) - 199.0 / 2999.0).abs() < 1e-12);
    }
}
