//! Feature encoding for the retention model.
//!
//! A [`RawObservation`] holds the form values as entered. [`encode`] turns it
//! into the fixed-order [`FeatureVector`] the model was trained on:
//! continuous fields are min-max scaled with historical bounds and
//! categorical fields map to their integer codes.

mod scaling;
mod vocab;

pub use scaling::{BLOOD_LOSS_ML, MinMax, SURGICAL_DURATION_HOURS};
pub use vocab::{
    AgeBracket, AnesthesiaType, ProlapseStage, SurgicalModality, Vocabulary, YesNo, parse_field,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 8;

/// Column names in the order the model expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["Age", "IBL", "Menopause", "PA", "PQ", "SD", "SM", "TOA"];

/// Default surgical duration offered by the form, in hours.
pub const DEFAULT_SURGICAL_DURATION_HOURS: f64 = 5.0;
/// Default intraoperative blood loss offered by the form, in millilitres.
pub const DEFAULT_BLOOD_LOSS_ML: f64 = 200.0;

/// Errors raised while turning raw input into model features.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// A categorical label outside the field's vocabulary.
    #[error("Unknown {field} value \"{value}\"")]
    UnknownCategory {
        /// Column the label was given for.
        field: &'static str,
        /// Label as supplied.
        value: String,
    },
    /// A continuous value that is NaN or infinite.
    #[error("{field} must be a finite number (got {value})")]
    NonFinite {
        /// Column the value was given for.
        field: &'static str,
        /// Value as supplied.
        value: f64,
    },
}

/// One patient's covariates as entered in the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Age bracket (`Age`).
    pub age: AgeBracket,
    /// Menopausal status (`Menopause`).
    pub menopause: YesNo,
    /// Surgical approach (`SM`).
    pub surgical_modality: SurgicalModality,
    /// Surgical duration in hours.
    pub surgical_duration_hours: f64,
    /// Intraoperative blood loss in millilitres.
    pub blood_loss_ml: f64,
    /// Oral analgesics or analgesic pumps after surgery.
    pub postoperative_analgesia: YesNo,
    /// Type of anesthesia (`TOA`).
    pub anesthesia: AnesthesiaType,
    /// Pelvic organ prolapse quantification stage (`PQ`).
    pub prolapse_stage: ProlapseStage,
}

impl Default for RawObservation {
    fn default() -> Self {
        Self {
            age: AgeBracket::ALL[0],
            menopause: YesNo::ALL[0],
            surgical_modality: SurgicalModality::ALL[0],
            surgical_duration_hours: DEFAULT_SURGICAL_DURATION_HOURS,
            blood_loss_ml: DEFAULT_BLOOD_LOSS_ML,
            postoperative_analgesia: YesNo::ALL[0],
            anesthesia: AnesthesiaType::ALL[0],
            prolapse_stage: ProlapseStage::ALL[0],
        }
    }
}

/// Encoded model input, ordered as [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Wrap already-encoded values.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Values in [`FEATURE_NAMES`] order, as the model consumes them.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column, if the name is known.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| self.values[idx])
    }

    /// Iterate `(name, value)` pairs in model order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

/// Encode one observation into the model's feature row.
pub fn encode(observation: &RawObservation) -> Result<FeatureVector, EncodeError> {
    let duration = finite("SD", observation.surgical_duration_hours)?;
    let blood_loss = finite("IBL", observation.blood_loss_ml)?;
    let code = |value: u8| f64::from(value);
    Ok(FeatureVector {
        values: [
            code(observation.age.code()),
            BLOOD_LOSS_ML.scale(blood_loss),
            code(observation.menopause.code()),
            code(observation.postoperative_analgesia.code()),
            code(observation.prolapse_stage.code()),
            SURGICAL_DURATION_HOURS.scale(duration),
            code(observation.surgical_modality.code()),
            code(observation.anesthesia.code()),
        ],
    })
}

fn finite(field: &'static str, value: f64) -> Result<f64, EncodeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EncodeError::NonFinite { field, value })
    }
}
