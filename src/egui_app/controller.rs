//! Bridges the form widgets to the prediction pipeline.

use tracing::{info, warn};

use crate::egui_app::state::{ResultState, StatusBarState, StatusTone};
use crate::features::RawObservation;
use crate::prediction::{JsonModelLoader, ModelLoader, predict_observation};

/// Holds the ephemeral form values and the result shown for them.
pub struct PredictionController<L: ModelLoader = JsonModelLoader> {
    loader: L,
    form: RawObservation,
    result: ResultState,
    pub status: StatusBarState,
}

impl<L: ModelLoader> PredictionController<L> {
    /// Start with the default form and no result.
    pub fn new(loader: L) -> Self {
        let status = StatusBarState::idle(&loader.source_label());
        Self {
            loader,
            form: RawObservation::default(),
            result: ResultState::Empty,
            status,
        }
    }

    /// Current form values.
    pub fn form(&self) -> RawObservation {
        self.form
    }

    /// Outcome of the last prediction for the current form.
    pub fn result(&self) -> &ResultState {
        &self.result
    }

    /// Replace the form values; a changed form discards the shown result.
    ///
    /// Returns `true` when any field changed.
    pub fn update_form(&mut self, form: RawObservation) -> bool {
        if form == self.form {
            return false;
        }
        self.form = form;
        if !matches!(self.result, ResultState::Empty) {
            self.result = ResultState::Empty;
            self.status = StatusBarState::new(StatusTone::Idle, "Inputs changed");
        }
        true
    }

    /// Run one prediction for the current form values.
    pub fn predict(&mut self) {
        match predict_observation(&self.loader, &self.form) {
            Ok(report) => {
                self.status = StatusBarState::new(
                    StatusTone::Info,
                    format!("{} ({})", report.status_text(), report.probability_text()),
                );
                self.result = ResultState::Ready(Box::new(report));
            }
            Err(err) => {
                warn!("Prediction failed: {err}");
                self.status = StatusBarState::new(StatusTone::Error, "Prediction failed");
                self.result = ResultState::Failed(err.to_string());
            }
        }
    }

    /// Reset every field to its default and clear the result.
    pub fn reset_form(&mut self) {
        info!("Form reset to defaults");
        self.form = RawObservation::default();
        self.result = ResultState::Empty;
        self.status = StatusBarState::idle(&self.loader.source_label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        AgeBracket, AnesthesiaType, FEATURE_NAMES, FeatureVector, ProlapseStage, SurgicalModality,
        YesNo,
    };
    use crate::ml::ModelError;
    use crate::ml::tree_ensemble::OutputSpace;
    use crate::prediction::{Classifier, Contribution, Explainer, Explanation, RetentionOutcome};
    use std::cell::RefCell;

    #[derive(Clone)]
    struct StubModel {
        names: Vec<String>,
        label: u8,
        probability: f64,
        seen: std::rc::Rc<RefCell<Vec<FeatureVector>>>,
    }

    impl Classifier for StubModel {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict(&self, row: &FeatureVector) -> u8 {
            self.seen.borrow_mut().push(*row);
            self.label
        }

        fn predict_proba(&self, _row: &FeatureVector) -> f64 {
            self.probability
        }
    }

    impl Explainer for StubModel {
        fn explain(&self, row: &FeatureVector) -> Explanation {
            Explanation {
                base_value: 0.2,
                output_space: OutputSpace::Probability,
                contributions: row
                    .named()
                    .map(|(feature, feature_value)| Contribution {
                        feature: feature.to_string(),
                        feature_value,
                        value: 0.0,
                    })
                    .collect(),
            }
        }
    }

    struct StubLoader(Result<StubModel, String>);

    impl ModelLoader for StubLoader {
        type Model = StubModel;

        fn load(&self) -> Result<Self::Model, ModelError> {
            self.0.clone().map_err(ModelError::Invalid)
        }
    }

    fn stub(label: u8, probability: f64) -> StubModel {
        StubModel {
            names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            label,
            probability,
            seen: Default::default(),
        }
    }

    fn low_risk_form() -> RawObservation {
        RawObservation {
            age: AgeBracket::Adult,
            menopause: YesNo::No,
            surgical_modality: SurgicalModality::Laparotomy,
            surgical_duration_hours: 5.0,
            blood_loss_ml: 200.0,
            postoperative_analgesia: YesNo::No,
            anesthesia: AnesthesiaType::General,
            prolapse_stage: ProlapseStage::Stage0,
        }
    }

    #[test]
    fn surfaces_stub_label_and_probability_exactly() {
        let model = stub(0, 0.0732);
        let seen = model.seen.clone();
        let mut controller = PredictionController::new(StubLoader(Ok(model)));
        controller.update_form(low_risk_form());
        controller.predict();

        let report = controller.result().report().expect("prediction ready");
        assert_eq!(report.label, 0);
        assert_eq!(report.outcome, RetentionOutcome::WillNotOccur);
        assert_eq!(report.probability, 0.0732);
        assert_eq!(
            report.status_text(),
            "Prediction: Urinary retention will not occur"
        );
        assert_eq!(report.probability_text(), "Predicted probability: 7.32%");
        assert_eq!(controller.status.badge_label, "Info");

        let rows = seen.borrow();
        let expected = [0.0, 199.0 / 2999.0, 0.0, 0.0, 0.0, 4.0 / 49.0, 0.0, 0.0];
        for (got, want) in rows[0].as_slice().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn positive_label_reports_retention() {
        let mut controller = PredictionController::new(StubLoader(Ok(stub(1, 0.8))));
        controller.predict();
        let report = controller.result().report().unwrap();
        assert_eq!(report.status_text(), "Prediction: Urinary retention will occur");
        assert_eq!(report.probability_text(), "Predicted probability: 80.00%");
    }

    #[test]
    fn load_failure_becomes_error_result() {
        let mut controller =
            PredictionController::new(StubLoader(Err("artifact corrupt".to_string())));
        controller.predict();
        match controller.result() {
            ResultState::Failed(message) => assert!(message.contains("artifact corrupt")),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(controller.status.badge_label, "Error");
    }

    #[test]
    fn editing_the_form_clears_the_result() {
        let mut controller = PredictionController::new(StubLoader(Ok(stub(1, 0.6))));
        controller.predict();
        assert!(controller.result().report().is_some());

        assert!(!controller.update_form(controller.form()));
        assert!(controller.result().report().is_some());

        let mut edited = controller.form();
        edited.blood_loss_ml = 900.0;
        assert!(controller.update_form(edited));
        assert_eq!(controller.result(), &ResultState::Empty);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut controller = PredictionController::new(StubLoader(Ok(stub(0, 0.1))));
        controller.update_form(low_risk_form());
        controller.predict();
        controller.reset_form();
        assert_eq!(controller.form(), RawObservation::default());
        assert_eq!(controller.result(), &ResultState::Empty);
        assert_eq!(controller.status.badge_label, "Idle");
    }
}
