mod support;

use std::path::PathBuf;

use porur::config::{self, AppSettings, CONFIG_FILE_NAME};
use porur::egui_app::controller::PredictionController;
use porur::egui_app::state::ResultState;
use porur::features::{
    AgeBracket, AnesthesiaType, FEATURE_NAMES, ProlapseStage, RawObservation, SurgicalModality,
    YesNo,
};
use porur::ml::ModelError;
use porur::ml::tree_ensemble::{OutputSpace, TreeEnsembleModel};
use porur::prediction::{JsonModelLoader, PredictError, RetentionOutcome, predict_observation};
use support::porur_env::PorurEnvGuard;

fn bundled_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("model.json")
}

fn high_risk_observation() -> RawObservation {
    RawObservation {
        age: AgeBracket::FiftyPlus,
        menopause: YesNo::Yes,
        surgical_modality: SurgicalModality::Celioscope,
        surgical_duration_hours: 25.5,
        blood_loss_ml: 1500.5,
        postoperative_analgesia: YesNo::Yes,
        anesthesia: AnesthesiaType::Neuraxial,
        prolapse_stage: ProlapseStage::Stage3,
    }
}

#[test]
fn bundled_model_matches_the_encoder_columns() {
    let model = TreeEnsembleModel::load_json(&bundled_model_path()).expect("load bundled model");
    assert_eq!(model.feature_names, FEATURE_NAMES.to_vec());
    assert_eq!(model.output_space(), OutputSpace::LogOdds);
}

#[test]
fn default_form_predicts_no_retention_with_bundled_model() {
    let loader = JsonModelLoader::new(bundled_model_path());
    let report = predict_observation(&loader, &RawObservation::default()).expect("predict");
    assert_eq!(report.label, 0);
    assert_eq!(report.outcome, RetentionOutcome::WillNotOccur);
    assert_eq!(report.status_text(), "Prediction: Urinary retention will not occur");
    assert!((report.probability - 0.377_540_668_798_145_4).abs() < 1e-9);
    assert_eq!(report.probability_text(), "Predicted probability: 37.75%");
    assert!((report.explanation.base_value - (-1.056_833_333_333_333_5)).abs() < 1e-9);
    assert!((report.explanation.output_value() - (-0.5)).abs() < 1e-9);
}

#[test]
fn high_risk_form_predicts_retention_and_explanation_is_additive() {
    let loader = JsonModelLoader::new(bundled_model_path());
    let report = predict_observation(&loader, &high_risk_observation()).expect("predict");
    assert_eq!(report.label, 1);
    assert_eq!(report.outcome, RetentionOutcome::WillOccur);
    assert!((report.probability - 0.562_176_500_885_798_1).abs() < 1e-9);

    let explanation = &report.explanation;
    assert_eq!(explanation.contributions.len(), FEATURE_NAMES.len());
    let logit = (report.probability / (1.0 - report.probability)).ln();
    assert!((explanation.output_value() - logit).abs() < 1e-9);
    for (contribution, name) in explanation.contributions.iter().zip(FEATURE_NAMES) {
        assert_eq!(contribution.feature, name);
    }
}

#[test]
fn repeated_predictions_are_identical() {
    let loader = JsonModelLoader::new(bundled_model_path());
    let first = predict_observation(&loader, &high_risk_observation()).expect("first");
    let second = predict_observation(&loader, &high_risk_observation()).expect("second");
    assert_eq!(first, second);
}

#[test]
fn missing_model_surfaces_as_read_error() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let loader = JsonModelLoader::new(temp.path().join("absent.json"));
    let err = predict_observation(&loader, &RawObservation::default()).unwrap_err();
    assert!(matches!(err, PredictError::Model(ModelError::Read { .. })));
}

#[test]
fn model_with_other_columns_is_rejected() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let text = std::fs::read_to_string(bundled_model_path()).expect("read bundled model");
    let path = temp.path().join("renamed.json");
    std::fs::write(&path, text.replace("\"TOA\"", "\"Anesthesia\"")).expect("write model");
    let loader = JsonModelLoader::new(path);
    let err = predict_observation(&loader, &RawObservation::default()).unwrap_err();
    assert!(matches!(err, PredictError::SchemaMismatch { .. }));
}

#[test]
fn controller_shows_report_then_clears_on_edit() {
    let mut controller = PredictionController::new(JsonModelLoader::new(bundled_model_path()));
    controller.predict();
    assert!(matches!(controller.result(), ResultState::Ready(_)));

    let mut form = controller.form();
    form.prolapse_stage = ProlapseStage::Stage2;
    assert!(controller.update_form(form));
    assert!(matches!(controller.result(), ResultState::Empty));
}

#[test]
fn first_launch_writes_default_config() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = PorurEnvGuard::set_config_home(temp.path().to_path_buf());

    let settings = config::load_or_default().expect("load settings");
    assert_eq!(settings, AppSettings::default());
    let written = temp.path().join(".porur").join(CONFIG_FILE_NAME);
    assert!(written.is_file());
    assert_eq!(config::load_settings_from(&written).expect("reload"), settings);
}

#[test]
fn edited_config_is_read_back() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = PorurEnvGuard::set_config_home(temp.path().to_path_buf());

    let path = config::config_path().expect("config path");
    let text = "model_path = \"models/retention.json\"\n\n\
                [ui]\nshow_contribution_table = false\nforce_plot_height = 1000.0\n";
    std::fs::write(&path, text).expect("write config");
    let settings = config::load_or_default().expect("load settings");
    assert_eq!(settings.model_path, PathBuf::from("models/retention.json"));
    assert!(!settings.ui.show_contribution_table);
    assert_eq!(settings.ui.force_plot_height, 400.0);
}
