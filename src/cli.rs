//! Argument parsing and report formatting for `porur-predict`.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::{self, DEFAULT_MODEL_PATH};
use crate::features::{
    AgeBracket, AnesthesiaType, ProlapseStage, RawObservation, SurgicalModality, YesNo,
    parse_field,
};
use crate::prediction::{JsonModelLoader, PredictionReport, predict_observation};

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    /// Explicit model artifact; falls back to the configured one.
    pub model_path: Option<PathBuf>,
    /// Form answers; flags not given keep the form defaults.
    pub observation: RawObservation,
    /// Print the report as JSON instead of text.
    pub json: bool,
    /// Debug-level logging on stderr.
    pub verbose: bool,
}

/// Parse arguments (without the program name).
///
/// `Err` carries the message to print; `--help` returns the help text as an
/// error so the caller can print it and exit.
pub fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        model_path: None,
        observation: RawObservation::default(),
        json: false,
        verbose: false,
    };
    let obs = &mut options.observation;

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        let mut value = || {
            idx += 1;
            args.get(idx)
                .map(String::as_str)
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag {
            "-h" | "--help" => return Err(help_text()),
            "--json" => options.json = true,
            "-v" | "--verbose" => options.verbose = true,
            "--model" => options.model_path = Some(PathBuf::from(value()?)),
            "--age" => {
                obs.age = AgeBracket::parse_lenient(value()?).map_err(|e| e.to_string())?
            }
            "--menopause" => {
                obs.menopause =
                    parse_field::<YesNo>("Menopause", value()?).map_err(|e| e.to_string())?
            }
            "--surgical-modality" => {
                obs.surgical_modality = value()?
                    .parse::<SurgicalModality>()
                    .map_err(|e| e.to_string())?
            }
            "--surgical-duration" => obs.surgical_duration_hours = non_negative(flag, value()?)?,
            "--blood-loss" => obs.blood_loss_ml = non_negative(flag, value()?)?,
            "--analgesia" => {
                obs.postoperative_analgesia =
                    parse_field::<YesNo>("PA", value()?).map_err(|e| e.to_string())?
            }
            "--anesthesia" => {
                obs.anesthesia = value()?
                    .parse::<AnesthesiaType>()
                    .map_err(|e| e.to_string())?
            }
            "--prolapse-stage" => {
                obs.prolapse_stage = value()?
                    .parse::<ProlapseStage>()
                    .map_err(|e| e.to_string())?
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn non_negative(flag: &str, raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid {flag} value: {raw}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{flag} must be a number >= 0 (got {raw})"));
    }
    Ok(value)
}

/// Usage text printed for `--help` and after unknown arguments.
pub fn help_text() -> String {
    [
        "porur-predict",
        "",
        "Estimate the risk of postoperative urinary retention for one patient.",
        "",
        "Usage:",
        "  porur-predict [options]",
        "",
        "Options:",
        "  --model <model.json>             Model artifact (default: configured path).",
        "  --age <≥50|>=50|18-49>           Age bracket (default: ≥50).",
        "  --menopause <Yes|No>             Menopause (default: Yes).",
        "  --surgical-modality <celioscope|laparotomy>  (default: celioscope).",
        "  --surgical-duration <hours>      Surgical duration (default: 5.0).",
        "  --blood-loss <ml>                Intraoperative blood loss (default: 200.0).",
        "  --analgesia <Yes|No>             Postoperative analgesia (default: Yes).",
        "  --anesthesia <\"neuraxial anesthesia\"|\"general anesthesia\">",
        "                                   Types of anesthesia (default: neuraxial).",
        "  --prolapse-stage <0|1|2|3>       Prolapse quantification stage (default: 0).",
        "  --json                           Print the full report as JSON.",
        "  -v, --verbose                    Debug logging on stderr.",
    ]
    .join("\n")
}

/// Model artifact to use: `--model`, else the configured path, else
/// [`DEFAULT_MODEL_PATH`].
///
/// Only reads an existing config file; nothing is created on disk.
pub fn resolve_model_path(options: &CliOptions) -> PathBuf {
    if let Some(path) = &options.model_path {
        return path.clone();
    }
    let configured = match config::find_config_file() {
        Ok(Some(path)) => config::load_settings_from(&path).map(|settings| settings.model_path),
        Ok(None) => return PathBuf::from(DEFAULT_MODEL_PATH),
        Err(err) => Err(err),
    };
    configured.unwrap_or_else(|err| {
        warn!("Ignoring unreadable config: {err}");
        PathBuf::from(DEFAULT_MODEL_PATH)
    })
}

/// Predict for the parsed options and write the report to `out`.
pub fn execute(options: &CliOptions, out: &mut impl io::Write) -> Result<(), String> {
    let model_path = resolve_model_path(options);
    debug!("Using model artifact {}", model_path.display());

    let loader = JsonModelLoader::new(model_path);
    let report =
        predict_observation(&loader, &options.observation).map_err(|err| err.to_string())?;
    let text = if options.json {
        let mut json = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?;
        json.push('\n');
        json
    } else {
        render_text_report(&report)
    };
    out.write_all(text.as_bytes())
        .map_err(|err| format!("Failed to write report: {err}"))
}

/// Human-readable report: status, probability, and contributions.
pub fn render_text_report(report: &PredictionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.status_text());
    let _ = writeln!(out, "{}", report.probability_text());
    let explanation = &report.explanation;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Feature contributions ({}):",
        explanation.output_space.caption()
    );
    let _ = writeln!(
        out,
        "  {:<10} {:>10}",
        "base value",
        format!("{:.4}", explanation.base_value)
    );
    for contribution in explanation.by_magnitude() {
        let _ = writeln!(
            out,
            "  {:<10} {:>+10.4}  (value {:.4})",
            contribution.feature, contribution.value, contribution.feature_value
        );
    }
    let _ = writeln!(
        out,
        "  {:<10} {:>10}",
        "f(x)",
        format!("{:.4}", explanation.output_value())
    );
    out
}
