use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Model artifact location used when none is configured, relative to the
/// working directory.
pub const DEFAULT_MODEL_PATH: &str = "model.json";

const MIN_FORCE_PLOT_HEIGHT: f32 = 80.0;
const MAX_FORCE_PLOT_HEIGHT: f32 = 400.0;

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_true() -> bool {
    true
}

fn default_force_plot_height() -> f32 {
    140.0
}

/// Top-level settings persisted to `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Model artifact read on every prediction.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Presentation options for the results area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Show the contribution table below the force plot.
    #[serde(default = "default_true")]
    pub show_contribution_table: bool,
    /// Force plot height in points.
    #[serde(default = "default_force_plot_height")]
    pub force_plot_height: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            ui: UiSettings::default(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_contribution_table: true,
            force_plot_height: default_force_plot_height(),
        }
    }
}

impl AppSettings {
    /// Clamp values that would make the UI unusable.
    pub fn normalized(mut self) -> Self {
        if self.model_path.as_os_str().is_empty() {
            self.model_path = default_model_path();
        }
        self.ui.force_plot_height = if self.ui.force_plot_height.is_finite() {
            self.ui
                .force_plot_height
                .clamp(MIN_FORCE_PLOT_HEIGHT, MAX_FORCE_PLOT_HEIGHT)
        } else {
            default_force_plot_height()
        };
        self
    }
}
