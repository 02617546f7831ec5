//! View state owned by the controller and read by the renderer.

use egui::Color32;

use crate::egui_app::ui::style;
use crate::prediction::PredictionReport;

/// What the results area currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultState {
    /// No prediction has been requested for the current inputs.
    #[default]
    Empty,
    /// The last request succeeded.
    Ready(Box<PredictionReport>),
    /// The last request failed with this message.
    Failed(String),
}

impl ResultState {
    /// The successful report, if one is shown.
    pub fn report(&self) -> Option<&PredictionReport> {
        match self {
            ResultState::Ready(report) => Some(report),
            _ => None,
        }
    }
}

/// Severity shown by the footer badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Error,
}

impl StatusTone {
    fn label(self) -> &'static str {
        match self {
            StatusTone::Idle => "Idle",
            StatusTone::Info => "Info",
            StatusTone::Error => "Error",
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
}

impl StatusBarState {
    /// Status with the badge for `tone`.
    pub fn new(tone: StatusTone, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            badge_label: tone.label().into(),
            badge_color: style::status_badge_color(tone),
        }
    }

    /// Status shown before the first prediction.
    pub fn idle(model_source: &str) -> Self {
        Self::new(
            StatusTone::Idle,
            format!("Model is read from {model_source} on each prediction"),
        )
    }
}
