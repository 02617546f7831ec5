use eframe::egui::{self, Color32, CornerRadius, Frame, Margin, RichText, Stroke, Ui};

use super::{force_plot, style};
use crate::config::UiSettings;
use crate::egui_app::state::ResultState;
use crate::prediction::PredictionReport;

pub(super) fn render(ui: &mut Ui, result: &ResultState, settings: &UiSettings) {
    match result {
        ResultState::Empty => {}
        ResultState::Ready(report) => render_report(ui, report, settings),
        ResultState::Failed(message) => {
            let palette = style::palette();
            callout(ui, palette.error_fill, palette.error_text, |ui| {
                ui.label(
                    RichText::new("Prediction failed")
                        .strong()
                        .color(palette.error_text),
                );
                ui.label(RichText::new(message).color(palette.error_text));
            });
        }
    }
}

fn render_report(ui: &mut Ui, report: &PredictionReport, settings: &UiSettings) {
    let palette = style::palette();
    callout(ui, palette.success_fill, palette.success_text, |ui| {
        ui.label(RichText::new(report.status_text()).color(palette.success_text));
    });
    ui.add_space(6.0);
    callout(ui, palette.info_fill, palette.info_text, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            ui.label(RichText::new("Predicted probability:").color(palette.info_text));
            ui.label(
                RichText::new(report.probability_percent())
                    .strong()
                    .color(palette.info_text),
            );
        });
    });
    ui.add_space(10.0);

    Frame::new()
        .fill(palette.bg_panel)
        .stroke(style::section_stroke())
        .inner_margin(Margin::same(6))
        .show(ui, |ui| {
            force_plot::show(ui, &report.explanation, settings.force_plot_height);
        });

    if settings.show_contribution_table {
        ui.add_space(8.0);
        egui::CollapsingHeader::new("Feature contributions")
            .default_open(false)
            .show(ui, |ui| contribution_table(ui, report));
    }
}

fn contribution_table(ui: &mut Ui, report: &PredictionReport) {
    let palette = style::palette();
    let explanation = &report.explanation;
    egui::Grid::new("contribution_table")
        .num_columns(3)
        .striped(true)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Feature").strong());
            ui.label(RichText::new("Encoded value").strong());
            ui.label(RichText::new("Contribution").strong());
            ui.end_row();
            for contribution in explanation.by_magnitude() {
                let color = if contribution.value > 0.0 {
                    palette.force_raise
                } else if contribution.value < 0.0 {
                    palette.force_lower
                } else {
                    palette.text_muted
                };
                ui.label(&contribution.feature);
                ui.label(format!("{:.4}", contribution.feature_value));
                ui.label(RichText::new(format!("{:+.4}", contribution.value)).color(color));
                ui.end_row();
            }
            ui.label(RichText::new("Base value").color(palette.text_muted));
            ui.label("");
            ui.label(format!("{:.4}", explanation.base_value));
            ui.end_row();
        });
}

fn callout(ui: &mut Ui, fill: Color32, accent: Color32, add_contents: impl FnOnce(&mut Ui)) {
    Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, accent.gamma_multiply(0.3)))
        .corner_radius(CornerRadius::same(5))
        .inner_margin(Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}
