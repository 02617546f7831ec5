//! egui renderer for the single-page form.

mod force_plot;
mod form;
mod results;
pub mod style;

use eframe::egui::{self, Frame, Margin, RichText, StrokeKind, Vec2};

use crate::config::{AppSettings, UiSettings};
use crate::egui_app::controller::PredictionController;
use crate::prediction::JsonModelLoader;

/// Smallest window that still fits the three form columns.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(900.0, 620.0);

const TITLE: &str = "App for Gynecologic abdominal postoperative urinary retention";
const SUBTITLE: &str = "This app allows you to input clinical data and predicts outcomes \
                        using an machine learning model.";
const AUTHORS: &str = "Jiahao Shi; Youbei Lin; Xiaojing Qin; Hongyu Li";
const CONTACT_EMAIL: &str = "reda4673@sina.com";

/// Renders the form and results using the shared controller state.
pub struct EguiApp {
    controller: PredictionController<JsonModelLoader>,
    ui_settings: UiSettings,
    visuals_set: bool,
}

impl EguiApp {
    /// Build the app around the configured model artifact.
    pub fn new(settings: AppSettings) -> Self {
        let loader = JsonModelLoader::new(settings.model_path);
        Self {
            controller: PredictionController::new(loader),
            ui_settings: settings.ui,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::light();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_status(&self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_panel)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.status;
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 2.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        2.0,
                        style::section_stroke(),
                        StrokeKind::Inside,
                    );
                    ui.label(RichText::new(&status.badge_label).strong());
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_muted));
                });
            });
    }

    fn render_page(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.heading(RichText::new(TITLE).color(palette.heading).size(26.0));
        ui.label(RichText::new(SUBTITLE).color(palette.heading).size(16.0));
        ui.separator();
        ui.add_space(8.0);

        let mut form = self.controller.form();
        form::render(ui, &mut form);
        self.controller.update_form(form);

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let predict = egui::Button::new(RichText::new("Predict").color(egui::Color32::WHITE))
                .fill(palette.button)
                .min_size(egui::vec2(96.0, 30.0));
            if ui.add(predict).clicked() {
                self.controller.predict();
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_form();
            }
        });
        ui.add_space(10.0);

        results::render(ui, self.controller.result(), &self.ui_settings);

        ui.add_space(10.0);
        ui.separator();
        ui.label(
            RichText::new("Author Information")
                .strong()
                .size(18.0)
                .color(palette.heading),
        );
        ui.horizontal(|ui| {
            ui.label(RichText::new("Name:").strong());
            ui.label(AUTHORS);
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("E-mail:").strong());
            ui.label(CONTACT_EMAIL);
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default()
            .frame(
                Frame::new()
                    .fill(style::palette().bg_page)
                    .inner_margin(Margin::symmetric(24, 16)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("page_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.render_page(ui));
            });
    }
}
