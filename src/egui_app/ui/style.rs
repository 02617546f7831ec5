use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::egui_app::state::StatusTone;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_page: Color32,
    pub bg_panel: Color32,
    pub bg_widget: Color32,
    pub outline: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub heading: Color32,
    pub button: Color32,
    pub success_fill: Color32,
    pub success_text: Color32,
    pub info_fill: Color32,
    pub info_text: Color32,
    pub error_fill: Color32,
    pub error_text: Color32,
    /// Contributions that raise the predicted risk.
    pub force_raise: Color32,
    /// Contributions that lower the predicted risk.
    pub force_lower: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_page: Color32::from_rgb(245, 245, 245),
        bg_panel: Color32::from_rgb(255, 255, 255),
        bg_widget: Color32::from_rgb(236, 238, 241),
        outline: Color32::from_rgb(214, 218, 224),
        text_primary: Color32::from_rgb(51, 51, 51),
        text_muted: Color32::from_rgb(110, 114, 120),
        heading: Color32::from_rgb(58, 123, 213),
        button: Color32::from_rgb(76, 175, 80),
        success_fill: Color32::from_rgb(223, 240, 216),
        success_text: Color32::from_rgb(23, 92, 39),
        info_fill: Color32::from_rgb(221, 235, 250),
        info_text: Color32::from_rgb(16, 70, 140),
        error_fill: Color32::from_rgb(252, 228, 228),
        error_text: Color32::from_rgb(150, 30, 30),
        force_raise: Color32::from_rgb(255, 0, 81),
        force_lower: Color32::from_rgb(0, 139, 251),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_page;
    visuals.panel_fill = palette.bg_page;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_panel;
    visuals.faint_bg_color = palette.bg_widget;
    visuals.selection.bg_fill = palette.info_fill;
    visuals.selection.stroke = Stroke::new(1.0, palette.heading);
    visuals.widgets.noninteractive.bg_fill = palette.bg_page;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rounded(&mut visuals.widgets.inactive, palette);
    set_rounded(&mut visuals.widgets.hovered, palette);
    set_rounded(&mut visuals.widgets.active, palette);
    set_rounded(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::same(5);
    visuals.menu_corner_radius = CornerRadius::same(5);
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rounded(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(5);
    vis.bg_fill = palette.bg_widget;
    vis.weak_bg_fill = palette.bg_widget;
    vis.bg_stroke = Stroke::new(1.0, palette.outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Idle => Color32::from_rgb(160, 160, 160),
        StatusTone::Info => Color32::from_rgb(64, 140, 112),
        StatusTone::Error => Color32::from_rgb(192, 57, 43),
    }
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().outline)
}
