//! Covariate inputs laid out in three columns.

use eframe::egui::{self, RichText, Ui};

use super::style;
use crate::features::{RawObservation, Vocabulary};

const AGE_TITLE: &str = "Age (years)";
const MENOPAUSE_TITLE: &str = "Menopause";
const MODALITY_TITLE: &str = "Surgical modality";
const DURATION_TITLE: &str = "Surgical duration (hour)";
const BLOOD_LOSS_TITLE: &str = "Intraoperative blood loss (ml)";
const ANALGESIA_TITLE: &str = "Postoperative analgesia (Oral analgesics/Analgesic pumps)";
const ANESTHESIA_TITLE: &str = "Types of anesthesia";
const PROLAPSE_TITLE: &str = "Pelvic organ prolapse quantification";

const FIELD_SPACING: f32 = 10.0;

/// Render all eight fields into `form`.
pub(super) fn render(ui: &mut Ui, form: &mut RawObservation) {
    ui.columns(3, |columns| {
        vocabulary_select(&mut columns[0], AGE_TITLE, &mut form.age);
        vocabulary_select(&mut columns[0], MENOPAUSE_TITLE, &mut form.menopause);
        vocabulary_select(&mut columns[0], MODALITY_TITLE, &mut form.surgical_modality);

        vocabulary_select(
            &mut columns[1],
            ANALGESIA_TITLE,
            &mut form.postoperative_analgesia,
        );
        vocabulary_select(&mut columns[1], ANESTHESIA_TITLE, &mut form.anesthesia);
        vocabulary_select(&mut columns[1], PROLAPSE_TITLE, &mut form.prolapse_stage);

        number_input(
            &mut columns[2],
            DURATION_TITLE,
            &mut form.surgical_duration_hours,
            0.1,
        );
        number_input(&mut columns[2], BLOOD_LOSS_TITLE, &mut form.blood_loss_ml, 5.0);
    });
}

fn field_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).color(style::palette().text_muted));
}

/// Drop-down restricted to the closed vocabulary of `T`.
fn vocabulary_select<T: Vocabulary + PartialEq>(ui: &mut Ui, title: &str, value: &mut T) {
    field_title(ui, title);
    let width = ui.available_width();
    egui::ComboBox::from_id_salt(title)
        .width(width)
        .selected_text(value.label())
        .show_ui(ui, |ui| {
            for option in T::ALL {
                ui.selectable_value(value, *option, option.label());
            }
        });
    ui.add_space(FIELD_SPACING);
}

/// Non-negative numeric input.
fn number_input(ui: &mut Ui, title: &str, value: &mut f64, speed: f64) {
    field_title(ui, title);
    ui.add(
        egui::DragValue::new(value)
            .range(0.0..=f64::MAX)
            .speed(speed)
            .fixed_decimals(2),
    );
    ui.add_space(FIELD_SPACING);
}
