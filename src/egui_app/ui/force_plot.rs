//! Additive force plot of one explanation.
//!
//! Raising contributions stack leftwards from the model output, lowering ones
//! stack rightwards, so the two stacks meet at `f(x)` and the open ends sit
//! at the base value.

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2, pos2,
};

use super::style;
use crate::prediction::Explanation;

/// Fraction of the value range added on each side of the axis.
const AXIS_PADDING: f64 = 0.08;
const TICK_COUNT: usize = 5;
const BAR_HEIGHT: f32 = 22.0;
const CHEVRON: f32 = 6.0;
/// Narrower segments get no inline label.
const MIN_LABEL_WIDTH: f32 = 56.0;

/// One contribution placed on the value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceSegment {
    pub feature: String,
    pub feature_value: f64,
    pub start: f64,
    pub end: f64,
    pub raising: bool,
}

impl ForceSegment {
    /// Absolute size of the contribution.
    pub fn width(&self) -> f64 {
        (self.end - self.start).abs()
    }

    fn caption(&self) -> String {
        format!("{} = {}", self.feature, format_value(self.feature_value))
    }
}

/// Axis-space geometry of a force plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceLayout {
    pub base_value: f64,
    pub output_value: f64,
    pub segments: Vec<ForceSegment>,
    /// Left edge of the padded axis.
    pub axis_min: f64,
    /// Right edge of the padded axis.
    pub axis_max: f64,
}

impl ForceLayout {
    /// Place every non-zero contribution on a padded value axis.
    pub fn from_explanation(explanation: &Explanation) -> Self {
        let output_value = explanation.output_value();
        let mut segments = Vec::with_capacity(explanation.contributions.len());

        let mut cursor = output_value;
        for contribution in explanation.raising() {
            segments.push(ForceSegment {
                feature: contribution.feature.clone(),
                feature_value: contribution.feature_value,
                start: cursor - contribution.value,
                end: cursor,
                raising: true,
            });
            cursor -= contribution.value;
        }
        let raise_start = cursor;

        let mut cursor = output_value;
        for contribution in explanation.lowering() {
            segments.push(ForceSegment {
                feature: contribution.feature.clone(),
                feature_value: contribution.feature_value,
                start: cursor,
                end: cursor - contribution.value,
                raising: false,
            });
            cursor -= contribution.value;
        }
        let lower_end = cursor;

        let low = raise_start.min(explanation.base_value).min(output_value);
        let high = lower_end.max(explanation.base_value).max(output_value);
        let span = high - low;
        let (axis_min, axis_max) = if span > f64::EPSILON {
            (low - span * AXIS_PADDING, high + span * AXIS_PADDING)
        } else {
            (low - 1.0, high + 1.0)
        };

        Self {
            base_value: explanation.base_value,
            output_value,
            segments,
            axis_min,
            axis_max,
        }
    }

    /// Horizontal screen coordinate of an axis value inside `rect`.
    pub fn to_screen_x(&self, value: f64, rect: Rect) -> f32 {
        let t = (value - self.axis_min) / (self.axis_max - self.axis_min);
        rect.left() + (t as f32) * rect.width()
    }

    /// Evenly spaced tick values across the padded axis.
    pub fn ticks(&self) -> Vec<f64> {
        let step = (self.axis_max - self.axis_min) / (TICK_COUNT - 1) as f64;
        (0..TICK_COUNT)
            .map(|i| self.axis_min + step * i as f64)
            .collect()
    }
}

/// Paint the force plot for `explanation` at the given height.
pub(super) fn show(ui: &mut Ui, explanation: &Explanation, height: f32) {
    let layout = ForceLayout::from_explanation(explanation);
    let palette = style::palette();
    let width = ui.available_width();
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::hover());
    let rect = response.rect.shrink2(Vec2::new(12.0, 0.0));
    painter.rect_filled(response.rect, 0.0, palette.bg_panel);

    let axis_y = rect.top() + 34.0;
    let bar_top = axis_y + 14.0;
    let muted = palette.text_muted;
    let small = FontId::proportional(11.0);

    painter.text(
        pos2(rect.left(), rect.top() + 2.0),
        Align2::LEFT_TOP,
        explanation.output_space.caption(),
        small.clone(),
        muted,
    );
    painter.line_segment(
        [pos2(rect.left(), axis_y), pos2(rect.right(), axis_y)],
        Stroke::new(1.0, palette.outline),
    );
    for tick in layout.ticks() {
        let x = layout.to_screen_x(tick, rect);
        painter.line_segment(
            [pos2(x, axis_y - 3.0), pos2(x, axis_y + 3.0)],
            Stroke::new(1.0, muted),
        );
        painter.text(
            pos2(x, axis_y - 4.0),
            Align2::CENTER_BOTTOM,
            format!("{tick:.2}"),
            small.clone(),
            muted,
        );
    }

    let mut hovered = None;
    for segment in &layout.segments {
        let x0 = layout.to_screen_x(segment.start, rect);
        let x1 = layout.to_screen_x(segment.end, rect);
        let bar = Rect::from_min_max(
            pos2(x0.min(x1), bar_top),
            pos2(x0.max(x1), bar_top + BAR_HEIGHT),
        );
        let color = if segment.raising {
            palette.force_raise
        } else {
            palette.force_lower
        };
        painter.rect_filled(bar, 0.0, color);
        paint_chevron(&painter, bar, segment.raising);
        if bar.width() >= MIN_LABEL_WIDTH {
            painter.text(
                pos2(bar.center().x, bar.bottom() + 4.0),
                Align2::CENTER_TOP,
                segment.caption(),
                small.clone(),
                color,
            );
        }
        if response
            .hover_pos()
            .is_some_and(|pos| bar.expand(1.0).contains(pos))
        {
            hovered = Some(segment);
        }
    }

    paint_marker(
        &painter,
        layout.to_screen_x(layout.output_value, rect),
        bar_top,
        &format!("f(x) = {:.2}", layout.output_value),
        palette.text_primary,
    );
    let base_x = layout.to_screen_x(layout.base_value, rect);
    painter.line_segment(
        [pos2(base_x, axis_y), pos2(base_x, bar_top + BAR_HEIGHT)],
        Stroke::new(1.0, muted),
    );
    painter.text(
        pos2(base_x, bar_top + BAR_HEIGHT + 20.0),
        Align2::CENTER_TOP,
        format!("base value = {:.2}", layout.base_value),
        small,
        muted,
    );

    if let Some(segment) = hovered {
        response.on_hover_text_at_pointer(format!(
            "{}\ncontribution {:+.4}",
            segment.caption(),
            if segment.raising {
                segment.width()
            } else {
                -segment.width()
            }
        ));
    }
}

/// Arrow-like notch pointing in the direction the segment pushes.
fn paint_chevron(painter: &egui::Painter, bar: Rect, raising: bool) {
    if bar.width() < CHEVRON * 2.0 {
        return;
    }
    let (tip_x, back_x) = if raising {
        (bar.right() - 1.0, bar.right() - 1.0 - CHEVRON)
    } else {
        (bar.left() + 1.0, bar.left() + 1.0 + CHEVRON)
    };
    let points = vec![
        pos2(back_x, bar.top() + 3.0),
        pos2(tip_x, bar.center().y),
        pos2(back_x, bar.bottom() - 3.0),
    ];
    painter.add(Shape::line(
        points,
        Stroke::new(1.5, Color32::from_white_alpha(200)),
    ));
}

fn paint_marker(painter: &egui::Painter, x: f32, bar_top: f32, label: &str, color: Color32) {
    painter.line_segment(
        [pos2(x, bar_top - 6.0), pos2(x, bar_top + BAR_HEIGHT + 2.0)],
        Stroke::new(2.0, color),
    );
    painter.text(
        Pos2::new(x, bar_top - 6.0),
        Align2::CENTER_BOTTOM,
        label,
        FontId::proportional(13.0),
        color,
    );
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::tree_ensemble::OutputSpace;
    use crate::prediction::Contribution;

    fn explanation(values: &[(&str, f64)]) -> Explanation {
        Explanation {
            base_value: -0.5,
            output_space: OutputSpace::LogOdds,
            contributions: values
                .iter()
                .map(|(feature, value)| Contribution {
                    feature: feature.to_string(),
                    feature_value: 1.0,
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn stacks_meet_at_output_and_end_at_base() {
        let contributions = [("Age", 0.6), ("SD", 0.3), ("IBL", -0.2)];
        let layout = ForceLayout::from_explanation(&explanation(&contributions));
        let output = -0.5 + 0.6 + 0.3 - 0.2;
        assert!((layout.output_value - output).abs() < 1e-12);

        let raising: Vec<&ForceSegment> = layout.segments.iter().filter(|s| s.raising).collect();
        assert_eq!(raising[0].feature, "Age");
        assert!((raising[0].end - output).abs() < 1e-12);
        assert!((raising[1].end - raising[0].start).abs() < 1e-12);

        let lowering: Vec<&ForceSegment> = layout.segments.iter().filter(|s| !s.raising).collect();
        assert!((lowering[0].start - output).abs() < 1e-12);
        assert!((lowering[0].end - (output + 0.2)).abs() < 1e-12);

        let raise_width: f64 = raising.iter().map(|s| s.width()).sum();
        let lower_width: f64 = lowering.iter().map(|s| s.width()).sum();
        assert!((output - raise_width + lower_width - layout.base_value).abs() < 1e-12);
    }

    #[test]
    fn axis_covers_every_segment_with_padding() {
        let layout = ForceLayout::from_explanation(&explanation(&[("Age", 1.0), ("PQ", -2.0)]));
        for segment in &layout.segments {
            assert!(segment.start.min(segment.end) > layout.axis_min);
            assert!(segment.start.max(segment.end) < layout.axis_max);
        }
        assert!(layout.base_value > layout.axis_min && layout.base_value < layout.axis_max);
        let ticks = layout.ticks();
        assert_eq!(ticks.len(), TICK_COUNT);
        assert_eq!(ticks[0], layout.axis_min);
    }

    #[test]
    fn zero_contributions_still_give_a_usable_axis() {
        let layout = ForceLayout::from_explanation(&explanation(&[("Age", 0.0)]));
        assert!(layout.segments.is_empty());
        assert!(layout.axis_max > layout.axis_min);
        let rect = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(100.0, 10.0));
        assert!((layout.to_screen_x(layout.base_value, rect) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn integer_feature_values_print_without_decimals() {
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(0.0816), "0.082");
    }
}
