//! Immediate-mode HUD: the date and step sliders, play/pause, the distance
//! calculator toggle and the measurement labels.
//!
//! Widgets never mutate the viewer directly. They report [`UiIntent`]s which
//! the app applies after the egui frame ends.

use crate::camera::Camera;
use crate::overlay::OverlayLabel;
use egui::{Align2, Color32, FontId};
use orrery::Orrery;

/// Slider positions for the playback step; each notch is five days.
pub const STEP_NOTCHES: std::ops::RangeInclusive<u32> = 1..=20;
const DAYS_PER_NOTCH: u32 = 5;

const MEASURE_ACTIVE_FILL: Color32 = Color32::from_rgba_premultiplied(0, 178, 0, 178);
const LABEL_FONT_PX: std::ops::RangeInclusive<f32> = 12.0..=48.0;

/// Snapshot of the state the HUD displays.
#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    pub date_label: String,
    pub date_index: usize,
    pub last_index: usize,
    pub step_size_days: u32,
    pub playing: bool,
    pub measuring: bool,
    pub distance_readout: String,
}

impl HudModel {
    pub fn from_orrery(orrery: &Orrery) -> Self {
        Self {
            date_label: orrery.date_label().to_owned(),
            date_index: orrery.current_index(),
            last_index: orrery.dates().last_index(),
            step_size_days: orrery.playback().step_size_days(),
            playing: orrery.is_playing(),
            measuring: orrery.selection().is_active(),
            distance_readout: orrery.distance_readout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiIntent {
    SeekDate(usize),
    TogglePlayback,
    SetStepSize(u32),
    ToggleMeasure,
}

pub fn step_label(days: u32) -> String {
    format!("Step Size: {days} days")
}

/// Slider notch for a step size in days.
pub fn step_notch(days: u32) -> u32 {
    (days / DAYS_PER_NOTCH).clamp(*STEP_NOTCHES.start(), *STEP_NOTCHES.end())
}

/// Draws the control panels and returns what the user asked for this frame.
pub fn draw_controls(ctx: &egui::Context, model: &HudModel) -> Vec<UiIntent> {
    let mut intents = Vec::new();

    egui::TopBottomPanel::bottom("time_controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let mut notch = step_notch(model.step_size_days);
            ui.label(step_label(notch * DAYS_PER_NOTCH));
            let step = ui.add(egui::Slider::new(&mut notch, STEP_NOTCHES).show_value(false));
            if step.changed() {
                intents.push(UiIntent::SetStepSize(notch * DAYS_PER_NOTCH));
            }

            ui.separator();

            let mut index = model.date_index.min(model.last_index);
            let date = ui.add(
                egui::Slider::new(&mut index, 0..=model.last_index)
                    .show_value(false)
                    .clamp_to_range(true),
            );
            if date.changed() {
                intents.push(UiIntent::SeekDate(index));
            }

            ui.label(egui::RichText::new(&model.date_label).monospace());
        });
    });

    egui::Area::new(egui::Id::new("playback_hud"))
        .anchor(Align2::LEFT_TOP, [10.0, 10.0])
        .show(ctx, |ui| {
            let play_text = if model.playing { "Pause" } else { "Play" };
            if ui.button(play_text).clicked() {
                intents.push(UiIntent::TogglePlayback);
            }

            let mut measure = egui::Button::new("Distance Calculator");
            if model.measuring {
                measure = measure.fill(MEASURE_ACTIVE_FILL);
            }
            if ui.add(measure).clicked() {
                intents.push(UiIntent::ToggleMeasure);
            }

            ui.label(egui::RichText::new(&model.distance_readout).color(Color32::WHITE));
        });

    intents
}

/// Font size in screen pixels for a label of world-space height `scale`
/// seen at `pixels_per_unit`.
pub fn label_font_px(scale: f64, pixels_per_unit: f64) -> f32 {
    let px = (scale * pixels_per_unit) as f32;
    if px.is_finite() {
        px.clamp(*LABEL_FONT_PX.start(), *LABEL_FONT_PX.end())
    } else {
        *LABEL_FONT_PX.start()
    }
}

/// Paints measurement labels at their projected anchors, behind the panels.
pub fn draw_labels<'a>(
    ctx: &egui::Context,
    camera: &Camera,
    viewport: [f64; 2],
    labels: impl IntoIterator<Item = &'a OverlayLabel>,
) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let points_per_pixel = 1.0 / ctx.pixels_per_point();

    for label in labels {
        let Some((px, depth)) = camera.project(label.anchor, viewport) else {
            continue;
        };
        let size_px = label_font_px(label.scale, camera.pixels_per_unit(depth, viewport[1]));
        let pos = egui::pos2(px.x as f32 * points_per_pixel, px.y as f32 * points_per_pixel);

        painter.text(
            pos,
            Align2::CENTER_BOTTOM,
            &label.text,
            FontId::proportional(size_px * points_per_pixel),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> HudModel {
        HudModel {
            date_label: "2026-10-20".into(),
            date_index: 16_567,
            last_index: 21_913,
            step_size_days: 5,
            playing: false,
            measuring: false,
            distance_readout: "Distance: 0.00 Million km".into(),
        }
    }

    #[test]
    fn step_notches_cover_five_to_hundred_days() {
        assert_eq!(step_notch(5), 1);
        assert_eq!(step_notch(100), 20);
        assert_eq!(step_label(step_notch(35) * 5), "Step Size: 35 days");
    }

    #[test]
    fn label_font_is_clamped() {
        assert_eq!(label_font_px(4.0, 0.1), 12.0);
        assert_eq!(label_font_px(4.0, 100.0), 48.0);
        assert_eq!(label_font_px(5.0, 4.0), 20.0);
        assert_eq!(label_font_px(f64::NAN, 1.0), 12.0);
    }

    #[test]
    fn readout_is_shown_without_a_measurement() {
        let ctx = egui::Context::default();
        // New areas are laid out invisibly and then fade in; one second per
        // frame lets both settle.
        let mut output = egui::FullOutput::default();
        for second in 0..4 {
            let input = egui::RawInput {
                time: Some(second as f64),
                ..Default::default()
            };
            output = ctx.run(input, |ctx| {
                draw_controls(ctx, &model());
            });
        }

        let painted_readout = output.shapes.iter().any(|clipped| match &clipped.shape {
            egui::Shape::Text(text) => text.galley.text() == "Distance: 0.00 Million km",
            _ => false,
        });
        assert!(painted_readout);
    }

    #[test]
    fn idle_frame_emits_no_intents() {
        let ctx = egui::Context::default();
        let mut intents = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            intents = draw_controls(ctx, &model());
        });
        assert!(intents.is_empty());
    }
}
