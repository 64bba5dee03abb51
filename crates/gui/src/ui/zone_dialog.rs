//! Modal windows of the zone drawing flow: classification, then the
//! custom color picker with live preview.

use eframe::egui;
use shared::Color;

use crate::app::AppState;
use crate::state::{DrawingPhase, ZoneChoice};

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    match state.session.drawing.phase() {
        DrawingPhase::AwaitingZoneClassification => classification_window(ctx, state),
        DrawingPhase::AwaitingColorSelection { color, opacity } => color_window(ctx, state, color, opacity),
        DrawingPhase::Idle | DrawingPhase::PlacingPoints => {}
    }
}

fn classification_window(ctx: &egui::Context, state: &mut AppState) {
    let mut choice = None;
    egui::Window::new("Zone type")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("What kind of zone is this?");
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Attacker").clicked() {
                    choice = Some(ZoneChoice::Attacker);
                }
                if ui.button("Defender").clicked() {
                    choice = Some(ZoneChoice::Defender);
                }
                if ui.button("Custom…").clicked() {
                    choice = Some(ZoneChoice::Custom);
                }
                if ui.button("Cancel").clicked() {
                    choice = Some(ZoneChoice::Cancel);
                }
            });
        });

    if let Some(choice) = choice {
        if choice == ZoneChoice::Custom {
            state.color_draft = state.session.settings.palette.custom.color.to_hex();
        }
        let result = state.session.classify(choice);
        state.report(result);
    }
}

fn color_window(ctx: &egui::Context, state: &mut AppState, color: Color, opacity: f64) {
    let mut confirm = false;
    let mut cancel = false;
    let mut picked = None;
    let mut new_opacity = opacity;
    let mut hex_committed = false;

    egui::Window::new("Zone color")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Color");
                let mut rgb = [color.r, color.g, color.b];
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    picked = Some(Color::rgb(rgb[0], rgb[1], rgb[2]));
                }
                let edit = ui.add(egui::TextEdit::singleline(&mut state.color_draft).desired_width(80.0));
                hex_committed = edit.lost_focus();
            });
            ui.horizontal(|ui| {
                ui.label("Opacity");
                ui.add(egui::Slider::new(&mut new_opacity, 0.0..=1.0));
            });
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                confirm = ui.button("Create zone").clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

    if cancel {
        state.session.cancel_drawing();
        return;
    }
    if let Some(c) = picked {
        state.color_draft = c.to_hex();
        let result = state.session.set_zone_color(c, new_opacity);
        state.report(result);
    } else if hex_committed {
        let hex = state.color_draft.clone();
        let result = state.session.update_zone_color(&hex, new_opacity);
        if state.report(result).is_none() {
            state.color_draft = color.to_hex();
        }
    } else if new_opacity != opacity {
        let result = state.session.set_zone_color(color, new_opacity);
        state.report(result);
    }
    if confirm {
        let result = state.session.confirm_custom_zone();
        state.report(result);
    }
}
