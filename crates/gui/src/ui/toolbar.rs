//! Left toolbar: every placement and editing action of the editor

use egui::Ui;
use shared::{Axis, Side, ZoneKind};

use crate::app::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let drawing = state.session.drawing.is_active();

    // ── Zones ──
    ui.strong("Zones");
    if drawing {
        if ui.button("Cancel drawing").on_hover_text("Esc").clicked() {
            state.session.cancel_drawing();
        }
    } else if ui
        .button("Draw zone")
        .on_hover_text("Click grid points to outline a zone")
        .clicked()
    {
        state.session.start_drawing();
    }
    ui.horizontal(|ui| {
        if ui.button("Attacker 12×6").clicked() {
            state.session.add_deployment_zone(ZoneKind::Attacker, None);
        }
        if ui.button("Defender 12×6").clicked() {
            state.session.add_deployment_zone(ZoneKind::Defender, None);
        }
    });
    ui.horizontal(|ui| {
        if ui
            .button("Attacker edge")
            .on_hover_text("Left quarter of the table")
            .clicked()
        {
            state.session.add_deployment_strip(Side::Attacker);
        }
        if ui
            .button("Defender edge")
            .on_hover_text("Right quarter of the table")
            .clicked()
        {
            state.session.add_deployment_strip(Side::Defender);
        }
    });
    ui.add_space(6.0);

    // ── Markers ──
    ui.strong("Markers");
    ui.horizontal(|ui| {
        if ui.button("Objective").clicked() {
            let result = state.session.add_objective(None);
            state.report(result);
        }
        if ui.button("Strike force").clicked() {
            let result = state.session.add_strike_force(None);
            state.report(result);
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Attacker unit").clicked() {
            let result = state.session.add_unit(Side::Attacker, None);
            state.report(result);
        }
        if ui.button("Defender unit").clicked() {
            let result = state.session.add_unit(Side::Defender, None);
            state.report(result);
        }
    });
    ui.add_space(6.0);

    // ── Measurement ──
    ui.strong("Measure");
    ui.horizontal(|ui| {
        if ui.button("↔ Horizontal").clicked() {
            state.session.add_measurement(Axis::Horizontal, None);
        }
        if ui.button("↕ Vertical").clicked() {
            state.session.add_measurement(Axis::Vertical, None);
        }
    });
    ui.add_space(6.0);

    // ── Selection ──
    ui.strong("Selection");
    edit_buttons(ui, state);
    ui.add_space(6.0);
    text_and_opacity(ui, state);
    ui.add_space(6.0);

    // ── View ──
    ui.strong("View");
    let marker = state.session.scene.center_marker().visible;
    let label = if marker { "Hide center" } else { "Show center" };
    if ui.button(label).clicked() {
        state.session.toggle_center_marker();
    }

    ui.separator();
    if ui.button("Clear all").clicked() {
        state.session.clear();
    }
}

fn edit_buttons(ui: &mut Ui, state: &mut AppState) {
    let session = &state.session;
    let (can_group, can_ungroup, can_duplicate, can_delete) = (
        session.can_group(),
        session.can_ungroup(),
        session.can_duplicate(),
        session.can_delete() && !session.drawing.is_active(),
    );
    ui.horizontal(|ui| {
        if ui.add_enabled(can_group, egui::Button::new("Group")).clicked() {
            let result = state.session.group_selected();
            state.report(result);
        }
        if ui.add_enabled(can_ungroup, egui::Button::new("Ungroup")).clicked() {
            let result = state.session.ungroup_selected();
            state.report(result);
        }
    });
    ui.horizontal(|ui| {
        if ui.add_enabled(can_duplicate, egui::Button::new("Duplicate")).clicked() {
            let result = state.session.duplicate_selected();
            state.report(result);
        }
        if ui.add_enabled(can_delete, egui::Button::new("Delete")).clicked() {
            state.session.delete_selected();
        }
    });
}

/// Zone/measurement text and the opacity slider, for the single selection
fn text_and_opacity(ui: &mut Ui, state: &mut AppState) {
    if state.session.can_edit_text() {
        let mut text = state.session.active_text().unwrap_or_default();
        ui.label("Text");
        let edit = ui.add(egui::TextEdit::singleline(&mut text).hint_text("Zone label"));
        if edit.changed() {
            let result = state.session.set_text(&text);
            state.report(result);
        }
    }

    if state.session.can_adjust_opacity() {
        if let Some(mut opacity) = state.session.active_opacity() {
            ui.label("Opacity");
            if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0)).changed() {
                let result = state.session.set_opacity(opacity);
                state.report(result);
            }
        }
    }
}
