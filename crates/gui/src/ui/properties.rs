//! Properties panel for the selected object

use egui::Ui;
use kurbo::Vec2;

use crate::app::AppState;
use crate::state::scene::{controls_for, object_display_name, object_icon, short_id};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Properties");
    ui.separator();

    let count = state.session.scene.selection.count();
    let Some(obj) = state.session.active() else {
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            if count > 1 {
                ui.weak(format!("{count} objects selected"));
            } else {
                ui.weak("Select an object");
                ui.weak("to view its properties");
            }
        });
        return;
    };

    let id = obj.id.clone();
    let name = object_display_name(obj);
    let icon = object_icon(obj);
    let position = obj.position();
    let size = obj.bounds(kurbo::Affine::IDENTITY).size();
    let [a, b, ..] = obj.transform.as_coeffs();
    let angle = b.atan2(a).to_degrees();
    let controls = controls_for(obj);

    ui.horizontal(|ui| {
        ui.strong(icon);
        ui.strong(&name);
    });
    ui.add_space(4.0);

    let mut new_pos = position;
    let mut new_angle = angle;
    egui::Grid::new("object_props")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("ID:");
            ui.monospace(short_id(&id));
            ui.end_row();

            ui.label("X:");
            ui.add(egui::DragValue::new(&mut new_pos.x).speed(1.0).suffix(" px"));
            ui.end_row();

            ui.label("Y:");
            ui.add(egui::DragValue::new(&mut new_pos.y).speed(1.0).suffix(" px"));
            ui.end_row();

            ui.label("Size:");
            ui.label(format!("{:.0} × {:.0} px", size.width, size.height));
            ui.end_row();

            ui.label("Rotation:");
            ui.add_enabled(
                controls.rotatable,
                egui::DragValue::new(&mut new_angle).speed(1.0).suffix("°"),
            );
            ui.end_row();
        });

    if new_pos != position {
        let result = state.session.scene.translate(&id, new_pos - position);
        state.report(result);
    }
    if new_angle != angle {
        let result = state.session.scene.rotate(&id, (new_angle - angle).to_radians());
        state.report(result);
    }

    if let Some(fill) = state.session.active_fill() {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Fill:");
            let mut rgb = [fill.r, fill.g, fill.b];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                let hex = shared::Color::rgb(rgb[0], rgb[1], rgb[2]).to_hex();
                let result = state.session.set_fill(&hex);
                state.report(result);
            }
            ui.monospace(fill.to_hex());
        });
    }

    ui.add_space(6.0);
    if ui.small_button("Bring to front").clicked() {
        state.session.scene.bring_to_front(&id);
    }
    // Nudge by one grid step
    let unit = state.session.scene.grid_unit();
    ui.horizontal(|ui| {
        ui.label("Nudge:");
        for (label, delta) in [
            ("←", Vec2::new(-unit, 0.0)),
            ("→", Vec2::new(unit, 0.0)),
            ("↑", Vec2::new(0.0, -unit)),
            ("↓", Vec2::new(0.0, unit)),
        ] {
            if ui.small_button(label).clicked() {
                let result = state.session.scene.translate(&id, delta);
                state.report(result);
            }
        }
    });
}
