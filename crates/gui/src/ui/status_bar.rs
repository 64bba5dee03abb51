use egui::Ui;

use crate::app::AppState;
use crate::geometry::format_inches;
use crate::state::DrawingPhase;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let session = &state.session;
        ui.weak(format!("Objects: {}", session.scene.user_object_count()));

        ui.separator();

        match session.drawing.phase() {
            DrawingPhase::PlacingPoints => {
                let pts = session.drawing.points().len();
                let hint = match session.settings.drawing.closure.auto_close_at() {
                    Some(n) => format!("Drawing zone: point {} of {n}", pts + 1),
                    None if pts >= 3 => "Drawing zone: click the first point to close".to_string(),
                    None => format!("Drawing zone: {pts} points"),
                };
                ui.colored_label(egui::Color32::from_rgb(200, 60, 0), hint);
                ui.separator();
                ui.weak("Esc to cancel");
            }
            DrawingPhase::AwaitingZoneClassification => {
                ui.label("Choose the zone type");
                if let Some(r) = session.drawing.outline_bounds() {
                    let unit = session.settings.canvas.grid_unit;
                    ui.weak(format!(
                        "{} × {}",
                        format_inches(r.width(), unit),
                        format_inches(r.height(), unit)
                    ));
                }
            }
            DrawingPhase::AwaitingColorSelection { .. } => {
                ui.label("Pick a zone color");
            }
            DrawingPhase::Idle => {
                let sel = session.scene.selection.count();
                if sel > 0 {
                    ui.label(format!("Selected: {sel}"));
                } else {
                    ui.weak("Ready");
                }
            }
        }

        if let Some(notice) = &state.notice {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(190, 30, 30), notice.as_str());
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("Mission Map v", env!("CARGO_PKG_VERSION")));
        });
    });
}
