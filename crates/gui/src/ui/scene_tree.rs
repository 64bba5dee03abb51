//! Scene tree panel: placed objects, top of the z-order first

use egui::Ui;
use shared::{ObjectId, ObjectKind, SceneObject};

use crate::app::AppState;
use crate::state::scene::{object_display_name, object_icon};

/// Row data collected up front to avoid borrow conflicts
struct Row {
    id: ObjectId,
    label: String,
    children: Vec<String>,
}

fn row(obj: &SceneObject) -> Row {
    let children = match &obj.kind {
        ObjectKind::Group(group) => group
            .children
            .iter()
            .map(|c| format!("{} {}", object_icon(c), object_display_name(c)))
            .collect(),
        _ => Vec::new(),
    };
    Row {
        id: obj.id.clone(),
        label: format!("{} {}", object_icon(obj), object_display_name(obj)),
        children,
    }
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let rows: Vec<Row> = state
        .session
        .scene
        .all()
        .iter()
        .rev()
        .filter(|o| !o.is_transient())
        .map(row)
        .collect();

    ui.horizontal(|ui| {
        ui.heading("Objects");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", rows.len()));
        });
    });
    ui.separator();

    if rows.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| ui.weak("The map is empty"));
        return;
    }

    let locked = state.session.scene.selection.is_locked();
    egui::ScrollArea::vertical()
        .id_salt("scene_tree_scroll")
        .show(ui, |ui| {
            for row in &rows {
                let selected = state.session.scene.selection.is_selected(&row.id);
                let response = if row.children.is_empty() {
                    ui.selectable_label(selected, row.label.as_str())
                } else {
                    let header = egui::CollapsingHeader::new(row.label.as_str())
                        .id_salt(&row.id)
                        .default_open(false)
                        .show(ui, |ui| {
                            for child in &row.children {
                                ui.weak(child.as_str());
                            }
                        });
                    header.header_response
                };

                if response.clicked() && !locked {
                    let selection = &mut state.session.scene.selection;
                    if ui.input(|i| i.modifiers.command) {
                        selection.toggle(row.id.clone());
                    } else {
                        selection.select(row.id.clone());
                    }
                }
            }
        });
}
