//! Canvas context menu

use egui::Ui;

use crate::app::AppState;
use crate::state::scene::object_display_name;

/// Show context menu for the object under the right click
pub fn show_context_menu(ui: &mut Ui, state: &mut AppState, obj_id: &str) {
    let Some(obj) = state.session.scene.get(obj_id) else {
        ui.weak("Nothing here");
        return;
    };
    ui.label(egui::RichText::new(object_display_name(obj)).strong());
    ui.separator();

    if ui.button("Duplicate").clicked() {
        let result = state.session.duplicate_selected();
        state.report(result);
        ui.close_menu();
    }
    if ui.button("Bring to front").clicked() {
        state.session.scene.bring_to_front(obj_id);
        ui.close_menu();
    }
    if state.session.can_ungroup() && ui.button("Ungroup").clicked() {
        let result = state.session.ungroup_selected();
        state.report(result);
        ui.close_menu();
    }
    if state.session.can_group() && ui.button("Group selection").clicked() {
        let result = state.session.group_selected();
        state.report(result);
        ui.close_menu();
    }
    ui.separator();
    if ui.button("Delete").clicked() {
        state.session.delete_selected();
        ui.close_menu();
    }
}
