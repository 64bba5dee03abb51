//! Keyboard shortcut handling

use eframe::egui;

use super::AppState;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, delete, duplicate, group, ungroup) = ctx.input(|i| {
        let cmd = i.modifiers.command;
        let shift = i.modifiers.shift;
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            cmd && i.key_pressed(egui::Key::D),
            cmd && !shift && i.key_pressed(egui::Key::G),
            cmd && shift && i.key_pressed(egui::Key::G),
        )
    });

    // Escape cancels drawing, otherwise deselects
    if escape {
        let session = &mut state.session;
        if session.drawing.is_active() {
            session.cancel_drawing();
        } else {
            session.scene.selection.clear();
        }
    }
    if delete && !state.session.drawing.is_active() {
        state.session.delete_selected();
    }
    if duplicate {
        let result = state.session.duplicate_selected();
        state.report(result);
    }
    if group {
        let result = state.session.group_selected();
        state.report(result);
    }
    if ungroup {
        let result = state.session.ungroup_selected();
        state.report(result);
    }
}
