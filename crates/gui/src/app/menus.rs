//! Application menu bar and settings window

use eframe::egui;

use super::AppState;
use crate::state::settings::ZoneStyle;
use crate::state::{ClosurePolicy, EditorSettings};

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("File", |ui| {
        if ui.button("New map").clicked() {
            state.session.clear();
            ui.close_menu();
        }
        if ui.button("Open…").clicked() {
            ui.close_menu();
            open_scene(state);
        }
        if ui.button("Save…").clicked() {
            ui.close_menu();
            save_scene(state);
        }
        ui.separator();
        if ui.button("Export PNG…").clicked() {
            ui.close_menu();
            export_png(state);
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_scene(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Open map")
        .add_filter("JSON", &["json"])
        .pick_file()
    else {
        return;
    };
    match std::fs::read(&path) {
        Ok(bytes) => {
            let result = state.session.load_bytes(&bytes);
            if state.report(result).is_some() {
                tracing::info!("Loaded scene from {}", path.display());
            }
        }
        Err(e) => {
            tracing::error!("Failed to read file: {e}");
            state.notice = Some(format!("cannot read {}: {e}", path.display()));
        }
    }
}

fn save_scene(state: &mut AppState) {
    let bytes = match state.session.save_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            state.notice = Some(e.to_string());
            return;
        }
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save map")
        .add_filter("JSON", &["json"])
        .set_file_name("mission.json")
        .save_file()
    else {
        return;
    };
    if let Err(e) = std::fs::write(&path, bytes) {
        tracing::error!("Failed to write scene: {e}");
        state.notice = Some(format!("cannot write {}: {e}", path.display()));
    } else {
        tracing::info!("Saved scene to {}", path.display());
    }
}

fn export_png(state: &mut AppState) {
    let result = state.session.export_png();
    let Some(png) = state.report(result) else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export map image")
        .add_filter("PNG", &["png"])
        .set_file_name("mission.png")
        .save_file()
    else {
        return;
    };
    if let Err(e) = std::fs::write(&path, png) {
        tracing::error!("Failed to write PNG: {e}");
        state.notice = Some(format!("cannot write {}: {e}", path.display()));
    } else {
        tracing::info!("Exported map to {}", path.display());
    }
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("Edit", |ui| {
        let session = &state.session;
        let (can_group, can_ungroup, can_duplicate, can_delete) = (
            session.can_group(),
            session.can_ungroup(),
            session.can_duplicate(),
            session.can_delete() && !session.drawing.is_active(),
        );
        if ui
            .add_enabled(can_group, egui::Button::new("Group").shortcut_text("Ctrl+G"))
            .clicked()
        {
            let result = state.session.group_selected();
            state.report(result);
            ui.close_menu();
        }
        if ui
            .add_enabled(can_ungroup, egui::Button::new("Ungroup").shortcut_text("Ctrl+Shift+G"))
            .clicked()
        {
            let result = state.session.ungroup_selected();
            state.report(result);
            ui.close_menu();
        }
        ui.separator();
        if ui
            .add_enabled(can_duplicate, egui::Button::new("Duplicate").shortcut_text("Ctrl+D"))
            .clicked()
        {
            let result = state.session.duplicate_selected();
            state.report(result);
            ui.close_menu();
        }
        if ui
            .add_enabled(can_delete, egui::Button::new("Delete").shortcut_text("Del"))
            .clicked()
        {
            state.session.delete_selected();
            ui.close_menu();
        }
        ui.separator();
        if ui.button("Deselect all").clicked() {
            state.session.scene.selection.clear();
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("View", |ui| {
        ui.checkbox(&mut state.panels.properties, "Properties");
        ui.checkbox(&mut state.panels.scene_tree, "Scene tree");
        ui.separator();
        let mut grid = state.session.settings.view.show_grid;
        if ui.checkbox(&mut grid, "Grid").changed() {
            state.session.set_grid_visible(grid);
        }
        let mut marker = state.session.scene.center_marker().visible;
        if ui.checkbox(&mut marker, "Center marker").changed() {
            state.session.toggle_center_marker();
        }
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("Settings", |ui| {
        if ui.button("Preferences…").clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new("Preferences")
        .open(&mut open)
        .resizable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            show_drawing_settings(ui, &mut state.session.settings);
            show_palette_settings(ui, &mut state.session.settings);
            show_settings_buttons(ui, state);
        });
    state.show_settings_window = open;
}

fn show_drawing_settings(ui: &mut egui::Ui, settings: &mut EditorSettings) {
    ui.heading("Zone drawing");
    let closure = &mut settings.drawing.closure;
    let mut explicit = *closure == ClosurePolicy::ExplicitClose;
    ui.horizontal(|ui| {
        ui.radio_value(&mut explicit, false, "Close after");
        let mut vertices = closure.auto_close_at().unwrap_or(3);
        let drag = ui.add_enabled(
            !explicit,
            egui::DragValue::new(&mut vertices).range(3..=32).suffix(" points"),
        );
        if drag.changed() {
            *closure = ClosurePolicy::auto_close(vertices);
        }
    });
    ui.radio_value(&mut explicit, true, "Click the first point to close");
    if explicit != (*closure == ClosurePolicy::ExplicitClose) {
        *closure = if explicit {
            ClosurePolicy::ExplicitClose
        } else {
            ClosurePolicy::auto_close(3)
        };
    }
    ui.add_space(10.0);
}

fn zone_style_row(ui: &mut egui::Ui, label: &str, style: &mut ZoneStyle) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = [style.color.r, style.color.g, style.color.b];
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            style.color = shared::Color::rgb(rgb[0], rgb[1], rgb[2]);
        }
        ui.add(egui::Slider::new(&mut style.opacity, 0.0..=1.0).text("opacity"));
    });
}

fn show_palette_settings(ui: &mut egui::Ui, settings: &mut EditorSettings) {
    ui.heading("Zone colors");
    zone_style_row(ui, "Attacker", &mut settings.palette.attacker);
    zone_style_row(ui, "Defender", &mut settings.palette.defender);
    zone_style_row(ui, "Custom", &mut settings.palette.custom);
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            state.session.settings.save();
        }
        if ui.button("Reset").clicked() {
            let defaults = EditorSettings::default();
            let settings = &mut state.session.settings;
            settings.drawing = defaults.drawing;
            settings.palette = defaults.palette;
        }
        if ui.button("Close").clicked() {
            state.show_settings_window = false;
        }
    });
}
