//! Main application module

mod keyboard;
mod menus;
mod styles;

use eframe::egui;

use crate::assets::FsIconLibrary;
use crate::error::EditorResult;
use crate::state::scene::SceneGraph;
use crate::state::{EditorSession, EditorSettings};
use crate::ui::{properties, scene_tree, status_bar, toolbar, zone_dialog};
use crate::viewport::CanvasView;

/// Panel visibility toggles
pub struct PanelVisibility {
    pub scene_tree: bool,
    pub properties: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            scene_tree: true,
            properties: true,
        }
    }
}

/// Front-end state around the editing session
pub struct AppState {
    pub session: EditorSession,
    pub panels: PanelVisibility,
    /// Last rejected action, shown in the status bar
    pub notice: Option<String>,
    /// Hex field of the custom color window
    pub color_draft: String,
    pub show_settings_window: bool,
}

impl AppState {
    /// Keep the value of a successful action, remember the message of a failed one
    pub fn report<T>(&mut self, result: EditorResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.notice = None;
                Some(value)
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                None
            }
        }
    }
}

/// Main application
pub struct MissionMapApp {
    state: AppState,
    canvas: CanvasView,
    /// Last saved scene version (for autosave)
    last_saved_version: u64,
}

impl MissionMapApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: EditorSettings,
        initial_scene: Option<Vec<u8>>,
    ) -> Self {
        let icons = FsIconLibrary::new(settings.assets.icon_dir.clone());
        let mut session = EditorSession::new(settings, Box::new(icons));
        session.preload_icons();

        // Load initial scene: CLI argument takes priority, then autosave
        let mut notice = None;
        if let Some(bytes) = initial_scene {
            if let Err(e) = session.load_bytes(&bytes) {
                notice = Some(e.to_string());
            }
        } else if let Some(objects) = SceneGraph::load_autosave() {
            session.scene.restore(objects);
            tracing::info!("Loaded autosave scene");
        }

        styles::configure_styles(&cc.egui_ctx);

        let last_saved_version = session.scene.version();
        let color_draft = session.settings.palette.custom.color.to_hex();

        Self {
            state: AppState {
                session,
                panels: PanelVisibility::default(),
                notice,
                color_draft,
                show_settings_window: false,
            },
            canvas: CanvasView::new(),
            last_saved_version,
        }
    }
}

impl eframe::App for MissionMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Autosave scene if changed
        let current_version = self.state.session.scene.version();
        if current_version != self.last_saved_version {
            self.state.session.scene.autosave();
            self.state.session.settings.save();
            self.last_saved_version = current_version;
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::edit_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Drawing dialogs ──────────────────────────────────
        zone_dialog::show(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: toolbar ──────────────────────────────
        egui::SidePanel::left("toolbar")
            .default_width(170.0)
            .resizable(false)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("toolbar_scroll")
                    .show(ui, |ui| toolbar::show(ui, &mut self.state));
            });

        // ── Right panel: properties + scene tree ─────────────
        self.show_right_panel(ctx);

        // ── Central panel: canvas ────────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_gray(60)))
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .id_salt("canvas_scroll")
                    .show(ui, |ui| self.canvas.show(ui, &mut self.state));
            });
    }
}

impl MissionMapApp {
    fn show_right_panel(&mut self, ctx: &egui::Context) {
        let panels = &self.state.panels;
        if !panels.properties && !panels.scene_tree {
            return;
        }

        egui::SidePanel::right("right_panel")
            .default_width(260.0)
            .width_range(200.0..=420.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                if self.state.panels.properties {
                    properties::show(ui, &mut self.state);
                    ui.add_space(2.0);
                    ui.separator();
                    ui.add_space(2.0);
                }
                if self.state.panels.scene_tree {
                    scene_tree::show(ui, &mut self.state);
                }
            });
    }
}
