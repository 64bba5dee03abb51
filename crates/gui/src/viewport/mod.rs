//! Canvas panel: scene raster, overlays and pointer interaction

mod context_menu;
mod overlays;
mod texture;

use egui::Ui;
use kurbo::{Affine, Point};
use shared::ObjectId;

use crate::app::AppState;
use crate::state::scene::{handle_at, Handle};
use overlays::CanvasFrame;
use texture::SceneTexture;

/// What a primary-button drag is doing
enum DragMode {
    Move,
    Resize(Handle),
    Rotate { center: Point, angle: f64 },
}

struct DragState {
    ids: Vec<ObjectId>,
    mode: DragMode,
    last: Point,
}

/// Canvas view
pub struct CanvasView {
    texture: SceneTexture,
    drag: Option<DragState>,
    /// Object ID picked by right-click (for context menu)
    context_target: Option<ObjectId>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self {
            texture: SceneTexture::default(),
            drag: None,
            context_target: None,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let canvas = &state.session.settings.canvas;
        let size = egui::vec2(canvas.width() as f32, canvas.height() as f32);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let frame = CanvasFrame { origin: rect.min };

        // ── Pointer handling ─────────────────────────────
        self.handle_drag(&response, frame, state);
        self.handle_click(&response, ui, frame, state);
        self.handle_right_click(&response, frame, state);

        if let Some(target) = self.context_target.clone() {
            response.context_menu(|ui| context_menu::show_context_menu(ui, state, &target));
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // ── Scene raster ─────────────────────────────────
        let painter = ui.painter_at(rect);
        if let Some(texture) = self.texture.get(ui.ctx(), &state.session) {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
        }

        // ── Overlays ─────────────────────────────────────
        let hover = response.hover_pos().map(|p| frame.to_canvas(p));
        overlays::draw_selection(&painter, frame, &state.session);
        overlays::draw_drawing_cursor(&painter, frame, &state.session, hover);
    }

    fn handle_click(&mut self, response: &egui::Response, ui: &Ui, frame: CanvasFrame, state: &mut AppState) {
        if !response.clicked() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let p = frame.to_canvas(pos);
        if state.session.drawing.is_active() {
            state.session.click(p);
            return;
        }
        let additive = ui.input(|i| i.modifiers.command || i.modifiers.shift);
        state.session.select_at(p, additive);
    }

    fn handle_right_click(&mut self, response: &egui::Response, frame: CanvasFrame, state: &mut AppState) {
        if !response.secondary_clicked() || state.session.drawing.is_active() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let p = frame.to_canvas(pos);
        let hit = state.session.scene.hit_test(p).map(|o| o.id.clone());
        if let Some(id) = &hit {
            if !state.session.scene.selection.is_selected(id) {
                state.session.scene.selection.select(id.clone());
            }
        }
        self.context_target = hit;
    }

    fn handle_drag(&mut self, response: &egui::Response, frame: CanvasFrame, state: &mut AppState) {
        if state.session.drawing.is_active() {
            self.drag = None;
            return;
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let start = response
                .interact_pointer_pos()
                .map(|p| frame.to_canvas(p - response.drag_delta()));
            self.drag = start.and_then(|p| self.begin_drag(p, state));
        }

        if let Some(drag) = &mut self.drag {
            if response.dragged_by(egui::PointerButton::Primary) {
                if let Some(pos) = response.interact_pointer_pos() {
                    let p = frame.to_canvas(pos);
                    apply_drag(drag, p, state);
                }
            }
        }

        if response.drag_stopped() {
            self.drag = None;
        }
    }

    /// Pick a handle of the active object, else the object under the pointer
    fn begin_drag(&self, p: Point, state: &mut AppState) -> Option<DragState> {
        let session = &mut state.session;
        let radius = session.settings.style.corner_size as f64;
        if let Some(obj) = session.active() {
            if let Some(handle) = handle_at(obj, p, radius) {
                let mode = if handle == Handle::Rotate {
                    let center = obj.bounds(Affine::IDENTITY).center();
                    DragMode::Rotate {
                        center,
                        angle: (p - center).atan2(),
                    }
                } else {
                    DragMode::Resize(handle)
                };
                return Some(DragState {
                    ids: vec![obj.id.clone()],
                    mode,
                    last: p,
                });
            }
        }

        let hit = session.scene.hit_test(p)?.id.clone();
        if !session.scene.selection.is_selected(&hit) {
            session.scene.selection.select(hit.clone());
        }
        Some(DragState {
            ids: session.scene.selection.all().to_vec(),
            mode: DragMode::Move,
            last: p,
        })
    }
}

fn apply_drag(drag: &mut DragState, p: Point, state: &mut AppState) {
    let delta = p - drag.last;
    if delta.hypot2() == 0.0 {
        return;
    }
    drag.last = p;
    let scene = &mut state.session.scene;
    let result = match &mut drag.mode {
        DragMode::Move => drag.ids.iter().try_for_each(|id| scene.translate(id, delta)),
        DragMode::Resize(handle) => match drag.ids.first() {
            Some(id) => scene.resize(id, *handle, delta),
            None => Ok(()),
        },
        DragMode::Rotate { center, angle } => {
            let now = (p - *center).atan2();
            let step = now - *angle;
            *angle = now;
            match drag.ids.first() {
                Some(id) => scene.rotate(id, step),
                None => Ok(()),
            }
        }
    };
    state.report(result);
}
