//! Canvas overlays painted with egui on top of the scene raster: selection
//! chrome and the drawing cursor.

use egui::{Color32, Painter, Pos2, Stroke};
use kurbo::{Affine, Point};
use shared::Color;

use crate::state::scene::{handle_points, Handle};
use crate::state::settings::{CornerStyle, StyleConfig};
use crate::state::{DrawingPhase, EditorSession};

/// Canvas-to-screen mapping
#[derive(Clone, Copy)]
pub struct CanvasFrame {
    pub origin: Pos2,
}

impl CanvasFrame {
    pub fn to_screen(&self, p: Point) -> Pos2 {
        Pos2::new(self.origin.x + p.x as f32, self.origin.y + p.y as f32)
    }

    pub fn to_canvas(&self, p: Pos2) -> Point {
        Point::new((p.x - self.origin.x) as f64, (p.y - self.origin.y) as f64)
    }
}

fn color32(c: Color) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

/// Bounding boxes of the selection; handles on the single active object
pub fn draw_selection(painter: &Painter, frame: CanvasFrame, session: &EditorSession) {
    let style = &session.settings.style;
    let border = Stroke::new(1.5, color32(style.border_color));
    for id in session.scene.selection.all() {
        let Some(obj) = session.scene.get(id) else {
            continue;
        };
        let b = obj.bounds(Affine::IDENTITY);
        let rect = egui::Rect::from_two_pos(
            frame.to_screen(Point::new(b.x0, b.y0)),
            frame.to_screen(Point::new(b.x1, b.y1)),
        );
        painter.rect_stroke(rect, 0.0, border, egui::StrokeKind::Outside);
    }

    if session.drawing.is_active() {
        return;
    }
    if let Some(obj) = session.active() {
        let top = obj.bounds(Affine::IDENTITY);
        for (handle, at) in handle_points(obj) {
            let pos = frame.to_screen(at);
            if handle == Handle::Rotate {
                let top_mid = frame.to_screen(Point::new(top.center().x, top.y0));
                painter.line_segment([top_mid, pos], border);
            }
            draw_handle(painter, pos, style);
        }
    }
}

fn draw_handle(painter: &Painter, pos: Pos2, style: &StyleConfig) {
    let fill = if style.transparent_corners {
        Color32::TRANSPARENT
    } else {
        color32(style.corner_color)
    };
    let stroke = Stroke::new(1.0, color32(style.border_color));
    let half = style.corner_size / 2.0;
    match style.corner_style {
        CornerStyle::Circle => {
            painter.circle(pos, half, fill, stroke);
        }
        CornerStyle::Rect => {
            let rect = egui::Rect::from_center_size(pos, egui::vec2(style.corner_size, style.corner_size));
            painter.rect(rect, 0.0, fill, stroke, egui::StrokeKind::Middle);
        }
    }
}

/// Snapped cursor and rubber band while placing zone points
pub fn draw_drawing_cursor(painter: &Painter, frame: CanvasFrame, session: &EditorSession, hover: Option<Point>) {
    if session.drawing.phase() != DrawingPhase::PlacingPoints {
        return;
    }
    let Some(hover) = hover else {
        return;
    };
    let style = &session.settings.style;
    let snapped = session.settings.canvas.snap(hover);
    let color = color32(style.draft_color);
    let pos = frame.to_screen(snapped);
    if let Some(&last) = session.drawing.points().last() {
        painter.line_segment([frame.to_screen(last), pos], Stroke::new(1.0, color.gamma_multiply(0.6)));
    }
    painter.circle_stroke(pos, style.draft_marker_radius as f32, Stroke::new(1.5, color));
}
