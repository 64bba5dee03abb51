//! PNG export of the canvas.
//!
//! Paints the scene the way it is displayed (grid and center marker only
//! when visible) into a `tiny_skia::Pixmap`. Label and measurement text is
//! rasterized with `rusttype` from the embedded Hack face.

use kurbo::{Affine, Point, Vec2};
use once_cell::sync::Lazy;
use rusttype::{point, Font, Scale};
use shared::{Axis, Color, IconKey, Label, MeasurementAid, ObjectKind, SceneObject, Zone};
use tiny_skia::{
    ColorU8, FillRule, IntSize, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::assets::{IconAsset, IconLibrary};
use crate::error::{EditorError, EditorResult};
use crate::state::scene::SceneGraph;
use crate::state::settings::EditorSettings;

/// Table background
pub const BACKGROUND: Color = Color::rgb(0xff, 0xf8, 0xe7);
const MINOR_GRID: Color = Color::rgb(0xdd, 0xdd, 0xdd);
const MAJOR_GRID: Color = Color::rgb(0xaa, 0xaa, 0xaa);
const ARROW_SIZE: f32 = 8.0;
const MEASUREMENT_FONT_SIZE: f32 = 13.0;

static FONT: Lazy<Option<Font<'static>>> =
    Lazy::new(|| Font::try_from_bytes(epaint_default_fonts::HACK_REGULAR));

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn paint(color: Color, opacity: f64) -> Paint<'static> {
    let mut paint = Paint::default();
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        ..Default::default()
    }
}

/// Rasterize the scene and encode it as PNG
pub fn render_png(
    scene: &SceneGraph,
    settings: &EditorSettings,
    icons: &dyn IconLibrary,
) -> EditorResult<Vec<u8>> {
    let pixmap = render(scene, settings, icons)?;
    pixmap
        .encode_png()
        .map_err(|e| EditorError::ExportFailure(e.to_string()))
}

/// Rasterize the scene
pub fn render(scene: &SceneGraph, settings: &EditorSettings, icons: &dyn IconLibrary) -> EditorResult<Pixmap> {
    let canvas = &settings.canvas;
    let (w, h) = (canvas.width().round() as u32, canvas.height().round() as u32);
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| EditorError::ExportFailure(format!("invalid canvas size {w}x{h}")))?;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        BACKGROUND.r,
        BACKGROUND.g,
        BACKGROUND.b,
        255,
    ));

    if settings.view.show_grid {
        draw_grid(&mut pixmap, scene);
    }
    let marker = scene.center_marker();
    if marker.visible {
        draw_center_marker(&mut pixmap, marker.position);
    }
    for obj in scene.all() {
        draw_object(&mut pixmap, obj, Affine::IDENTITY, icons);
    }
    tracing::info!("Rendered {}x{} export", w, h);
    Ok(pixmap)
}

fn draw_grid(pixmap: &mut Pixmap, scene: &SceneGraph) {
    for major in [false, true] {
        let mut pb = PathBuilder::new();
        for line in scene.grid_lines().iter().filter(|l| l.major == major) {
            pb.move_to(line.from.x as f32, line.from.y as f32);
            pb.line_to(line.to.x as f32, line.to.y as f32);
        }
        let Some(path) = pb.finish() else {
            continue;
        };
        let (color, width) = if major { (MAJOR_GRID, 2.0) } else { (MINOR_GRID, 1.0) };
        pixmap.stroke_path(&path, &paint(color, 1.0), &stroke(width), Transform::identity(), None);
    }
}

fn draw_center_marker(pixmap: &mut Pixmap, at: Point) {
    let (x, y) = (at.x as f32, at.y as f32);
    let mut pb = PathBuilder::new();
    pb.push_circle(x, y, 10.0);
    pb.move_to(x - 15.0, y);
    pb.line_to(x + 15.0, y);
    pb.move_to(x, y - 15.0);
    pb.line_to(x, y + 15.0);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint(Color::RED, 1.0), &stroke(2.0), Transform::identity(), None);
    }
}

fn draw_object(pixmap: &mut Pixmap, obj: &SceneObject, parent: Affine, icons: &dyn IconLibrary) {
    let world = parent * obj.transform;
    match &obj.kind {
        ObjectKind::AttackerZone(zone)
        | ObjectKind::DefenderZone(zone)
        | ObjectKind::CustomZone(zone)
        | ObjectKind::ZonePreview(zone) => draw_zone(pixmap, zone, world),
        ObjectKind::ObjectiveMarker(m) | ObjectKind::StrikeForceMarker(m) => {
            draw_icon(pixmap, m.icon.key, m.icon.width, m.icon.height, 1.0, world, icons)
        }
        ObjectKind::AttackerUnit(u) | ObjectKind::DefenderUnit(u) => {
            draw_icon(pixmap, u.icon.key, u.icon.width, u.icon.height, u.opacity, world, icons)
        }
        ObjectKind::MeasurementGroup(aid) => draw_measurement(pixmap, aid, world),
        ObjectKind::ZoneLabel(label) => {
            let b = obj.local_bounds();
            if let Some(rect) = Rect::from_ltrb(b.x0 as f32, b.y0 as f32, b.x1 as f32, b.y1 as f32) {
                pixmap.fill_rect(rect, &paint(Color::WHITE, 0.8), to_transform(world), None);
            }
            draw_label(pixmap, label, world);
        }
        ObjectKind::Group(group) => {
            for child in &group.children {
                draw_object(pixmap, child, world, icons);
            }
        }
        ObjectKind::DrawingMarker(m) => {
            let mut pb = PathBuilder::new();
            pb.push_circle(0.0, 0.0, m.radius as f32);
            if let Some(path) = pb.finish() {
                let t = to_transform(world);
                pixmap.fill_path(&path, &paint(Color::WHITE, 1.0), FillRule::Winding, t, None);
                pixmap.stroke_path(&path, &paint(m.color, 1.0), &stroke(2.0), t, None);
            }
        }
        ObjectKind::DrawingLine(l) => {
            let mut pb = PathBuilder::new();
            pb.move_to(l.from.x as f32, l.from.y as f32);
            pb.line_to(l.to.x as f32, l.to.y as f32);
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint(l.color, 1.0), &stroke(2.0), to_transform(world), None);
            }
        }
    }
}

fn draw_zone(pixmap: &mut Pixmap, zone: &Zone, world: Affine) {
    let mut pb = PathBuilder::new();
    for (i, v) in zone.shape.vertices().iter().enumerate() {
        if i == 0 {
            pb.move_to(v.x as f32, v.y as f32);
        } else {
            pb.line_to(v.x as f32, v.y as f32);
        }
    }
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(
            &path,
            &paint(zone.fill, zone.opacity),
            FillRule::Winding,
            to_transform(world),
            None,
        );
    }
}

/// Premultiplied pixmap for an icon
fn icon_pixmap(asset: &IconAsset) -> Option<Pixmap> {
    let data = asset
        .rgba
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3] as u16;
            let pm = |c: u8| ((c as u16 * a + 127) / 255) as u8;
            [pm(px[0]), pm(px[1]), pm(px[2]), px[3]]
        })
        .collect();
    Pixmap::from_vec(data, IntSize::from_wh(asset.width, asset.height)?)
}

fn draw_icon(
    pixmap: &mut Pixmap,
    key: IconKey,
    width: u32,
    height: u32,
    opacity: f64,
    world: Affine,
    icons: &dyn IconLibrary,
) {
    let (w, h) = (width as f64, height as f64);
    let origin = world * Affine::translate((-w / 2.0, -h / 2.0));
    match icons.cached(key).and_then(icon_pixmap) {
        Some(icon) => {
            // Stretch to the footprint recorded on the object
            let fit = Affine::scale_non_uniform(w / icon.width() as f64, h / icon.height() as f64);
            let paint = PixmapPaint {
                opacity: opacity.clamp(0.0, 1.0) as f32,
                ..Default::default()
            };
            pixmap.draw_pixmap(0, 0, icon.as_ref(), &paint, to_transform(origin * fit), None);
        }
        None => {
            // Icon not loaded: outline its footprint
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, w as f32, h as f32) {
                let path = PathBuilder::from_rect(rect);
                pixmap.stroke_path(&path, &paint(Color::BLACK, opacity), &stroke(1.0), to_transform(origin), None);
            }
        }
    }
}

fn draw_measurement(pixmap: &mut Pixmap, aid: &MeasurementAid, world: Affine) {
    let len = aid.length as f32;
    let s = ARROW_SIZE;
    let mut pb = PathBuilder::new();
    match aid.axis {
        Axis::Horizontal => {
            pb.move_to(0.0, 0.0);
            pb.line_to(len, 0.0);
            // arrowheads
            pb.move_to(s, -s / 2.0);
            pb.line_to(0.0, 0.0);
            pb.line_to(s, s / 2.0);
            pb.move_to(len - s, -s / 2.0);
            pb.line_to(len, 0.0);
            pb.line_to(len - s, s / 2.0);
        }
        Axis::Vertical => {
            pb.move_to(0.0, 0.0);
            pb.line_to(0.0, len);
            pb.move_to(-s / 2.0, s);
            pb.line_to(0.0, 0.0);
            pb.line_to(s / 2.0, s);
            pb.move_to(-s / 2.0, len - s);
            pb.line_to(0.0, len);
            pb.line_to(s / 2.0, len - s);
        }
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint(aid.color, 1.0), &stroke(2.0), to_transform(world), None);
    }

    // Text beside the line midpoint, kept upright
    let end = aid.end();
    let mid = world * Point::new(end.x / 2.0, end.y / 2.0);
    let (offset, align) = match aid.axis {
        Axis::Horizontal => (Vec2::new(0.0, -12.0), (0.5, 1.0)),
        Axis::Vertical => (Vec2::new(14.0, 0.0), (0.0, 0.5)),
    };
    if let Some(text) = text_pixmap(&aid.label, MEASUREMENT_FONT_SIZE, aid.color) {
        draw_text(pixmap, &text, Affine::translate((mid + offset).to_vec2()), align);
    }
}

fn draw_label(pixmap: &mut Pixmap, label: &Label, world: Affine) {
    if let Some(text) = text_pixmap(&label.text, label.font_size as f32, label.color) {
        draw_text(pixmap, &text, world, (0.5, 0.5));
    }
}

/// Blit rendered text so that `align` (fractions of its width and height)
/// lands on the origin of `at`
fn draw_text(pixmap: &mut Pixmap, text: &Pixmap, at: Affine, align: (f64, f64)) {
    let shift = Affine::translate((
        -align.0 * text.width() as f64,
        -align.1 * text.height() as f64,
    ));
    pixmap.draw_pixmap(
        0,
        0,
        text.as_ref(),
        &PixmapPaint::default(),
        to_transform(at * shift),
        None,
    );
}

/// Rasterize one line of text into a tight pixmap. `None` for empty text.
fn text_pixmap(text: &str, size: f32, color: Color) -> Option<Pixmap> {
    let font = FONT.as_ref()?;
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
    let last = glyphs.last()?;
    let width = last.position().x + last.unpositioned().h_metrics().advance_width;
    let height = v_metrics.ascent - v_metrics.descent;
    let mut out = Pixmap::new(width.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32)?;

    let (w, h) = (out.width(), out.height());
    let pixels = out.pixels_mut();
    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let (px, py) = (gx as i32 + bb.min.x, gy as i32 + bb.min.y);
            if px < 0 || py < 0 || px as u32 >= w || py as u32 >= h {
                return;
            }
            let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let idx = (py as u32 * w + px as u32) as usize;
            pixels[idx] = ColorU8::from_rgba(color.r, color.g, color.b, alpha).premultiply();
        });
    }
    Some(out)
}
