//! Object factories
//!
//! Each factory returns a fully configured `SceneObject` with a fresh ID.
//! Without an explicit position objects land on the table center.
//! Interactivity (handles, rotation) is derived from the variant, see
//! [`crate::state::scene::controls_for`].

use kurbo::{Affine, Point, Vec2};
use shared::{
    Axis, Color, DrawingLine, DrawingMarker, IconRef, Label, Marker, MeasurementAid, ObjectId,
    ObjectKind, SceneObject, Side, UnitIcon, Zone, ZoneKind, ZoneShape,
};

use crate::error::{EditorError, EditorResult};
use crate::geometry::format_inches;
use crate::state::settings::{CanvasSpec, Palette, StyleConfig, ZoneStyle};

/// Deployment rectangle size in inches
pub const DEPLOYMENT_WIDTH_UNITS: f64 = 12.0;
pub const DEPLOYMENT_HEIGHT_UNITS: f64 = 6.0;
/// Default measurement aid length in inches
pub const MEASUREMENT_UNITS: f64 = 5.0;
/// Strike-force icons are always drawn at half size
pub const STRIKE_FORCE_SCALE: f64 = 0.5;

pub fn new_object_id() -> ObjectId {
    uuid::Uuid::new_v4().to_string()
}

// ── Zones ───────────────────────────────────────────────────────

/// Polygon zone from clicked points (kept in click order).
pub fn zone_from_points(kind: ZoneKind, points: &[Point], style: ZoneStyle) -> EditorResult<SceneObject> {
    if points.len() < 3 {
        return Err(EditorError::InvalidGeometry {
            vertices: points.len(),
        });
    }
    Ok(SceneObject::new(
        new_object_id(),
        ObjectKind::zone(
            kind,
            Zone {
                shape: ZoneShape::Polygon {
                    vertices: points.to_vec(),
                },
                fill: style.color,
                opacity: style.opacity.clamp(0.0, 1.0),
            },
        ),
    ))
}

/// Non-interactive preview drawn at half the chosen opacity.
pub fn zone_preview(points: &[Point], color: Color, opacity: f64) -> SceneObject {
    SceneObject::new(
        new_object_id(),
        ObjectKind::ZonePreview(Zone {
            shape: ZoneShape::Polygon {
                vertices: points.to_vec(),
            },
            fill: color,
            opacity: opacity.clamp(0.0, 1.0) / 2.0,
        }),
    )
}

/// 12×6" deployment rectangle; `origin` is its top-left corner.
pub fn deployment_zone(
    kind: ZoneKind,
    style: ZoneStyle,
    canvas: &CanvasSpec,
    origin: Option<Point>,
) -> SceneObject {
    let width = DEPLOYMENT_WIDTH_UNITS * canvas.grid_unit;
    let height = DEPLOYMENT_HEIGHT_UNITS * canvas.grid_unit;
    let origin = origin.unwrap_or_else(|| canvas.center() - Vec2::new(width / 2.0, height / 2.0));
    SceneObject::new(
        new_object_id(),
        ObjectKind::zone(
            kind,
            Zone {
                shape: ZoneShape::Rectangle { width, height },
                fill: style.color,
                opacity: style.opacity,
            },
        ),
    )
    .with_transform(Affine::translate(origin.to_vec2()))
}

/// Table-edge deployment: a full-height strip over the outer quarter of the
/// table, left for the attacker and right for the defender.
pub fn deployment_strip(side: Side, palette: &Palette, canvas: &CanvasSpec) -> SceneObject {
    let (w, h) = (canvas.width(), canvas.height());
    let vertices = match side {
        Side::Attacker => vec![
            Point::new(0.0, 0.0),
            Point::new(w / 4.0, 0.0),
            Point::new(w / 4.0, h),
            Point::new(0.0, h),
        ],
        Side::Defender => vec![
            Point::new(w, 0.0),
            Point::new(w * 3.0 / 4.0, 0.0),
            Point::new(w * 3.0 / 4.0, h),
            Point::new(w, h),
        ],
    };
    let kind = ZoneKind::from(side);
    let style = palette.style_for(kind);
    SceneObject::new(
        new_object_id(),
        ObjectKind::zone(
            kind,
            Zone {
                shape: ZoneShape::Polygon { vertices },
                fill: style.color,
                opacity: style.opacity,
            },
        ),
    )
}

// ── Icons ───────────────────────────────────────────────────────

fn icon_transform(at: Point, scale: f64) -> Affine {
    Affine::translate(at.to_vec2()) * Affine::scale(scale)
}

/// Objective marker scaled so the icon's longest side spans two grid units.
pub fn objective_marker(icon: IconRef, canvas: &CanvasSpec, at: Option<Point>) -> SceneObject {
    let longest = icon.width.max(icon.height).max(1) as f64;
    let scale = 2.0 * canvas.grid_unit / longest;
    SceneObject::new(new_object_id(), ObjectKind::ObjectiveMarker(Marker { icon }))
        .with_transform(icon_transform(at.unwrap_or_else(|| canvas.center()), scale))
}

pub fn strike_force_marker(icon: IconRef, canvas: &CanvasSpec, at: Option<Point>) -> SceneObject {
    SceneObject::new(new_object_id(), ObjectKind::StrikeForceMarker(Marker { icon }))
        .with_transform(icon_transform(
            at.unwrap_or_else(|| canvas.center()),
            STRIKE_FORCE_SCALE,
        ))
}

pub fn unit_icon(side: Side, icon: IconRef, canvas: &CanvasSpec, at: Option<Point>) -> SceneObject {
    SceneObject::new(
        new_object_id(),
        ObjectKind::unit(side, UnitIcon { icon, opacity: 1.0 }),
    )
    .with_transform(icon_transform(at.unwrap_or_else(|| canvas.center()), 1.0))
}

// ── Measurement and text ────────────────────────────────────────

/// 5" measurement aid locked to `axis`, centered on `at` (table center by default).
pub fn measurement_aid(
    axis: Axis,
    style: &StyleConfig,
    canvas: &CanvasSpec,
    at: Option<Point>,
) -> SceneObject {
    let length = MEASUREMENT_UNITS * canvas.grid_unit;
    let center = at.unwrap_or_else(|| canvas.center());
    let start = match axis {
        Axis::Horizontal => center - Vec2::new(length / 2.0, 0.0),
        Axis::Vertical => center - Vec2::new(0.0, length / 2.0),
    };
    SceneObject::new(
        new_object_id(),
        ObjectKind::MeasurementGroup(MeasurementAid {
            axis,
            length,
            label: format_inches(length, canvas.grid_unit),
            color: style.measurement_color,
        }),
    )
    .with_transform(Affine::translate(start.to_vec2()))
}

pub fn zone_label(text: &str, style: &StyleConfig, center: Point) -> SceneObject {
    SceneObject::new(
        new_object_id(),
        ObjectKind::ZoneLabel(Label {
            text: text.to_string(),
            font_size: style.label_font_size,
            color: style.label_color,
        }),
    )
    .with_transform(Affine::translate(center.to_vec2()))
}

// ── Drawing artifacts ───────────────────────────────────────────

pub fn drawing_marker(at: Point, style: &StyleConfig) -> SceneObject {
    SceneObject::new(
        new_object_id(),
        ObjectKind::DrawingMarker(DrawingMarker {
            radius: style.draft_marker_radius,
            color: style.draft_color,
        }),
    )
    .with_transform(Affine::translate(at.to_vec2()))
}

pub fn drawing_line(from: Point, to: Point, style: &StyleConfig) -> SceneObject {
    SceneObject::new(
        new_object_id(),
        ObjectKind::DrawingLine(DrawingLine {
            from,
            to,
            color: style.draft_color,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{icon_ref, triangle_points};
    use kurbo::Rect;
    use shared::IconKey;

    fn canvas() -> CanvasSpec {
        CanvasSpec::default()
    }

    #[test]
    fn test_zone_from_points_keeps_click_order() {
        let style = Palette::default().attacker;
        let obj = zone_from_points(ZoneKind::Attacker, &triangle_points(), style).unwrap();
        assert_eq!(obj.name(), "attacker_zone");
        let (_, zone) = obj.kind.as_zone().unwrap();
        assert_eq!(zone.shape.vertices(), triangle_points());
        assert_eq!(zone.fill, Color::RED);
    }

    #[test]
    fn test_zone_from_two_points_rejected() {
        let style = Palette::default().attacker;
        let err = zone_from_points(ZoneKind::Attacker, &triangle_points()[..2], style).unwrap_err();
        assert!(matches!(err, EditorError::InvalidGeometry { vertices: 2 }));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = zone_label("a", &StyleConfig::default(), Point::ORIGIN);
        let b = zone_label("a", &StyleConfig::default(), Point::ORIGIN);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_preview_uses_half_opacity() {
        let obj = zone_preview(&triangle_points(), Color::BLUE, 0.8);
        assert!(obj.is_transient());
        let ObjectKind::ZonePreview(zone) = &obj.kind else {
            panic!("Expected ZonePreview");
        };
        assert!((zone.opacity - 0.4).abs() < 1e-10);
    }

    #[test]
    fn test_deployment_zone_defaults_to_centered_12_by_6() {
        let obj = deployment_zone(ZoneKind::Defender, Palette::default().defender, &canvas(), None);
        assert_eq!(obj.name(), "defender_zone");
        assert_eq!(obj.bounds(Affine::IDENTITY), Rect::new(480.0, 380.0, 720.0, 500.0));
    }

    #[test]
    fn test_deployment_strip_covers_quarter() {
        let obj = deployment_strip(Side::Defender, &Palette::default(), &canvas());
        assert_eq!(obj.bounds(Affine::IDENTITY), Rect::new(900.0, 0.0, 1200.0, 880.0));
    }

    #[test]
    fn test_objective_longest_side_is_two_units() {
        let obj = objective_marker(icon_ref(IconKey::Objective, 200, 100), &canvas(), None);
        let b = obj.bounds(Affine::IDENTITY);
        assert!((b.width() - 40.0).abs() < 1e-10);
        assert!((b.height() - 20.0).abs() < 1e-10);
        assert_eq!(b.center(), Point::new(600.0, 440.0));
    }

    #[test]
    fn test_strike_force_half_scale() {
        let obj = strike_force_marker(icon_ref(IconKey::StrikeForce, 80, 60), &canvas(), None);
        let b = obj.bounds(Affine::IDENTITY);
        assert!((b.width() - 40.0).abs() < 1e-10);
        assert!((b.height() - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_unit_icon_defaults() {
        let obj = unit_icon(Side::Attacker, icon_ref(IconKey::AttackerUnit, 40, 40), &canvas(), None);
        let (side, unit) = obj.kind.as_unit().unwrap();
        assert_eq!(side, Side::Attacker);
        assert_eq!(unit.opacity, 1.0);
        assert_eq!(obj.position(), Point::new(600.0, 440.0));
    }

    #[test]
    fn test_measurement_aid_axis_and_label() {
        let obj = measurement_aid(Axis::Vertical, &StyleConfig::default(), &canvas(), None);
        let ObjectKind::MeasurementGroup(aid) = &obj.kind else {
            panic!("Expected MeasurementGroup");
        };
        assert_eq!(aid.axis, Axis::Vertical);
        assert_eq!(aid.label, "5.0\"");
        let b = obj.bounds(Affine::IDENTITY);
        assert_eq!(b, Rect::new(600.0, 390.0, 600.0, 490.0));
    }
}
