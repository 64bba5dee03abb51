//! Factory functions for creating test data.
//!
//! Provides convenient helpers to construct `SceneObject`s with fixed IDs,
//! used in tests and by the command protocol examples.

use kurbo::{Affine, Point};
use shared::*;

// ── Geometry ────────────────────────────────────────────────────

/// The 3-click triangle used throughout the tests: (0,0), (100,0), (100,100).
pub fn triangle_points() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
    ]
}

/// A 4-point square with its top-left corner at `origin`.
pub fn square_points(origin: Point, side: f64) -> Vec<Point> {
    vec![
        origin,
        Point::new(origin.x + side, origin.y),
        Point::new(origin.x + side, origin.y + side),
        Point::new(origin.x, origin.y + side),
    ]
}

// ── Object fixtures ─────────────────────────────────────────────

/// Polygon zone over `triangle_points()` with the default palette color.
pub fn triangle_zone(id: &str, kind: ZoneKind) -> SceneObject {
    let fill = match kind {
        ZoneKind::Attacker => Color::RED,
        ZoneKind::Defender => Color::GREEN,
        ZoneKind::Custom => Color::BLUE,
    };
    SceneObject::new(
        id.to_string(),
        ObjectKind::zone(
            kind,
            Zone {
                shape: ZoneShape::Polygon {
                    vertices: triangle_points(),
                },
                fill,
                opacity: 0.3,
            },
        ),
    )
}

/// Rectangle zone placed at `pos`.
pub fn rect_zone_at(id: &str, kind: ZoneKind, width: f64, height: f64, pos: Point) -> SceneObject {
    SceneObject::new(
        id.to_string(),
        ObjectKind::zone(
            kind,
            Zone {
                shape: ZoneShape::Rectangle { width, height },
                fill: Color::RED,
                opacity: 0.3,
            },
        ),
    )
    .with_transform(Affine::translate(pos.to_vec2()))
}

pub fn icon_ref(key: IconKey, width: u32, height: u32) -> IconRef {
    IconRef { key, width, height }
}

/// Objective marker at the table center with a 64×64 icon.
pub fn objective_object(id: &str) -> SceneObject {
    SceneObject::new(
        id.to_string(),
        ObjectKind::ObjectiveMarker(Marker {
            icon: icon_ref(IconKey::Objective, 64, 64),
        }),
    )
    .with_transform(Affine::translate((600.0, 440.0)))
}

/// Unit icon at `pos`.
pub fn unit_object(id: &str, side: Side, pos: Point) -> SceneObject {
    let key = match side {
        Side::Attacker => IconKey::AttackerUnit,
        Side::Defender => IconKey::DefenderUnit,
    };
    SceneObject::new(
        id.to_string(),
        ObjectKind::unit(
            side,
            UnitIcon {
                icon: icon_ref(key, 40, 40),
                opacity: 1.0,
            },
        ),
    )
    .with_transform(Affine::translate(pos.to_vec2()))
}

/// Horizontal 5" measurement aid at (50, 50).
pub fn measurement_object(id: &str) -> SceneObject {
    measurement_object_along(id, Axis::Horizontal)
}

pub fn measurement_object_along(id: &str, axis: Axis) -> SceneObject {
    SceneObject::new(
        id.to_string(),
        ObjectKind::MeasurementGroup(MeasurementAid {
            axis,
            length: 100.0,
            label: "5.0\"".to_string(),
            color: Color::BLUE,
        }),
    )
    .with_transform(Affine::translate((50.0, 50.0)))
}

pub fn label_object(id: &str, text: &str, center: Point) -> SceneObject {
    SceneObject::new(
        id.to_string(),
        ObjectKind::ZoneLabel(Label {
            text: text.to_string(),
            font_size: 16.0,
            color: Color::BLACK,
        }),
    )
    .with_transform(Affine::translate(center.to_vec2()))
}

/// Group `{zone, label}` as produced by attaching text to a zone.
pub fn labelled_zone(id: &str, text: &str) -> SceneObject {
    let zone = triangle_zone(&format!("{id}_zone"), ZoneKind::Defender);
    let label = label_object(&format!("{id}_label"), text, Point::new(50.0, 50.0));
    SceneObject::new(
        id.to_string(),
        ObjectKind::Group(Group {
            children: vec![zone, label],
        }),
    )
}

// ── Snapshot fixtures ───────────────────────────────────────────

/// Snapshot with one bare zone and one labelled-zone group.
pub fn zone_and_labelled_group_snapshot() -> SceneSnapshot {
    SceneSnapshot {
        version: SNAPSHOT_VERSION,
        objects: vec![
            triangle_zone("zone_a", ZoneKind::Attacker),
            labelled_zone("group_b", "Objective Alpha"),
        ],
    }
}
