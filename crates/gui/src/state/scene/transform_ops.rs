//! Transform/drag operations and per-object transform constraints

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use shared::{Axis, ObjectKind, SceneObject};

use super::SceneGraph;
use crate::error::{EditorError, EditorResult};
use crate::geometry::distance;

/// Selection-box handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    Rotate,
}

impl Handle {
    pub const ALL: [Handle; 9] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Left,
        Handle::Right,
        Handle::BottomLeft,
        Handle::Bottom,
        Handle::BottomRight,
        Handle::Rotate,
    ];

    /// Which box edges the handle drags: (x side, y side), -1 = min, 1 = max
    fn edges(&self) -> (i8, i8) {
        match self {
            Handle::TopLeft => (-1, -1),
            Handle::Top => (0, -1),
            Handle::TopRight => (1, -1),
            Handle::Left => (-1, 0),
            Handle::Right => (1, 0),
            Handle::BottomLeft => (-1, 1),
            Handle::Bottom => (0, 1),
            Handle::BottomRight => (1, 1),
            Handle::Rotate => (0, 0),
        }
    }
}

/// Interaction affordances of an object
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub selectable: bool,
    pub handles: Vec<Handle>,
    pub rotatable: bool,
}

impl Controls {
    pub fn allows(&self, handle: Handle) -> bool {
        self.handles.contains(&handle)
    }
}

/// Affordances derived from the variant. Measurement aids only expose the
/// two handles on their axis and never rotate; so do groups holding one.
pub fn controls_for(obj: &SceneObject) -> Controls {
    if obj.is_transient() {
        return Controls {
            selectable: false,
            handles: Vec::new(),
            rotatable: false,
        };
    }
    match &obj.kind {
        ObjectKind::MeasurementGroup(aid) => Controls {
            selectable: true,
            handles: match aid.axis {
                Axis::Horizontal => vec![Handle::Left, Handle::Right],
                Axis::Vertical => vec![Handle::Top, Handle::Bottom],
            },
            rotatable: false,
        },
        _ if obj.contains_measurement() => Controls {
            selectable: true,
            handles: vec![
                Handle::TopLeft,
                Handle::TopRight,
                Handle::BottomLeft,
                Handle::BottomRight,
            ],
            rotatable: false,
        },
        _ => Controls {
            selectable: true,
            handles: Handle::ALL.to_vec(),
            rotatable: true,
        },
    }
}

/// Distance of the rotate handle above the top edge
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

/// Canvas positions of the handles an object exposes, on its bounding box
pub fn handle_points(obj: &SceneObject) -> Vec<(Handle, Point)> {
    let controls = controls_for(obj);
    let b = obj.bounds(Affine::IDENTITY);
    let mid = b.center();
    let mut points: Vec<(Handle, Point)> = controls
        .handles
        .iter()
        .filter(|h| **h != Handle::Rotate)
        .map(|h| {
            let (ex, ey) = h.edges();
            let x = match ex {
                -1 => b.x0,
                1 => b.x1,
                _ => mid.x,
            };
            let y = match ey {
                -1 => b.y0,
                1 => b.y1,
                _ => mid.y,
            };
            (*h, Point::new(x, y))
        })
        .collect();
    if controls.rotatable {
        points.push((Handle::Rotate, Point::new(mid.x, b.y0 - ROTATE_HANDLE_OFFSET)));
    }
    points
}

/// Handle within `radius` of `p`, if any
pub fn handle_at(obj: &SceneObject, p: Point, radius: f64) -> Option<Handle> {
    handle_points(obj)
        .into_iter()
        .find(|(_, at)| distance(*at, p) <= radius)
        .map(|(h, _)| h)
}

impl SceneGraph {
    /// Move an object by `delta`
    pub fn translate(&mut self, id: &str, delta: Vec2) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        obj.transform = Affine::translate(delta) * obj.transform;
        self.version += 1;
        Ok(())
    }

    /// Scale about the object's top-left bounding corner
    pub fn scale(&mut self, id: &str, sx: f64, sy: f64) -> EditorResult<()> {
        if !(sx.is_finite() && sy.is_finite()) || sx <= 0.0 || sy <= 0.0 {
            return Err(EditorError::InvalidAction("scale factors must be positive"));
        }
        let obj = self
            .get(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;

        if let ObjectKind::MeasurementGroup(aid) = &obj.kind {
            let (along, across) = match aid.axis {
                Axis::Horizontal => (sx, sy),
                Axis::Vertical => (sy, sx),
            };
            if across != 1.0 {
                return Err(EditorError::TransformLocked {
                    id: id.to_string(),
                    reason: "measurement aids only scale along their axis",
                });
            }
            let length = aid.length * along;
            return self.set_measurement_length(id, length);
        }
        if obj.contains_measurement() && sx != sy {
            return Err(EditorError::TransformLocked {
                id: id.to_string(),
                reason: "groups with measurement aids only scale uniformly",
            });
        }

        let anchor = obj.bounds(Affine::IDENTITY).origin().to_vec2();
        let about = Affine::translate(anchor) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-anchor);
        if let Some(obj) = self.get_mut(id) {
            obj.transform = about * obj.transform;
        }
        self.version += 1;
        Ok(())
    }

    /// Drag a selection handle by `delta` (canvas pixels). The opposite
    /// edge of the bounding box stays put.
    pub fn resize(&mut self, id: &str, handle: Handle, delta: Vec2) -> EditorResult<()> {
        let obj = self
            .get(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        let controls = controls_for(obj);
        if !controls.allows(handle) || handle == Handle::Rotate {
            return Err(EditorError::TransformLocked {
                id: id.to_string(),
                reason: "handle not available on this object",
            });
        }

        if let ObjectKind::MeasurementGroup(aid) = &obj.kind {
            // Dragging the start handle moves the origin, the end handle
            // only changes the length.
            let (along, start_side) = match aid.axis {
                Axis::Horizontal => (delta.x, handle == Handle::Left),
                Axis::Vertical => (delta.y, handle == Handle::Top),
            };
            let scale_along = match aid.axis {
                Axis::Horizontal => obj.transform.as_coeffs()[0],
                Axis::Vertical => obj.transform.as_coeffs()[3],
            };
            let scale_along = if scale_along.abs() > f64::EPSILON { scale_along } else { 1.0 };
            let local = along / scale_along;
            let length = if start_side { aid.length - local } else { aid.length + local };
            if length <= 0.0 {
                return Err(EditorError::InvalidAction("measurement aid cannot collapse"));
            }
            let shift = match aid.axis {
                Axis::Horizontal => Vec2::new(along, 0.0),
                Axis::Vertical => Vec2::new(0.0, along),
            };
            if start_side {
                if let Some(obj) = self.get_mut(id) {
                    obj.transform = Affine::translate(shift) * obj.transform;
                }
            }
            return self.set_measurement_length(id, length);
        }

        let bounds = obj.bounds(Affine::IDENTITY);
        let (ex, ey) = handle.edges();
        let mut sx = 1.0;
        let mut sy = 1.0;
        let mut anchor = bounds.origin().to_vec2();
        if ex != 0 && bounds.width() > 0.0 {
            sx = (bounds.width() + delta.x * ex as f64) / bounds.width();
            anchor.x = if ex < 0 { bounds.x1 } else { bounds.x0 };
        }
        if ey != 0 && bounds.height() > 0.0 {
            sy = (bounds.height() + delta.y * ey as f64) / bounds.height();
            anchor.y = if ey < 0 { bounds.y1 } else { bounds.y0 };
        }
        if sx <= 0.0 || sy <= 0.0 {
            return Err(EditorError::InvalidAction("resize would flip the object"));
        }
        if obj.contains_measurement() {
            // Corner drags only, kept uniform
            let uniform = sx.max(sy);
            sx = uniform;
            sy = uniform;
        }
        let about = Affine::translate(anchor) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-anchor);
        if let Some(obj) = self.get_mut(id) {
            obj.transform = about * obj.transform;
        }
        self.version += 1;
        Ok(())
    }

    /// Rotate about the bounding-box center
    pub fn rotate(&mut self, id: &str, radians: f64) -> EditorResult<()> {
        let obj = self
            .get(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        if !controls_for(obj).rotatable {
            return Err(EditorError::TransformLocked {
                id: id.to_string(),
                reason: "rotation is locked",
            });
        }
        let center = obj.bounds(Affine::IDENTITY).center().to_vec2();
        let about = Affine::translate(center) * Affine::rotate(radians) * Affine::translate(-center);
        if let Some(obj) = self.get_mut(id) {
            obj.transform = about * obj.transform;
        }
        self.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{measurement_object, measurement_object_along, triangle_zone};
    use kurbo::Rect;
    use shared::ZoneKind;

    fn scene_with(obj: SceneObject) -> SceneGraph {
        let mut scene = SceneGraph::default();
        scene.add(obj);
        scene
    }

    #[test]
    fn test_measurement_controls_follow_axis() {
        let h = controls_for(&measurement_object("m"));
        assert_eq!(h.handles, vec![Handle::Left, Handle::Right]);
        assert!(!h.rotatable);
        let v = controls_for(&measurement_object_along("m", Axis::Vertical));
        assert_eq!(v.handles, vec![Handle::Top, Handle::Bottom]);
        assert!(!v.allows(Handle::BottomRight));
    }

    #[test]
    fn test_zone_has_all_controls() {
        let c = controls_for(&triangle_zone("z", ZoneKind::Attacker));
        assert!(c.rotatable);
        assert_eq!(c.handles.len(), 9);
    }

    #[test]
    fn test_translate() {
        let mut scene = scene_with(triangle_zone("z", ZoneKind::Attacker));
        scene.translate("z", Vec2::new(20.0, 40.0)).unwrap();
        assert_eq!(
            scene.get("z").unwrap().bounds(Affine::IDENTITY),
            Rect::new(20.0, 40.0, 120.0, 140.0)
        );
    }

    #[test]
    fn test_translate_missing_object() {
        let mut scene = SceneGraph::default();
        assert!(matches!(
            scene.translate("nope", Vec2::new(1.0, 1.0)),
            Err(EditorError::NoSuchObject(_))
        ));
    }

    #[test]
    fn test_rotate_measurement_locked() {
        let mut scene = scene_with(measurement_object("m"));
        let before = scene.get("m").unwrap().transform;
        assert!(matches!(
            scene.rotate("m", 0.5),
            Err(EditorError::TransformLocked { .. })
        ));
        assert_eq!(scene.get("m").unwrap().transform, before);
    }

    #[test]
    fn test_horizontal_resize_keeps_vertical_extent() {
        let mut scene = scene_with(measurement_object("m"));
        let before = scene.get("m").unwrap().bounds(Affine::IDENTITY);
        scene.resize("m", Handle::Right, Vec2::new(40.0, 35.0)).unwrap();
        let after = scene.get("m").unwrap().bounds(Affine::IDENTITY);
        assert_eq!(after.y0, before.y0);
        assert_eq!(after.height(), before.height());
        assert!((after.width() - 140.0).abs() < 1e-10);
        assert_eq!(after.x0, before.x0);
    }

    #[test]
    fn test_left_handle_moves_start() {
        let mut scene = scene_with(measurement_object("m"));
        scene.resize("m", Handle::Left, Vec2::new(-20.0, 0.0)).unwrap();
        let after = scene.get("m").unwrap().bounds(Affine::IDENTITY);
        assert_eq!(after, Rect::new(30.0, 50.0, 150.0, 50.0));
    }

    #[test]
    fn test_vertical_aid_rejects_side_handles() {
        let mut scene = scene_with(measurement_object_along("m", Axis::Vertical));
        assert!(scene.resize("m", Handle::Right, Vec2::new(10.0, 0.0)).is_err());
        scene.resize("m", Handle::Bottom, Vec2::new(15.0, 20.0)).unwrap();
        let b = scene.get("m").unwrap().bounds(Affine::IDENTITY);
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.x0, 50.0);
        assert!((b.height() - 120.0).abs() < 1e-10);
    }

    #[test]
    fn test_off_axis_scale_locked() {
        let mut scene = scene_with(measurement_object("m"));
        assert!(scene.scale("m", 2.0, 2.0).is_err());
        assert!(scene.scale("m", 1.0, 3.0).is_err());
        scene.scale("m", 2.0, 1.0).unwrap();
        let ObjectKind::MeasurementGroup(aid) = &scene.get("m").unwrap().kind else {
            panic!("Expected MeasurementGroup");
        };
        assert_eq!(aid.length, 200.0);
        assert_eq!(aid.label, "10.0\"");
    }

    #[test]
    fn test_zone_corner_resize_anchors_opposite_corner() {
        let mut scene = scene_with(triangle_zone("z", ZoneKind::Attacker));
        scene.resize("z", Handle::BottomRight, Vec2::new(100.0, 50.0)).unwrap();
        let b = scene.get("z").unwrap().bounds(Affine::IDENTITY);
        assert_eq!(b.origin(), Point::new(0.0, 0.0));
        assert!((b.width() - 200.0).abs() < 1e-9);
        assert!((b.height() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_cannot_flip() {
        let mut scene = scene_with(triangle_zone("z", ZoneKind::Attacker));
        assert!(scene.resize("z", Handle::Right, Vec2::new(-150.0, 0.0)).is_err());
    }

    #[test]
    fn test_rotate_zone_about_center() {
        let mut scene = scene_with(triangle_zone("z", ZoneKind::Attacker));
        let center = scene.get("z").unwrap().bounds(Affine::IDENTITY).center();
        scene.rotate("z", std::f64::consts::PI).unwrap();
        let after = scene.get("z").unwrap().bounds(Affine::IDENTITY).center();
        assert!((after - center).hypot() < 1e-9);
    }

    #[test]
    fn test_handle_points_follow_controls() {
        let h = measurement_object_along("m", Axis::Horizontal);
        let pts = handle_points(&h);
        assert_eq!(pts.len(), 2);
        assert_eq!(handle_at(&h, Point::new(149.0, 51.0), 4.0), Some(Handle::Right));
        assert_eq!(handle_at(&h, Point::new(100.0, 50.0), 4.0), None);

        let zone = triangle_zone("z", ZoneKind::Attacker);
        let pts = handle_points(&zone);
        assert_eq!(pts.len(), 9);
        let b = zone.bounds(Affine::IDENTITY);
        let rot = pts.iter().find(|(h, _)| *h == Handle::Rotate).unwrap().1;
        assert_eq!(rot, Point::new(b.center().x, b.y0 - ROTATE_HANDLE_OFFSET));
    }
}
