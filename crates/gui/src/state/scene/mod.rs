//! Scene graph
//!
//! Ordered collection of placed objects (bottom to top) on top of the fixed
//! grid and center-marker layers, plus the selection that observes it.

mod display;
mod edit_ops;
mod group_ops;
mod persistence;
mod transform_ops;

pub use display::{object_display_name, object_icon, short_id};
pub use persistence::{deserialize, from_bytes, serialize, to_bytes};
pub use transform_ops::{controls_for, handle_at, handle_points, Controls, Handle, ROTATE_HANDLE_OFFSET};

use kurbo::{Affine, BezPath, Point, Shape};
use shared::{ObjectId, ObjectKind, SceneObject};

use super::selection::SelectionState;
use super::settings::CanvasSpec;

/// Non-interactive grid line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub major: bool,
}

/// Singleton table-center crosshair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterMarker {
    pub position: Point,
    pub visible: bool,
}

/// Scene graph with its selection
pub struct SceneGraph {
    /// User content and drawing artifacts, bottom to top
    objects: Vec<SceneObject>,
    grid: Vec<GridLine>,
    center_marker: CenterMarker,
    /// Grid step, used for snapping offsets and measurement labels
    grid_unit: f64,
    pub selection: SelectionState,
    /// Monotonically increasing version counter for autosave/redraw
    pub(crate) version: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(&CanvasSpec::default())
    }
}

impl SceneGraph {
    pub fn new(canvas: &CanvasSpec) -> Self {
        Self {
            objects: Vec::new(),
            grid: build_grid(canvas),
            center_marker: CenterMarker {
                position: canvas.center(),
                visible: false,
            },
            grid_unit: canvas.grid_unit,
            selection: SelectionState::default(),
            version: 0,
        }
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump version after an in-place edit
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    /// All objects in z-order, bottom to top
    pub fn all(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects that would be saved
    pub fn user_object_count(&self) -> usize {
        self.objects.iter().filter(|o| !o.is_transient()).count()
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    /// Add an object on top. Zone insertions re-raise markers above zones.
    pub fn add(&mut self, obj: SceneObject) -> ObjectId {
        let id = obj.id.clone();
        let raise = obj.is_zone_like();
        tracing::debug!("Adding {} {}", obj.name(), short_id(&id));
        self.objects.push(obj);
        if raise {
            self.raise_markers();
        }
        self.version += 1;
        id
    }

    /// Insert at a z-index (clamped to the top)
    pub(crate) fn insert_at(&mut self, index: usize, obj: SceneObject) {
        let index = index.min(self.objects.len());
        self.objects.insert(index, obj);
        self.version += 1;
    }

    /// Remove an object; a selected object is dropped from the selection
    pub fn remove(&mut self, id: &str) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        let obj = self.objects.remove(index);
        self.selection.forget(id);
        self.version += 1;
        Some(obj)
    }

    /// Move an object to the top of its layer (markers stay above zones)
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let obj = self.objects.remove(index);
        let marker = obj.is_marker_like();
        self.objects.push(obj);
        if !marker {
            self.raise_markers();
        }
        self.version += 1;
        true
    }

    /// Set (or clear) the active object
    pub fn set_active(&mut self, id: Option<&str>) {
        match id {
            Some(id) if self.contains(id) => self.selection.select(id.to_string()),
            Some(id) => tracing::warn!("Cannot activate unknown object {}", short_id(id)),
            None => self.selection.clear(),
        }
    }

    /// The single object contextual actions apply to
    pub fn active(&self) -> Option<&SceneObject> {
        self.selection.contextual().and_then(|id| self.get(id))
    }

    /// Keep markers and measurement aids above everything else,
    /// preserving relative order within both partitions.
    pub fn raise_markers(&mut self) {
        let (markers, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|o| o.is_marker_like());
        self.objects = rest;
        self.objects.extend(markers);
    }

    /// Remove all placed objects (grid and center marker stay)
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection.clear();
        self.version += 1;
    }

    /// Swap in a freshly loaded object list
    pub(crate) fn replace_objects(&mut self, objects: Vec<SceneObject>) {
        self.objects = objects;
        self.selection.clear();
        self.version += 1;
    }

    pub(crate) fn objects_mut(&mut self) -> &mut Vec<SceneObject> {
        &mut self.objects
    }

    /// Topmost selectable object under `p`
    pub fn hit_test(&self, p: Point) -> Option<&SceneObject> {
        self.objects
            .iter()
            .rev()
            .filter(|o| !o.is_transient())
            .find(|o| hits(o, Affine::IDENTITY, p))
    }

    pub fn grid_unit(&self) -> f64 {
        self.grid_unit
    }

    pub fn grid_lines(&self) -> &[GridLine] {
        &self.grid
    }

    pub fn center_marker(&self) -> &CenterMarker {
        &self.center_marker
    }

    pub fn set_center_marker_visible(&mut self, visible: bool) {
        if self.center_marker.visible != visible {
            self.center_marker.visible = visible;
            self.version += 1;
        }
    }
}

/// Pick slop around thin objects (measurement lines), in pixels
const PICK_SLOP: f64 = 6.0;

fn hits(obj: &SceneObject, parent: Affine, p: Point) -> bool {
    let world = parent * obj.transform;
    match &obj.kind {
        ObjectKind::Group(group) => group.children.iter().any(|c| hits(c, world, p)),
        ObjectKind::MeasurementGroup(_) => obj.bounds(parent).inflate(PICK_SLOP, PICK_SLOP).contains(p),
        kind => match kind.as_zone() {
            Some((_, zone)) => {
                let mut path = BezPath::new();
                for (i, v) in zone.shape.vertices().into_iter().enumerate() {
                    if i == 0 {
                        path.move_to(v);
                    } else {
                        path.line_to(v);
                    }
                }
                path.close_path();
                (world * path).contains(p)
            }
            None => obj.bounds(parent).contains(p),
        },
    }
}

fn build_grid(canvas: &CanvasSpec) -> Vec<GridLine> {
    let (w, h) = (canvas.width(), canvas.height());
    let mut lines = Vec::new();
    for major in [false, true] {
        let step = if major {
            canvas.major_every.max(1)
        } else {
            1
        };
        for i in (0..=canvas.width_units).step_by(step as usize) {
            let x = i as f64 * canvas.grid_unit;
            lines.push(GridLine {
                from: Point::new(x, 0.0),
                to: Point::new(x, h),
                major,
            });
        }
        for i in (0..=canvas.height_units).step_by(step as usize) {
            let y = i as f64 * canvas.grid_unit;
            lines.push(GridLine {
                from: Point::new(0.0, y),
                to: Point::new(w, y),
                major,
            });
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{measurement_object, objective_object, triangle_zone};
    use shared::ZoneKind;

    #[test]
    fn test_new_scene_has_grid_and_center() {
        let scene = SceneGraph::default();
        assert!(scene.is_empty());
        // 61 + 45 minor, 16 + 12 major
        assert_eq!(scene.grid_lines().len(), 61 + 45 + 16 + 12);
        assert_eq!(scene.center_marker().position, Point::new(600.0, 440.0));
    }

    #[test]
    fn test_insertion_order_is_z_order() {
        let mut scene = SceneGraph::default();
        scene.add(objective_object("a"));
        scene.add(measurement_object("b"));
        let ids: Vec<_> = scene.all().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_zone_insertion_reraises_markers() {
        let mut scene = SceneGraph::default();
        scene.add(objective_object("m1"));
        scene.add(measurement_object("m2"));
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        let ids: Vec<_> = scene.all().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["z1", "m1", "m2"]);
    }

    #[test]
    fn test_bring_to_front() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        scene.add(triangle_zone("z2", ZoneKind::Defender));
        assert!(scene.bring_to_front("z1"));
        assert_eq!(scene.all()[1].id, "z1");
        assert_eq!(scene.len(), 2);
        assert!(!scene.bring_to_front("missing"));
    }

    #[test]
    fn test_bring_zone_to_front_stays_below_markers() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        scene.add(objective_object("m1"));
        scene.add(triangle_zone("z2", ZoneKind::Defender));
        assert!(scene.bring_to_front("z1"));
        let ids: Vec<_> = scene.all().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["z2", "z1", "m1"]);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        scene.set_active(Some("z1"));
        assert_eq!(scene.active().map(|o| o.id.as_str()), Some("z1"));
        assert!(scene.remove("z1").is_some());
        assert!(scene.active().is_none());
        assert_eq!(scene.selection.count(), 0);
    }

    #[test]
    fn test_set_active_unknown_is_ignored() {
        let mut scene = SceneGraph::default();
        scene.set_active(Some("ghost"));
        assert!(scene.active().is_none());
    }

    #[test]
    fn test_clear_keeps_layers() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        let grid = scene.grid_lines().len();
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.grid_lines().len(), grid);
    }

    #[test]
    fn test_hit_test_uses_polygon_and_z_order() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        // inside the bounding box but outside the triangle
        assert!(scene.hit_test(Point::new(10.0, 90.0)).is_none());
        assert_eq!(scene.hit_test(Point::new(90.0, 10.0)).map(|o| o.id.as_str()), Some("z1"));
        scene.add(measurement_object("m"));
        assert_eq!(scene.hit_test(Point::new(90.0, 52.0)).map(|o| o.id.as_str()), Some("m"));
    }

    #[test]
    fn test_version_increments() {
        let mut scene = SceneGraph::default();
        let v0 = scene.version();
        scene.add(triangle_zone("z1", ZoneKind::Attacker));
        assert!(scene.version() > v0);
    }
}
