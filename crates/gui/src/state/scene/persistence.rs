//! Snapshot codec and autosave

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use shared::{ObjectKind, SceneObject, SceneSnapshot, SNAPSHOT_VERSION};

use super::{short_id, SceneGraph};
use crate::error::{EditorError, EditorResult};

/// Snapshot of all user content, bottom to top. Drawing artifacts are
/// left out, as are the grid and center marker (they are not objects).
pub fn serialize(scene: &SceneGraph) -> SceneSnapshot {
    SceneSnapshot {
        version: SNAPSHOT_VERSION,
        objects: scene
            .all()
            .iter()
            .filter(|o| !o.is_transient())
            .cloned()
            .collect(),
    }
}

/// Validate a snapshot and hand back its objects in z-order
pub fn deserialize(snapshot: SceneSnapshot) -> EditorResult<Vec<SceneObject>> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(EditorError::MalformedSnapshot(format!(
            "unsupported version {}",
            snapshot.version
        )));
    }
    let mut ids = HashSet::new();
    for obj in &snapshot.objects {
        validate(obj, &mut ids)?;
    }
    Ok(snapshot.objects)
}

fn validate(obj: &SceneObject, ids: &mut HashSet<String>) -> EditorResult<()> {
    let malformed = |msg: String| Err(EditorError::MalformedSnapshot(msg));
    if obj.id.is_empty() {
        return malformed(format!("{} without id", obj.name()));
    }
    if !ids.insert(obj.id.clone()) {
        return malformed(format!("duplicate id {}", obj.id));
    }
    if obj.is_transient() {
        return malformed(format!("drawing artifact {} in snapshot", short_id(&obj.id)));
    }
    let coeffs = obj.transform.as_coeffs();
    if coeffs.iter().any(|c| !c.is_finite()) {
        return malformed(format!("non-finite transform on {}", short_id(&obj.id)));
    }
    match &obj.kind {
        ObjectKind::Group(group) => {
            if group.children.is_empty() {
                return malformed(format!("empty group {}", short_id(&obj.id)));
            }
            for child in &group.children {
                validate(child, ids)?;
            }
        }
        ObjectKind::AttackerUnit(unit) | ObjectKind::DefenderUnit(unit) => {
            if !(0.0..=1.0).contains(&unit.opacity) {
                return malformed(format!("opacity {} out of range", unit.opacity));
            }
        }
        ObjectKind::MeasurementGroup(aid) => {
            if !(aid.length.is_finite() && aid.length > 0.0) {
                return malformed(format!("measurement length {}", aid.length));
            }
        }
        kind => {
            if let Some((_, zone)) = kind.as_zone() {
                if zone.shape.vertex_count() < 3 {
                    return malformed(format!(
                        "zone {} has {} vertices",
                        short_id(&obj.id),
                        zone.shape.vertex_count()
                    ));
                }
                if !(0.0..=1.0).contains(&zone.opacity) {
                    return malformed(format!("opacity {} out of range", zone.opacity));
                }
            }
        }
    }
    Ok(())
}

/// Pretty JSON bytes of the snapshot
pub fn to_bytes(snapshot: &SceneSnapshot) -> EditorResult<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot).map_err(|e| EditorError::MalformedSnapshot(e.to_string()))
}

/// Parse and validate snapshot bytes
pub fn from_bytes(bytes: &[u8]) -> EditorResult<Vec<SceneObject>> {
    let snapshot: SceneSnapshot =
        serde_json::from_slice(bytes).map_err(|e| EditorError::MalformedSnapshot(e.to_string()))?;
    deserialize(snapshot)
}

impl SceneGraph {
    /// Serialized scene
    pub fn save_bytes(&self) -> EditorResult<Vec<u8>> {
        let bytes = to_bytes(&serialize(self))?;
        tracing::info!("Saved {} objects ({} bytes)", self.user_object_count(), bytes.len());
        Ok(bytes)
    }

    /// Replace the scene with a saved one. On error the scene is untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> EditorResult<()> {
        let objects = from_bytes(bytes)?;
        tracing::info!("Loaded {} objects", objects.len());
        self.replace_objects(objects);
        Ok(())
    }

    fn autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mission-map", "mission-map")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save scene to the autosave file
    pub fn autosave(&self) {
        if let Some(path) = Self::autosave_path() {
            self.autosave_to(&path);
        }
    }

    pub fn autosave_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Cannot create autosave dir {}: {e}", parent.display());
                return;
            }
        }
        match to_bytes(&serialize(self)) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(path, bytes) {
                    tracing::warn!("Autosave failed: {e}");
                }
            }
            Err(e) => tracing::warn!("Autosave failed: {e}"),
        }
    }

    /// Objects from the autosave file, if there is a valid one
    pub fn load_autosave() -> Option<Vec<SceneObject>> {
        Self::load_autosave_from(&Self::autosave_path()?)
    }

    pub fn load_autosave_from(path: &Path) -> Option<Vec<SceneObject>> {
        let bytes = std::fs::read(path).ok()?;
        match from_bytes(&bytes) {
            Ok(objects) => Some(objects),
            Err(e) => {
                tracing::warn!("Ignoring autosave {}: {e}", path.display());
                None
            }
        }
    }

    /// Restore objects recovered from an autosave
    pub fn restore(&mut self, objects: Vec<SceneObject>) {
        self.replace_objects(objects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        labelled_zone, measurement_object_along, triangle_zone, unit_object,
        zone_and_labelled_group_snapshot,
    };
    use kurbo::Point;
    use shared::{Axis, Side, ZoneKind};

    fn sample_scene() -> SceneGraph {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z1", ZoneKind::Custom));
        scene.add(labelled_zone("g1", "Hold here"));
        scene.add(measurement_object_along("m1", Axis::Vertical));
        scene.add(unit_object("u1", Side::Attacker, Point::new(300.0, 200.0)));
        scene
    }

    #[test]
    fn test_roundtrip_preserves_content_and_order() {
        let scene = sample_scene();
        let bytes = scene.save_bytes().unwrap();
        let mut loaded = SceneGraph::default();
        loaded.load_bytes(&bytes).unwrap();
        assert_eq!(loaded.all(), scene.all());
    }

    #[test]
    fn test_serialize_skips_drawing_artifacts() {
        let mut scene = sample_scene();
        scene.add(crate::factory::drawing_marker(
            Point::new(0.0, 0.0),
            &Default::default(),
        ));
        let snap = serialize(&scene);
        assert_eq!(snap.objects.len(), 4);
        assert!(snap.objects.iter().all(|o| !o.is_transient()));
    }

    #[test]
    fn test_load_zone_and_group() {
        let bytes = to_bytes(&zone_and_labelled_group_snapshot()).unwrap();
        let mut scene = SceneGraph::default();
        scene.load_bytes(&bytes).unwrap();
        assert_eq!(scene.len(), 2);
        let group = scene.get("group_b").unwrap();
        let (_, label) = group.labelled_zone_parts().unwrap();
        let ObjectKind::Group(g) = &group.kind else {
            panic!("Expected Group");
        };
        let ObjectKind::ZoneLabel(l) = &g.children[label].kind else {
            panic!("Expected ZoneLabel");
        };
        assert_eq!(l.text, "Objective Alpha");
    }

    #[test]
    fn test_garbage_leaves_scene_untouched() {
        let mut scene = sample_scene();
        let before = scene.all().to_vec();
        assert!(matches!(
            scene.load_bytes(b"{\"objects\": [ oops"),
            Err(EditorError::MalformedSnapshot(_))
        ));
        assert_eq!(scene.all(), before.as_slice());
    }

    #[test]
    fn test_future_version_rejected() {
        let snap = SceneSnapshot {
            version: 99,
            objects: vec![],
        };
        assert!(deserialize(snap).is_err());
    }

    #[test]
    fn test_degenerate_zone_rejected() {
        let json = r#"{"version":1,"objects":[{"id":"z","name":"attacker_zone",
            "shape":{"shape":"polygon","vertices":[{"x":0,"y":0},{"x":1,"y":1}]},
            "fill":{"r":255,"g":0,"b":0},"opacity":0.3}]}"#;
        assert!(from_bytes(json.as_bytes()).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let snap = SceneSnapshot {
            version: SNAPSHOT_VERSION,
            objects: vec![
                triangle_zone("z", ZoneKind::Attacker),
                triangle_zone("z", ZoneKind::Defender),
            ],
        };
        assert!(deserialize(snap).is_err());
    }

    #[test]
    fn test_opacity_out_of_range_rejected() {
        let mut zone = triangle_zone("z", ZoneKind::Attacker);
        if let Some(z) = zone.kind.as_zone_mut() {
            z.opacity = 1.5;
        }
        let snap = SceneSnapshot {
            version: SNAPSHOT_VERSION,
            objects: vec![zone],
        };
        assert!(deserialize(snap).is_err());
    }

    #[test]
    fn test_autosave_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.json");
        let scene = sample_scene();
        scene.autosave_to(&path);
        let objects = SceneGraph::load_autosave_from(&path).unwrap();
        assert_eq!(objects.as_slice(), scene.all());
    }

    #[test]
    fn test_missing_autosave() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SceneGraph::load_autosave_from(&dir.path().join("none.json")).is_none());
    }
}
