//! In-place property edits: fill, opacity, text, measurement length, delete

use shared::{ObjectId, ObjectKind, SceneObject};

use super::{short_id, SceneGraph};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{format_inches, hex_to_rgb};

/// The zone an edit targets: the object itself or the zone of a labelled group
fn target_zone(obj: &mut SceneObject) -> Option<&mut shared::Zone> {
    let labelled = obj.labelled_zone_parts().map(|(zone, _)| zone);
    match (&mut obj.kind, labelled) {
        (ObjectKind::Group(group), Some(idx)) => group.children[idx].kind.as_zone_mut(),
        (kind, _) => kind.as_zone_mut(),
    }
}

impl SceneGraph {
    /// Set fill opacity of a zone or unit icon, clamped to [0, 1]
    pub fn set_opacity(&mut self, id: &str, opacity: f64) -> EditorResult<()> {
        if !opacity.is_finite() {
            return Err(EditorError::InvalidAction("opacity must be a number"));
        }
        let opacity = opacity.clamp(0.0, 1.0);
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        if let Some(unit) = obj.kind.as_unit_mut() {
            unit.opacity = opacity;
        } else if let Some(zone) = target_zone(obj) {
            zone.opacity = opacity;
        } else {
            return Err(EditorError::InvalidAction("object has no adjustable opacity"));
        }
        self.version += 1;
        Ok(())
    }

    /// Set a zone's fill from `#rrggbb`. A malformed value keeps the old color.
    pub fn set_fill(&mut self, id: &str, hex: &str) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        let zone = target_zone(obj).ok_or(EditorError::InvalidAction("only zones have a fill"))?;
        let Some(color) = hex_to_rgb(hex) else {
            tracing::warn!("Malformed color {hex:?}, keeping {}", zone.fill.to_hex());
            return Err(EditorError::MalformedColor(hex.to_string()));
        };
        zone.fill = color;
        self.version += 1;
        Ok(())
    }

    /// Replace the text of a label, a labelled zone or a measurement aid
    pub fn set_label_text(&mut self, id: &str, text: &str) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        let label_idx = obj.labelled_zone_parts().map(|(_, label)| label);
        match (&mut obj.kind, label_idx) {
            (ObjectKind::Group(group), Some(idx)) => {
                if let ObjectKind::ZoneLabel(label) = &mut group.children[idx].kind {
                    label.text = text.to_string();
                }
            }
            (ObjectKind::ZoneLabel(label), _) => label.text = text.to_string(),
            (ObjectKind::MeasurementGroup(aid), _) => aid.label = text.to_string(),
            _ => return Err(EditorError::InvalidAction("object has no text")),
        }
        self.version += 1;
        Ok(())
    }

    /// Change a measurement aid's length. The label follows the length as
    /// long as it still shows the auto-formatted value.
    pub(crate) fn set_measurement_length(&mut self, id: &str, length: f64) -> EditorResult<()> {
        let unit = self.grid_unit;
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        let ObjectKind::MeasurementGroup(aid) = &mut obj.kind else {
            return Err(EditorError::InvalidAction("not a measurement aid"));
        };
        if aid.label == format_inches(aid.length, unit) {
            aid.label = format_inches(length, unit);
        }
        aid.length = length;
        self.version += 1;
        Ok(())
    }

    /// Delete every selected object. Returns the removed ids.
    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        let ids = self.selection.all().to_vec();
        let removed: Vec<ObjectId> = ids
            .into_iter()
            .filter(|id| self.remove(id).is_some())
            .collect();
        if !removed.is_empty() {
            tracing::info!(
                "Deleted {}",
                removed.iter().map(|id| short_id(id)).collect::<Vec<_>>().join(", ")
            );
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{labelled_zone, measurement_object, triangle_zone, unit_object};
    use kurbo::Point;
    use shared::{Color, Side, ZoneKind};

    #[test]
    fn test_set_opacity_clamps() {
        let mut scene = SceneGraph::default();
        scene.add(unit_object("u", Side::Defender, Point::new(10.0, 10.0)));
        scene.set_opacity("u", 1.7).unwrap();
        assert_eq!(scene.get("u").unwrap().kind.as_unit().unwrap().1.opacity, 1.0);
        scene.set_opacity("u", 0.25).unwrap();
        assert_eq!(scene.get("u").unwrap().kind.as_unit().unwrap().1.opacity, 0.25);
    }

    #[test]
    fn test_set_opacity_on_marker_rejected() {
        let mut scene = SceneGraph::default();
        scene.add(measurement_object("m"));
        assert!(scene.set_opacity("m", 0.5).is_err());
    }

    #[test]
    fn test_set_fill_on_labelled_group() {
        let mut scene = SceneGraph::default();
        scene.add(labelled_zone("g", "A"));
        scene.set_fill("g", "#123456").unwrap();
        let ObjectKind::Group(g) = &scene.get("g").unwrap().kind else {
            panic!("Expected Group");
        };
        assert_eq!(g.children[0].kind.as_zone().unwrap().1.fill, Color::rgb(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_malformed_fill_keeps_color() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("z", ZoneKind::Custom));
        let err = scene.set_fill("z", "not-a-color").unwrap_err();
        assert!(matches!(err, EditorError::MalformedColor(_)));
        assert_eq!(scene.get("z").unwrap().kind.as_zone().unwrap().1.fill, Color::BLUE);
    }

    #[test]
    fn test_measurement_label_follows_length_until_edited() {
        let mut scene = SceneGraph::default();
        scene.add(measurement_object("m"));
        scene.set_measurement_length("m", 60.0).unwrap();
        let label = |scene: &SceneGraph| match &scene.get("m").unwrap().kind {
            ObjectKind::MeasurementGroup(aid) => aid.label.clone(),
            _ => unreachable!(),
        };
        assert_eq!(label(&scene), "3.0\"");
        scene.set_label_text("m", "Charge range").unwrap();
        scene.set_measurement_length("m", 180.0).unwrap();
        assert_eq!(label(&scene), "Charge range");
    }

    #[test]
    fn test_delete_selected() {
        let mut scene = SceneGraph::default();
        scene.add(triangle_zone("a", ZoneKind::Attacker));
        scene.add(triangle_zone("b", ZoneKind::Defender));
        scene.add(triangle_zone("c", ZoneKind::Custom));
        scene.selection.select_many(vec!["a".into(), "c".into()]);
        let removed = scene.delete_selected();
        assert_eq!(removed, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.selection.count(), 0);
    }
}
