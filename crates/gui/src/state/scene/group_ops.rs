//! Group, ungroup, duplicate and zone text

use kurbo::{Affine, Vec2};
use shared::{Group, ObjectId, ObjectKind, SceneObject};

use super::{short_id, SceneGraph};
use crate::error::{EditorError, EditorResult};
use crate::factory::{new_object_id, zone_label};
use crate::state::settings::StyleConfig;

/// Give an object and all of its descendants fresh ids
fn reassign_ids(obj: &mut SceneObject) {
    obj.id = new_object_id();
    if let ObjectKind::Group(group) = &mut obj.kind {
        for child in &mut group.children {
            reassign_ids(child);
        }
    }
}

impl SceneGraph {
    /// Group the current multi-selection. The group takes the z-slot of the
    /// topmost member; members keep their relative order inside it.
    pub fn group_selected(&mut self) -> EditorResult<ObjectId> {
        if !self.selection.is_multi() {
            return Err(EditorError::InvalidAction("grouping needs a multi-object selection"));
        }
        let mut indices = Vec::with_capacity(self.selection.count());
        for id in self.selection.all() {
            let index = self
                .index_of(id)
                .ok_or_else(|| EditorError::NoSuchObject(id.clone()))?;
            if self.objects[index].is_transient() {
                return Err(EditorError::InvalidAction("drawing artifacts cannot be grouped"));
            }
            indices.push(index);
        }
        indices.sort_unstable();

        let slot = indices[indices.len() - 1] + 1 - indices.len();
        let children: Vec<SceneObject> = indices
            .iter()
            .rev()
            .map(|&i| self.objects.remove(i))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        let group = SceneObject::new(new_object_id(), ObjectKind::Group(Group { children }));
        let id = group.id.clone();
        let reorder = group.is_zone_like() || group.is_marker_like();
        tracing::info!("Grouped {} objects into {}", indices.len(), short_id(&id));
        self.insert_at(slot, group);
        if reorder {
            self.raise_markers();
        }
        self.selection.select(id.clone());
        Ok(id)
    }

    /// Dissolve a group. Children return to the top level at the group's
    /// slot, in order, with the group transform baked into each.
    pub fn ungroup(&mut self, id: &str) -> EditorResult<Vec<ObjectId>> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        let children = match &mut self.objects[index].kind {
            ObjectKind::Group(group) => std::mem::take(&mut group.children),
            _ => return Err(EditorError::InvalidAction("only groups can be ungrouped")),
        };
        let group = self.objects.remove(index);
        self.selection.forget(id);

        let mut ids = Vec::with_capacity(children.len());
        let mut zone_like = false;
        for (offset, mut child) in children.into_iter().enumerate() {
            child.transform = group.transform * child.transform;
            zone_like |= child.is_zone_like();
            ids.push(child.id.clone());
            self.insert_at(index + offset, child);
        }
        if zone_like {
            self.raise_markers();
        }
        tracing::info!("Ungrouped {} into {} objects", short_id(id), ids.len());
        self.selection.select_many(ids.clone());
        Ok(ids)
    }

    /// Deep copy offset by one grid unit on both axes; the copy is selected
    pub fn duplicate(&mut self, id: &str) -> EditorResult<ObjectId> {
        let mut copy = self
            .get(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?
            .clone();
        if copy.is_transient() {
            return Err(EditorError::InvalidAction("drawing artifacts cannot be duplicated"));
        }
        reassign_ids(&mut copy);
        let unit = self.grid_unit;
        copy.transform = Affine::translate(Vec2::new(unit, unit)) * copy.transform;
        let new_id = self.add(copy);
        self.selection.select(new_id.clone());
        Ok(new_id)
    }

    /// Attach text to a zone. A bare zone is wrapped with a new label into a
    /// group; a labelled zone gets its existing label text replaced.
    pub fn attach_text(&mut self, id: &str, text: &str, style: &StyleConfig) -> EditorResult<ObjectId> {
        let obj = self
            .get(id)
            .ok_or_else(|| EditorError::NoSuchObject(id.to_string()))?;
        if obj.labelled_zone_parts().is_some() {
            self.set_label_text(id, text)?;
            return Ok(id.to_string());
        }
        if obj.kind.as_zone().is_none() {
            return Err(EditorError::InvalidAction("text can only be attached to zones"));
        }

        let Some(index) = self.index_of(id) else {
            return Err(EditorError::NoSuchObject(id.to_string()));
        };
        let zone = self.objects.remove(index);
        let center = zone.bounds(Affine::IDENTITY).center();
        let label = zone_label(text, style, center);
        let group = SceneObject::new(
            new_object_id(),
            ObjectKind::Group(Group {
                children: vec![zone, label],
            }),
        );
        let group_id = group.id.clone();
        tracing::info!("Labelled zone {} as {:?}", short_id(id), text);
        self.insert_at(index, group);
        self.selection.select(group_id.clone());
        Ok(group_id)
    }
}
