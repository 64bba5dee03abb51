pub mod drawing;
pub mod scene;
pub mod selection;
pub mod settings;

use kurbo::Point;
use shared::{Axis, IconKey, ObjectId, ObjectKind, SceneObject, Side, ZoneKind};

use crate::assets::{IconAsset, IconLibrary};
use crate::error::{EditorError, EditorResult};
use crate::factory;
pub use drawing::{ClickOutcome, DrawingPhase, ZoneChoice, ZoneDrawing};
pub use scene::{object_display_name, object_icon, short_id, Controls, Handle, SceneGraph};
pub use settings::{ClosurePolicy, EditorSettings};

/// Log a rejected action and pass the result through
fn logged<T>(action: &str, result: EditorResult<T>) -> EditorResult<T> {
    if let Err(e) = &result {
        tracing::warn!("{action} rejected: {e}");
    }
    result
}

/// One editing session: scene, drawing state machine, settings and icons
pub struct EditorSession {
    pub scene: SceneGraph,
    pub drawing: ZoneDrawing,
    pub settings: EditorSettings,
    icons: Box<dyn IconLibrary>,
}

impl EditorSession {
    pub fn new(settings: EditorSettings, icons: Box<dyn IconLibrary>) -> Self {
        let mut scene = SceneGraph::new(&settings.canvas);
        scene.set_center_marker_visible(settings.view.show_center_marker);
        Self {
            scene,
            drawing: ZoneDrawing::default(),
            settings,
            icons,
        }
    }

    pub fn icons(&self) -> &dyn IconLibrary {
        self.icons.as_ref()
    }

    fn insert(&mut self, obj: SceneObject) -> ObjectId {
        tracing::info!("Placed {} {}", obj.name(), short_id(&obj.id));
        let id = self.scene.add(obj);
        self.scene.selection.select(id.clone());
        id
    }

    /// Load an icon before anything touches the scene
    fn icon(&mut self, key: IconKey) -> EditorResult<IconAsset> {
        logged("Icon load", self.icons.load(key))
    }

    // ── Drawing ─────────────────────────────────────────────────

    pub fn start_drawing(&mut self) {
        self.drawing.start(&mut self.scene);
    }

    pub fn click(&mut self, p: Point) -> ClickOutcome {
        self.drawing.click(&mut self.scene, &self.settings, p)
    }

    pub fn classify(&mut self, choice: ZoneChoice) -> EditorResult<Option<ObjectId>> {
        logged(
            "Classify",
            self.drawing.classify(&mut self.scene, &self.settings, choice),
        )
    }

    pub fn update_zone_color(&mut self, hex: &str, opacity: f64) -> EditorResult<()> {
        logged(
            "Zone color",
            self.drawing.update_color(&mut self.scene, hex, opacity),
        )
    }

    pub fn set_zone_color(&mut self, color: shared::Color, opacity: f64) -> EditorResult<()> {
        logged(
            "Zone color",
            self.drawing.set_color(&mut self.scene, color, opacity),
        )
    }

    pub fn confirm_custom_zone(&mut self) -> EditorResult<ObjectId> {
        logged("Confirm zone", self.drawing.confirm(&mut self.scene))
    }

    pub fn cancel_drawing(&mut self) {
        self.drawing.cancel(&mut self.scene);
    }

    // ── Factories ───────────────────────────────────────────────

    /// 12×6" deployment rectangle; top-left at `origin` or centered
    pub fn add_deployment_zone(&mut self, kind: ZoneKind, origin: Option<Point>) -> ObjectId {
        let style = self.settings.palette.style_for(kind);
        let obj = factory::deployment_zone(kind, style, &self.settings.canvas, origin);
        self.insert(obj)
    }

    /// Table-edge deployment strip for one side
    pub fn add_deployment_strip(&mut self, side: Side) -> ObjectId {
        let obj = factory::deployment_strip(side, &self.settings.palette, &self.settings.canvas);
        self.insert(obj)
    }

    pub fn add_objective(&mut self, at: Option<Point>) -> EditorResult<ObjectId> {
        let icon = self.icon(IconKey::Objective)?.icon_ref();
        Ok(self.insert(factory::objective_marker(icon, &self.settings.canvas, at)))
    }

    pub fn add_strike_force(&mut self, at: Option<Point>) -> EditorResult<ObjectId> {
        let icon = self.icon(IconKey::StrikeForce)?.icon_ref();
        Ok(self.insert(factory::strike_force_marker(icon, &self.settings.canvas, at)))
    }

    pub fn add_unit(&mut self, side: Side, at: Option<Point>) -> EditorResult<ObjectId> {
        let key = match side {
            Side::Attacker => IconKey::AttackerUnit,
            Side::Defender => IconKey::DefenderUnit,
        };
        let icon = self.icon(key)?.icon_ref();
        Ok(self.insert(factory::unit_icon(side, icon, &self.settings.canvas, at)))
    }

    pub fn add_measurement(&mut self, axis: Axis, at: Option<Point>) -> ObjectId {
        let obj = factory::measurement_aid(axis, &self.settings.style, &self.settings.canvas, at);
        self.insert(obj)
    }

    // ── Selection ───────────────────────────────────────────────

    /// Select the topmost object under `p`, or clear the selection.
    /// With `additive` the hit toggles in and out of a multi-selection.
    pub fn select_at(&mut self, p: Point, additive: bool) -> Option<ObjectId> {
        if self.scene.selection.is_locked() {
            return None;
        }
        let hit = self.scene.hit_test(p).map(|o| o.id.clone());
        match (&hit, additive) {
            (Some(id), true) => self.scene.selection.toggle(id.clone()),
            (Some(id), false) => self.scene.selection.select(id.clone()),
            (None, true) => {}
            (None, false) => self.scene.selection.clear(),
        }
        hit
    }

    /// The single selected object, if exactly one
    pub fn active(&self) -> Option<&SceneObject> {
        self.scene.active()
    }

    fn active_id(&self) -> EditorResult<ObjectId> {
        self.scene
            .selection
            .contextual()
            .cloned()
            .ok_or(EditorError::InvalidAction("select exactly one object"))
    }

    // ── Contextual actions ──────────────────────────────────────

    pub fn can_edit_text(&self) -> bool {
        self.active().is_some_and(|o| {
            o.kind.as_zone().is_some()
                || o.labelled_zone_parts().is_some()
                || matches!(o.kind, ObjectKind::MeasurementGroup(_) | ObjectKind::ZoneLabel(_))
        })
    }

    pub fn can_adjust_opacity(&self) -> bool {
        self.active().is_some_and(|o| {
            o.kind.as_unit().is_some() || o.kind.as_zone().is_some() || o.labelled_zone_parts().is_some()
        })
    }

    pub fn can_group(&self) -> bool {
        !self.drawing.is_active() && self.scene.selection.is_multi()
    }

    pub fn can_ungroup(&self) -> bool {
        self.active().is_some_and(|o| o.is_group())
    }

    pub fn can_duplicate(&self) -> bool {
        self.active().is_some()
    }

    pub fn can_delete(&self) -> bool {
        self.scene.selection.count() > 0
    }

    /// Current text of the active zone label or measurement aid
    pub fn active_text(&self) -> Option<String> {
        let obj = self.active()?;
        match &obj.kind {
            ObjectKind::MeasurementGroup(aid) => Some(aid.label.clone()),
            ObjectKind::ZoneLabel(label) => Some(label.text.clone()),
            ObjectKind::Group(group) => {
                let (_, idx) = obj.labelled_zone_parts()?;
                match &group.children[idx].kind {
                    ObjectKind::ZoneLabel(label) => Some(label.text.clone()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Zone of the active object, looking through a labelled group
    fn active_zone(&self) -> Option<&shared::Zone> {
        let obj = self.active()?;
        match (&obj.kind, obj.labelled_zone_parts()) {
            (ObjectKind::Group(group), Some((idx, _))) => group.children[idx].kind.as_zone().map(|(_, z)| z),
            (kind, _) => kind.as_zone().map(|(_, z)| z),
        }
    }

    /// Opacity of the active unit or zone
    pub fn active_opacity(&self) -> Option<f64> {
        if let Some((_, unit)) = self.active()?.kind.as_unit() {
            return Some(unit.opacity);
        }
        self.active_zone().map(|z| z.opacity)
    }

    /// Fill of the active zone
    pub fn active_fill(&self) -> Option<shared::Color> {
        self.active_zone().map(|z| z.fill)
    }

    pub fn group_selected(&mut self) -> EditorResult<ObjectId> {
        if self.drawing.is_active() {
            return logged("Group", Err(EditorError::InvalidAction("finish drawing first")));
        }
        logged("Group", self.scene.group_selected())
    }

    pub fn ungroup_selected(&mut self) -> EditorResult<Vec<ObjectId>> {
        let result = self.active_id().and_then(|id| self.scene.ungroup(&id));
        logged("Ungroup", result)
    }

    pub fn duplicate_selected(&mut self) -> EditorResult<ObjectId> {
        let result = self.active_id().and_then(|id| self.scene.duplicate(&id));
        logged("Duplicate", result)
    }

    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        self.scene.delete_selected()
    }

    /// Add or edit the text of the active zone, label or measurement aid
    pub fn set_text(&mut self, text: &str) -> EditorResult<ObjectId> {
        let result = self.active_id().and_then(|id| {
            let has_own_text = matches!(
                self.scene.get(&id).map(|o| &o.kind),
                Some(ObjectKind::MeasurementGroup(_) | ObjectKind::ZoneLabel(_))
            );
            if has_own_text {
                self.scene.set_label_text(&id, text).map(|_| id)
            } else {
                self.scene.attach_text(&id, text, &self.settings.style)
            }
        });
        logged("Text", result)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> EditorResult<()> {
        let result = self
            .active_id()
            .and_then(|id| self.scene.set_opacity(&id, opacity));
        logged("Opacity", result)
    }

    pub fn set_fill(&mut self, hex: &str) -> EditorResult<()> {
        let result = self.active_id().and_then(|id| self.scene.set_fill(&id, hex));
        logged("Fill", result)
    }

    // ── View ────────────────────────────────────────────────────

    pub fn toggle_center_marker(&mut self) -> bool {
        let visible = !self.scene.center_marker().visible;
        self.scene.set_center_marker_visible(visible);
        self.settings.view.show_center_marker = visible;
        visible
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.settings.view.show_grid = visible;
        self.scene.notify_mutated();
    }

    /// Remove all user content
    pub fn clear(&mut self) {
        self.drawing.cancel(&mut self.scene);
        self.scene.clear();
        tracing::info!("Scene cleared");
    }

    // ── Persistence ─────────────────────────────────────────────

    pub fn save_bytes(&self) -> EditorResult<Vec<u8>> {
        self.scene.save_bytes()
    }

    /// Replace the scene with a saved one; a bad snapshot leaves
    /// everything (including an in-progress drawing) untouched
    pub fn load_bytes(&mut self, bytes: &[u8]) -> EditorResult<()> {
        let objects = logged("Load", scene::from_bytes(bytes))?;
        self.drawing.cancel(&mut self.scene);
        tracing::info!("Loaded {} objects", objects.len());
        self.scene.restore(objects);
        self.preload_icons();
        Ok(())
    }

    /// Warm the icon cache so loaded markers render with their images.
    /// Missing icons only degrade rendering.
    pub fn preload_icons(&mut self) {
        for key in IconKey::all() {
            if let Err(e) = self.icons.load(*key) {
                tracing::warn!("Icon unavailable: {e}");
            }
        }
    }

    /// Rasterize the canvas as currently displayed
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        logged(
            "Export",
            crate::export::render_png(&self.scene, &self.settings, self.icons.as_ref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryIconLibrary;
    use crate::fixtures::triangle_points;

    fn session() -> EditorSession {
        EditorSession::new(
            EditorSettings::default(),
            Box::new(MemoryIconLibrary::with_placeholders(64)),
        )
    }

    #[test]
    fn test_missing_icon_leaves_scene_unchanged() {
        let mut lib = MemoryIconLibrary::with_placeholders(64);
        lib.remove(IconKey::StrikeForce);
        let mut s = EditorSession::new(EditorSettings::default(), Box::new(lib));
        s.add_objective(None).unwrap();
        let version = s.scene.version();
        assert!(matches!(
            s.add_strike_force(None),
            Err(EditorError::AssetLoadFailure { .. })
        ));
        assert_eq!(s.scene.len(), 1);
        assert_eq!(s.scene.version(), version);
    }

    #[test]
    fn test_factories_select_new_object() {
        let mut s = session();
        let id = s.add_measurement(Axis::Horizontal, None);
        assert_eq!(s.active().map(|o| o.id.clone()), Some(id));
        assert!(s.can_edit_text());
        assert!(!s.can_adjust_opacity());
        assert!(!s.can_ungroup());
    }

    #[test]
    fn test_contextual_actions_need_single_selection() {
        let mut s = session();
        let a = s.add_deployment_zone(ZoneKind::Attacker, None);
        let b = s.add_unit(Side::Defender, None).unwrap();
        s.scene.selection.select_many(vec![a, b]);
        assert!(s.can_group());
        assert!(!s.can_edit_text());
        assert!(s.set_opacity(0.5).is_err());
        let gid = s.group_selected().unwrap();
        assert!(s.can_ungroup());
        assert_eq!(s.ungroup_selected().unwrap().len(), 2);
        assert!(s.scene.get(&gid).is_none());
    }

    #[test]
    fn test_set_text_wraps_then_edits() {
        let mut s = session();
        s.add_deployment_zone(ZoneKind::Defender, None);
        let gid = s.set_text("Defender deployment").unwrap();
        assert_eq!(s.active_text().as_deref(), Some("Defender deployment"));
        assert_eq!(s.set_text("DZ").unwrap(), gid);
        assert_eq!(s.scene.len(), 1);
        assert_eq!(s.active_text().as_deref(), Some("DZ"));
    }

    #[test]
    fn test_set_text_on_ungrouped_label() {
        let mut s = session();
        s.add_deployment_zone(ZoneKind::Attacker, None);
        s.set_text("Alpha").unwrap();
        let children = s.ungroup_selected().unwrap();
        let label = children[1].clone();
        s.scene.set_active(Some(&label));

        assert!(s.can_edit_text());
        assert_eq!(s.set_text("Bravo").unwrap(), label);
        assert_eq!(s.active_text().as_deref(), Some("Bravo"));
        assert_eq!(s.scene.len(), 2);
    }

    #[test]
    fn test_active_opacity_and_fill() {
        let mut s = session();
        s.add_unit(Side::Attacker, None).unwrap();
        assert_eq!(s.active_opacity(), Some(1.0));
        assert_eq!(s.active_fill(), None);

        s.add_deployment_zone(ZoneKind::Attacker, None);
        s.set_text("Alpha").unwrap();
        s.set_opacity(0.7).unwrap();
        assert_eq!(s.active_opacity(), Some(0.7));
        assert_eq!(s.active_fill(), Some(shared::Color::RED));
    }

    #[test]
    fn test_group_blocked_while_drawing() {
        let mut s = session();
        let a = s.add_deployment_zone(ZoneKind::Attacker, None);
        let b = s.add_deployment_zone(ZoneKind::Defender, None);
        s.scene.selection.select_many(vec![a, b]);
        s.start_drawing();
        assert!(!s.can_group());
        assert!(s.group_selected().is_err());
    }

    #[test]
    fn test_load_cancels_drawing() {
        let mut s = session();
        s.add_deployment_zone(ZoneKind::Attacker, None);
        let bytes = s.save_bytes().unwrap();
        s.start_drawing();
        s.click(triangle_points()[0]);
        s.load_bytes(&bytes).unwrap();
        assert_eq!(s.drawing.phase(), DrawingPhase::Idle);
        assert_eq!(s.scene.len(), 1);
        assert!(!s.scene.selection.is_locked());
    }

    #[test]
    fn test_bad_load_keeps_drawing() {
        let mut s = session();
        s.start_drawing();
        s.click(triangle_points()[0]);
        assert!(s.load_bytes(b"[]").is_err());
        assert_eq!(s.drawing.phase(), DrawingPhase::PlacingPoints);
        assert_eq!(s.drawing.points().len(), 1);
    }

    #[test]
    fn test_select_at() {
        let mut s = session();
        let zone = s.add_deployment_zone(ZoneKind::Attacker, Some(Point::new(0.0, 0.0)));
        s.scene.selection.clear();
        assert_eq!(s.select_at(Point::new(10.0, 10.0), false), Some(zone.clone()));
        assert_eq!(s.active().map(|o| o.id.clone()), Some(zone));
        assert_eq!(s.select_at(Point::new(1000.0, 800.0), false), None);
        assert!(s.active().is_none());
    }

    #[test]
    fn test_toggle_center_marker() {
        let mut s = session();
        assert!(!s.scene.center_marker().visible);
        assert!(s.toggle_center_marker());
        assert!(s.settings.view.show_center_marker);
        assert!(s.scene.center_marker().visible);
    }
}
