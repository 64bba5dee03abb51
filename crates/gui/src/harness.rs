//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps an [`EditorSession`] backed by an in-memory icon library, so every
//! user action can be driven without a window.

use kurbo::Point;
use shared::{Axis, ObjectId, SceneObject, Side, ZoneKind};

use crate::assets::MemoryIconLibrary;
use crate::state::drawing::{ClickOutcome, ZoneChoice};
use crate::state::settings::{ClosurePolicy, EditorSettings};
use crate::state::EditorSession;

/// Side length of the placeholder icons
pub const HARNESS_ICON_SIZE: u32 = 64;

/// Headless test harness
pub struct TestHarness {
    pub session: EditorSession,
}

impl TestHarness {
    /// Harness with default settings (auto-close at 3 points)
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            session: EditorSession::new(
                settings,
                Box::new(MemoryIconLibrary::with_placeholders(HARNESS_ICON_SIZE)),
            ),
        }
    }

    /// Harness using the explicit-close drawing policy
    pub fn explicit_close() -> Self {
        let mut settings = EditorSettings::default();
        settings.drawing.closure = ClosurePolicy::ExplicitClose;
        Self::with_settings(settings)
    }

    // ── Drawing ───────────────────────────────────────────────

    /// Start drawing and click every point; returns the click outcomes
    pub fn click_polygon(&mut self, points: &[Point]) -> Vec<ClickOutcome> {
        self.session.start_drawing();
        points.iter().map(|p| self.session.click(*p)).collect()
    }

    /// Draw a zone and classify it in one go
    pub fn draw_zone(&mut self, points: &[Point], kind: ZoneKind) -> Result<ObjectId, String> {
        self.click_polygon(points);
        let choice = match kind {
            ZoneKind::Attacker => ZoneChoice::Attacker,
            ZoneKind::Defender => ZoneChoice::Defender,
            ZoneKind::Custom => ZoneChoice::Custom,
        };
        let created = self.session.classify(choice).map_err(|e| e.to_string())?;
        match created {
            Some(id) => Ok(id),
            None => self.session.confirm_custom_zone().map_err(|e| e.to_string()),
        }
    }

    // ── Factories ─────────────────────────────────────────────

    pub fn add_deployment(&mut self, kind: ZoneKind) -> ObjectId {
        self.session.add_deployment_zone(kind, None)
    }

    pub fn add_objective(&mut self) -> ObjectId {
        self.session.add_objective(None).unwrap_or_default()
    }

    pub fn add_unit(&mut self, side: Side, at: Point) -> ObjectId {
        self.session.add_unit(side, Some(at)).unwrap_or_default()
    }

    pub fn add_measurement(&mut self, axis: Axis) -> ObjectId {
        self.session.add_measurement(axis, None)
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select(&mut self, id: &str) {
        self.session.scene.set_active(Some(id));
    }

    pub fn select_many(&mut self, ids: &[ObjectId]) {
        self.session.scene.selection.select_many(ids.to_vec());
    }

    pub fn clear_selection(&mut self) {
        self.session.scene.selection.clear();
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of entries in the scene graph, drawing artifacts included
    pub fn object_count(&self) -> usize {
        self.session.scene.len()
    }

    /// Number of objects that would be saved
    pub fn user_object_count(&self) -> usize {
        self.session.scene.user_object_count()
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.session.scene.get(id)
    }

    /// Object ids, bottom to top
    pub fn ids(&self) -> Vec<ObjectId> {
        self.session.scene.all().iter().map(|o| o.id.clone()).collect()
    }

    /// Object names, bottom to top
    pub fn names(&self) -> Vec<&'static str> {
        self.session.scene.all().iter().map(|o| o.name()).collect()
    }

    // ── Persistence ───────────────────────────────────────────

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        self.session
            .save_bytes()
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_default()
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        self.session
            .load_bytes(json.as_bytes())
            .map_err(|e| e.to_string())
    }

    /// Clear the entire scene
    pub fn clear(&mut self) {
        self.session.clear();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{square_points, triangle_points};

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.object_count(), 0);
    }

    #[test]
    fn test_draw_attacker_zone() {
        let mut h = TestHarness::new();
        let id = h.draw_zone(&triangle_points(), ZoneKind::Attacker).unwrap();
        assert_eq!(h.ids(), vec![id]);
        assert_eq!(h.names(), ["attacker_zone"]);
    }

    #[test]
    fn test_draw_custom_zone_uses_palette_default() {
        let mut h = TestHarness::new();
        let id = h.draw_zone(&triangle_points(), ZoneKind::Custom).unwrap();
        let (kind, zone) = h.get(&id).unwrap().kind.as_zone().unwrap();
        assert_eq!(kind, ZoneKind::Custom);
        assert_eq!(zone.fill, shared::Color::BLUE);
    }

    #[test]
    fn test_explicit_close_square() {
        let mut h = TestHarness::explicit_close();
        let mut pts = square_points(Point::new(100.0, 100.0), 200.0);
        pts.push(Point::new(105.0, 95.0));
        let id = h.draw_zone(&pts, ZoneKind::Defender).unwrap();
        let (_, zone) = h.get(&id).unwrap().kind.as_zone().unwrap();
        assert_eq!(zone.shape.vertex_count(), 4);
    }

    #[test]
    fn test_unclosed_zone_cannot_be_classified() {
        let mut h = TestHarness::explicit_close();
        let err = h.draw_zone(&triangle_points(), ZoneKind::Attacker).unwrap_err();
        assert!(err.contains("classification"));
        h.session.cancel_drawing();
        assert_eq!(h.object_count(), 0);
    }

    #[test]
    fn test_load_export_json() {
        let mut h = TestHarness::new();
        h.add_deployment(ZoneKind::Attacker);
        h.add_objective();
        let json = h.export_scene_json();

        let mut h2 = TestHarness::new();
        h2.load_scene_json(&json).unwrap();
        assert_eq!(h2.ids(), h.ids());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut h = TestHarness::new();
        h.add_measurement(Axis::Vertical);
        h.click_polygon(&triangle_points()[..2]);
        h.clear();
        assert_eq!(h.object_count(), 0);
        assert!(!h.session.drawing.is_active());
    }
}
