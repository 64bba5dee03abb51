//! Integration tests for saving, autosave recovery, icons and PNG export.

use kurbo::Point;
use mission_map_lib::assets::{FsIconLibrary, IconLibrary};
use mission_map_lib::error::EditorError;
use mission_map_lib::export;
use mission_map_lib::harness::TestHarness;
use mission_map_lib::state::scene::SceneGraph;
use mission_map_lib::state::{ClosurePolicy, EditorSession, EditorSettings};
use shared::{Axis, IconKey, Side, ZoneKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn populated() -> TestHarness {
    let mut h = TestHarness::new();
    h.draw_zone(&[pt(0.0, 0.0), pt(200.0, 0.0), pt(200.0, 200.0)], ZoneKind::Attacker)
        .unwrap();
    h.add_deployment(ZoneKind::Defender);
    h.session.set_text("Defender DZ").unwrap();
    h.add_objective();
    h.add_unit(Side::Attacker, pt(400.0, 300.0));
    h.add_measurement(Axis::Vertical);
    h
}

#[test]
fn test_save_load_preserves_scene() {
    let h = populated();
    let json = h.export_scene_json();

    let mut other = TestHarness::new();
    other.load_scene_json(&json).unwrap();
    assert_eq!(other.ids(), h.ids());
    for id in h.ids() {
        assert_eq!(other.get(&id), h.get(&id));
    }
    assert_eq!(other.export_scene_json(), json);
}

#[test]
fn test_save_skips_drawing_artifacts() {
    let mut h = populated();
    let saved = h.user_object_count();
    h.click_polygon(&[pt(600.0, 600.0), pt(700.0, 600.0)]);
    assert!(h.object_count() > saved);

    let mut other = TestHarness::new();
    other.load_scene_json(&h.export_scene_json()).unwrap();
    assert_eq!(other.object_count(), saved);
}

#[test]
fn test_load_cancels_drawing() {
    let mut h = TestHarness::new();
    let json = populated().export_scene_json();
    h.click_polygon(&[pt(0.0, 0.0), pt(100.0, 0.0)]);
    h.load_scene_json(&json).unwrap();
    assert!(!h.session.drawing.is_active());
    assert_eq!(h.object_count(), h.user_object_count());
}

#[test]
fn test_malformed_snapshot_is_rejected() {
    let mut h = populated();
    let before = h.ids();
    assert!(h.load_scene_json("{").is_err());
    assert!(h.load_scene_json(r#"{"objects": [{"id": "x", "name": "spaceship"}]}"#).is_err());
    assert_eq!(h.ids(), before);
}

#[test]
fn test_autosave_roundtrip_in_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("autosave.json");
    let h = populated();
    h.session.scene.autosave_to(&path);

    let objects = SceneGraph::load_autosave_from(&path).unwrap();
    let mut scene = SceneGraph::default();
    scene.restore(objects);
    assert_eq!(scene.len(), h.user_object_count());
}

#[test]
fn test_broken_autosave_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("autosave.json");
    std::fs::write(&path, "not a scene").unwrap();
    assert!(SceneGraph::load_autosave_from(&path).is_none());
    assert!(SceneGraph::load_autosave_from(&dir.path().join("missing.json")).is_none());
}

#[test]
fn test_settings_persist_in_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut settings = EditorSettings::default();
    settings.drawing.closure = ClosurePolicy::auto_close(5);
    settings.view.show_grid = false;
    settings.save_to(&path);

    let loaded = EditorSettings::load_from(&path);
    assert_eq!(loaded.drawing.closure, ClosurePolicy::AutoClose { vertices: 5 });
    assert!(!loaded.view.show_grid);
}

#[test]
fn test_fs_icons_load_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    let icon = image::RgbaImage::from_pixel(32, 16, image::Rgba([200, 30, 30, 255]));
    icon.save(dir.path().join(IconKey::Objective.file_name())).unwrap();

    let mut lib = FsIconLibrary::new(dir.path());
    assert!(lib.cached(IconKey::Objective).is_none());
    let asset = lib.load(IconKey::Objective).unwrap();
    assert_eq!((asset.width, asset.height), (32, 16));
    assert!(lib.cached(IconKey::Objective).is_some());

    assert!(matches!(
        lib.load(IconKey::StrikeForce),
        Err(EditorError::AssetLoadFailure { icon: IconKey::StrikeForce, .. })
    ));
}

#[test]
fn test_missing_icon_file_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = EditorSession::new(EditorSettings::default(), Box::new(FsIconLibrary::new(dir.path())));
    assert!(session.add_unit(Side::Defender, None).is_err());
    assert!(session.scene.is_empty());
}

#[test]
fn test_export_png_matches_canvas() {
    let h = populated();
    let png = h.session.export_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    let canvas = &h.session.settings.canvas;
    assert_eq!(decoded.width(), canvas.width() as u32);
    assert_eq!(decoded.height(), canvas.height() as u32);
}

#[test]
fn test_render_fills_attacker_zone() {
    let h = populated();
    let pixmap = export::render(&h.session.scene, &h.session.settings, h.session.icons()).unwrap();
    let inside = pixmap.pixel(150, 50).unwrap();
    let outside = pixmap.pixel(50, 150).unwrap();
    assert!(inside.red() > inside.green());
    assert_ne!(inside, outside);
}
