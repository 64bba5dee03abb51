mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state` etc. resolve to the lib
// crate types everywhere in the binary.
pub use mission_map_lib::assets;
pub use mission_map_lib::error;
pub use mission_map_lib::export;
pub use mission_map_lib::geometry;
pub use mission_map_lib::state;

use app::MissionMapApp;
use state::EditorSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mission_map=info,mission_map_lib=info".into()),
        )
        .init();

    let settings = EditorSettings::load();

    // Parse --scene <path> argument
    let initial_scene = parse_scene_arg();

    let (width, height) = (settings.canvas.width() as f32, settings.canvas.height() as f32);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mission Map Builder")
            .with_inner_size([width + 480.0, height + 60.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "mission-map",
        native_options,
        Box::new(move |cc| Ok(Box::new(MissionMapApp::new(cc, settings, initial_scene)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_scene_arg() -> Option<Vec<u8>> {
    let args: Vec<String> = std::env::args().collect();
    let pos = args.iter().position(|a| a == "--scene")?;
    let path = args.get(pos + 1)?;
    match std::fs::read(path) {
        Ok(bytes) => {
            tracing::info!("Read scene from {path}");
            Some(bytes)
        }
        Err(e) => {
            tracing::error!("Failed to read scene file {path}: {e}");
            None
        }
    }
}
