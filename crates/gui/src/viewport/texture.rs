//! Scene raster cached as an egui texture.
//!
//! The canvas is painted by the same tiny-skia renderer as the PNG export
//! and only re-rasterized when the scene version changes.

use egui::{ColorImage, TextureHandle, TextureOptions};

use crate::export;
use crate::state::EditorSession;

#[derive(Default)]
pub struct SceneTexture {
    handle: Option<TextureHandle>,
    version: Option<u64>,
}

impl SceneTexture {
    pub fn get(&mut self, ctx: &egui::Context, session: &EditorSession) -> Option<&TextureHandle> {
        let version = session.scene.version();
        if self.version != Some(version) {
            self.version = Some(version);
            match export::render(&session.scene, &session.settings, session.icons()) {
                Ok(pixmap) => {
                    let size = [pixmap.width() as usize, pixmap.height() as usize];
                    let image = ColorImage::from_rgba_premultiplied(size, pixmap.data());
                    match &mut self.handle {
                        Some(handle) => handle.set(image, TextureOptions::LINEAR),
                        None => self.handle = Some(ctx.load_texture("scene", image, TextureOptions::LINEAR)),
                    }
                }
                Err(e) => tracing::warn!("Canvas raster failed: {e}"),
            }
        }
        self.handle.as_ref()
    }
}
